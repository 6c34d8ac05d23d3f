#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use pkce_login::{
	http::ReqwestExchangeClient,
	session::{AccessToken, Role, SessionHandle},
};

#[tokio::test]
async fn initialize_revalidates_a_persisted_token() {
	let server = MockServer::start_async().await;
	let client = ReqwestExchangeClient::new(&server.base_url())
		.expect("Exchange client should build from the mock server URL.");
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me").header("authorization", "Bearer persisted-token");
			then.status(200).header("content-type", "application/json").body(
				"{\"username\":\"otaku_master\",\"name\":\"Otaku Master\",\"role\":\"사용자\"}",
			);
		})
		.await;
	let handle = SessionHandle::default();
	let session = handle
		.initialize(&client, AccessToken::new("persisted-token"))
		.await
		.expect("A valid persisted token should restore the session.");

	user_mock.assert_async().await;

	assert_eq!(session.user.id, "otaku_master");
	assert_eq!(session.user.role, Role::User);
	assert_eq!(session.user.avatar, None);
	assert!(handle.is_logged_in());
	assert_eq!(handle.snapshot(), Some(session));
}

#[tokio::test]
async fn initialize_discards_a_rejected_token() {
	let server = MockServer::start_async().await;
	let client = ReqwestExchangeClient::new(&server.base_url())
		.expect("Exchange client should build from the mock server URL.");
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/me");
			then.status(401).body("unauthorized");
		})
		.await;
	let handle = SessionHandle::default();

	assert!(
		handle.initialize(&client, AccessToken::new("stale-token")).await.is_none(),
		"A rejected token must not restore a session.",
	);

	user_mock.assert_async().await;

	assert!(!handle.is_logged_in());
}
