//! Backend collaborators: the PKCE code exchange and the current-user lookup.
//!
//! The flow never talks to the provider's token endpoint itself; the backend performs the
//! RFC 6749 exchange server-side. What the client sends is the single-use authorization
//! code plus the PKCE verifier proving it initiated the handshake. Any non-success response
//! or transport failure counts as exchange failure.

// self
use crate::{_prelude::*, session::AccessToken};

/// Boxed future type returned by [`ExchangeHttpClient`] implementations.
pub type ExchangeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ExchangeError>> + 'a + Send>>;

/// JSON body posted to the backend token exchange.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
	/// Single-use authorization code returned by the provider.
	pub code: String,
	/// PKCE verifier proving possession of the original request.
	pub code_verifier: String,
}
impl Debug for ExchangeRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ExchangeRequest")
			.field("code", &truncated(&self.code))
			.field("code_verifier", &"<redacted>")
			.finish()
	}
}

/// Successful token-exchange payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
	/// Bearer token for subsequent backend calls.
	pub access_token: AccessToken,
}

/// Current-user payload returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
	/// Social handle of the authenticated user.
	pub username: String,
	/// Display name.
	pub name: String,
	/// Profile image URL; may be empty.
	#[serde(default)]
	pub picture: String,
	/// Localized role label mapped via [`Role::from_label`](crate::session::Role::from_label).
	pub role: String,
}

/// Failures surfaced by the backend collaborators.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Backend rejected the request with a non-success status.
	#[error("Backend rejected the exchange with status {status}: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Body preview or status text.
		message: String,
	},
	/// Transport-level failure (DNS, TCP, TLS, timeout).
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: Box<dyn StdError + Send + Sync>,
	},
	/// Backend returned JSON that does not match the expected shape.
	#[error("Backend returned a malformed response.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Request URL could not be assembled from the configured base.
	#[error("Backend endpoint URL is invalid.")]
	InvalidUrl(#[from] url::ParseError),
}
impl ExchangeError {
	/// Wraps a transport-specific network failure.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

/// Backend collaborator performing the PKCE code exchange and session lookups.
///
/// Implementations must be `Send + Sync + 'static` so the flow can hold them behind `Arc`
/// and the boxed request futures stay `Send` for the lifetime of the in-flight call.
pub trait ExchangeHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Exchanges `{code, codeVerifier}` for an access token.
	fn exchange_code<'a>(
		&'a self,
		request: &'a ExchangeRequest,
	) -> ExchangeFuture<'a, ExchangeResponse>;

	/// Fetches the profile bound to `token`.
	fn current_user<'a>(&'a self, token: &'a AccessToken) -> ExchangeFuture<'a, UserResponse>;
}

fn truncated(value: &str) -> String {
	const PREVIEW_LEN: usize = 10;

	if value.chars().count() <= PREVIEW_LEN {
		value.to_owned()
	} else {
		let preview: String = value.chars().take(PREVIEW_LEN).collect();

		format!("{preview}...")
	}
}

/// Reqwest-backed [`ExchangeHttpClient`] talking to the application backend.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestExchangeClient {
	client: ReqwestClient,
	base: Url,
}
#[cfg(feature = "reqwest")]
impl ReqwestExchangeClient {
	/// Endpoint path for the PKCE code exchange.
	pub const LOGIN_PATH: &'static str = "/auth/login";
	/// Endpoint path for the current-user lookup.
	pub const USER_PATH: &'static str = "/user/me";

	/// Creates a client for the backend at `base`.
	pub fn new(base: &str) -> Result<Self, ExchangeError> {
		Ok(Self { client: ReqwestClient::new(), base: Url::parse(base)? })
	}

	/// Wraps an existing reqwest client (custom TLS, timeouts, proxies).
	pub fn with_client(client: ReqwestClient, base: Url) -> Self {
		Self { client, base }
	}

	async fn post_exchange(
		&self,
		request: &ExchangeRequest,
	) -> Result<ExchangeResponse, ExchangeError> {
		let url = self.base.join(Self::LOGIN_PATH)?;
		let response = self
			.client
			.post(url)
			.json(request)
			.send()
			.await
			.map_err(ExchangeError::network)?;

		Self::decode(response).await
	}

	async fn get_user(&self, token: &AccessToken) -> Result<UserResponse, ExchangeError> {
		let url = self.base.join(Self::USER_PATH)?;
		let response = self
			.client
			.get(url)
			.bearer_auth(token.expose())
			.send()
			.await
			.map_err(ExchangeError::network)?;

		Self::decode(response).await
	}

	async fn decode<T>(response: reqwest::Response) -> Result<T, ExchangeError>
	where
		T: serde::de::DeserializeOwned,
	{
		let status = response.status();
		let body = response.bytes().await.map_err(ExchangeError::network)?;

		if !status.is_success() {
			let message = String::from_utf8_lossy(&body).trim().to_owned();
			let message = if message.is_empty() {
				status.canonical_reason().unwrap_or("unknown error").to_owned()
			} else {
				truncated_body(&message)
			};

			return Err(ExchangeError::Rejected { status: status.as_u16(), message });
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ExchangeError::MalformedResponse { source })
	}
}
#[cfg(feature = "reqwest")]
impl ExchangeHttpClient for ReqwestExchangeClient {
	fn exchange_code<'a>(
		&'a self,
		request: &'a ExchangeRequest,
	) -> ExchangeFuture<'a, ExchangeResponse> {
		Box::pin(self.post_exchange(request))
	}

	fn current_user<'a>(&'a self, token: &'a AccessToken) -> ExchangeFuture<'a, UserResponse> {
		Box::pin(self.get_user(token))
	}
}

#[cfg(feature = "reqwest")]
fn truncated_body(body: &str) -> String {
	const BODY_PREVIEW_LEN: usize = 256;

	if body.chars().count() <= BODY_PREVIEW_LEN {
		body.to_owned()
	} else {
		body.chars().take(BODY_PREVIEW_LEN).collect()
	}
}
