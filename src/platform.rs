//! Host-environment hints consumed by the validator's storage-loss heuristic.

/// Observations about the client environment captured at callback time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientHints {
	/// Raw user-agent string, when the host exposes one.
	pub user_agent: Option<String>,
	/// Whether tab-scoped storage is available at all in this browsing context.
	pub storage_available: bool,
}
impl ClientHints {
	/// Hints for a client with working tab-scoped storage and the provided user agent.
	pub fn new(user_agent: impl Into<String>) -> Self {
		Self { user_agent: Some(user_agent.into()), storage_available: true }
	}

	/// Hints for a browsing context whose tab-scoped storage is unavailable.
	pub fn without_storage(user_agent: impl Into<String>) -> Self {
		Self { user_agent: Some(user_agent.into()), storage_available: false }
	}

	/// Whether the user agent looks like a mobile-class browser.
	pub fn is_mobile(&self) -> bool {
		self.user_agent.as_deref().is_some_and(is_mobile_user_agent)
	}
}

/// Best-effort mobile-browser predicate over the raw user-agent string.
///
/// Mobile browsers are the known population where the authorization page opens in a
/// browsing context that does not share tab-scoped storage with the original tab. This is
/// a heuristic, not a guarantee; it lives behind a single function so it can be replaced
/// with feature detection without touching the state machine.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
	const MARKERS: &[&str] =
		&["android", "iphone", "ipad", "ipod", "blackberry", "iemobile", "opera mini"];

	let lowered = user_agent.to_ascii_lowercase();

	MARKERS.iter().any(|marker| lowered.contains(marker))
}
