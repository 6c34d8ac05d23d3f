//! Flow-level error types shared across the login state machine.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical login-flow error exposed by public APIs.
///
/// Every failure is caught at the orchestrator boundary, converted into a user-facing
/// status + message, and resolved by either a timed redirect home or a user action; the
/// variants here mirror that taxonomy.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Scratch-storage failure.
	#[error("{0}")]
	Storage(#[from] crate::store::StoreError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] crate::config::ConfigError),
	/// Backend code-exchange failure (network or rejection).
	#[error(transparent)]
	Exchange(#[from] crate::http::ExchangeError),

	/// Authorization server reported an error on the callback (e.g. the user denied consent).
	#[error("Authorization server returned an error: {code}.")]
	Provider {
		/// Raw `error` query parameter from the provider.
		code: String,
	},
	/// Callback URL carried no authorization code.
	#[error("Callback is missing the authorization code.")]
	MissingCode,
	/// Callback URL carried no state parameter.
	#[error("Callback is missing the state parameter.")]
	MissingState,
	/// Received state does not match the state stored for this attempt.
	#[error("State validation failed: {0}")]
	StateMismatch(#[from] crate::validate::StateMismatch),
	/// Stored PKCE verifier was absent at exchange time; downgrading to a plain code
	/// exchange is never attempted.
	#[error("PKCE code verifier is missing from scratch storage.")]
	MissingVerifier,
	/// Retry budget for this browser session is exhausted.
	#[error("Retry limit reached.")]
	RetriesExhausted,
}
impl Error {
	/// Stable label identifying the error kind for telemetry.
	pub fn kind_label(&self) -> &'static str {
		match self {
			Error::Storage(_) => "storage",
			Error::Config(_) => "config",
			Error::Exchange(_) => "exchange_failed",
			Error::Provider { .. } => "provider_error",
			Error::MissingCode => "missing_code",
			Error::MissingState => "missing_state",
			Error::StateMismatch(_) => "state_mismatch",
			Error::MissingVerifier => "missing_verifier",
			Error::RetriesExhausted => "retries_exhausted",
		}
	}

	/// User-facing message shown on the callback page.
	pub fn user_message(&self) -> String {
		match self {
			Error::Provider { code } =>
				format!("The authorization server reported an error: {code}."),
			Error::MissingCode => "The callback did not include an authorization code.".into(),
			Error::MissingState => "The callback did not include a state parameter.".into(),
			Error::StateMismatch(mismatch) => mismatch.message.clone(),
			Error::MissingVerifier =>
				"The login session is incomplete. Please start over from the home page.".into(),
			Error::RetriesExhausted =>
				"Retry limit reached. Please log in again from the home page.".into(),
			Error::Exchange(_) => "Signing in with the backend failed. Please try again.".into(),
			Error::Storage(_) | Error::Config(_) => self.to_string(),
		}
	}
}
