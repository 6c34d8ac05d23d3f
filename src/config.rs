//! Login configuration consumed by the flow: client identity, endpoints, and scopes.
//!
//! The redirect URI is derived from the configured origin at call time rather than being
//! hardcoded, so the same build works across local, staging, and production hosts.

// self
use crate::_prelude::*;

/// Fixed same-origin callback path served by the host application.
pub const DEFAULT_CALLBACK_PATH: &str = "/login-redirect";
/// Authorization endpoint of the default provider.
pub const DEFAULT_AUTHORIZATION_ENDPOINT: &str = "https://x.com/i/oauth2/authorize";
/// Scopes requested by default.
pub const DEFAULT_SCOPES: &[&str] = &["tweet.read", "users.read"];

/// Errors raised while constructing or validating login configuration.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// The public client identifier was empty.
	#[error("Client identifier cannot be empty.")]
	EmptyClientId,
	/// The authorization endpoint must be reachable over HTTPS.
	#[error("The authorization endpoint must use HTTPS: {url}.")]
	InsecureAuthorizationEndpoint {
		/// Offending endpoint URL.
		url: String,
	},
	/// The callback path must be a same-origin absolute path.
	#[error("Callback path must start with `/`: {path}.")]
	InvalidCallbackPath {
		/// Offending path value.
		path: String,
	},
	/// At least one scope must be requested.
	#[error("Scope list cannot be empty.")]
	EmptyScopes,
	/// The redirect URI could not be derived from the configured origin.
	#[error("Redirect URI could not be derived from the configured origin.")]
	InvalidRedirect,
}

/// Immutable login configuration consumed by [`LoginFlow`](crate::flow::LoginFlow).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginConfig {
	/// OAuth 2.0 public client identifier.
	pub client_id: String,
	/// Provider authorization endpoint receiving the full-page redirect.
	pub authorization_endpoint: Url,
	/// Origin of the running host application; the redirect URI derives from it.
	pub origin: Url,
	/// Same-origin path the provider redirects back to.
	pub callback_path: String,
	/// Scopes requested during authorization.
	pub scopes: Vec<String>,
}
impl LoginConfig {
	/// Creates a builder seeded with the provider defaults.
	pub fn builder(client_id: impl Into<String>, origin: Url) -> LoginConfigBuilder {
		LoginConfigBuilder::new(client_id, origin)
	}

	/// Derives the redirect URI from the configured origin and callback path.
	pub fn redirect_uri(&self) -> Result<Url, ConfigError> {
		self.origin.join(&self.callback_path).map_err(|_| ConfigError::InvalidRedirect)
	}

	/// Space-delimited scope string for the authorization request.
	pub fn scope_param(&self) -> String {
		self.scopes.join(" ")
	}
}

/// Builder for [`LoginConfig`] values.
#[derive(Clone, Debug)]
pub struct LoginConfigBuilder {
	/// Public client identifier for the configuration being built.
	pub client_id: String,
	/// Authorization endpoint; defaults to [`DEFAULT_AUTHORIZATION_ENDPOINT`].
	pub authorization_endpoint: Option<Url>,
	/// Host application origin.
	pub origin: Url,
	/// Callback path; defaults to [`DEFAULT_CALLBACK_PATH`].
	pub callback_path: String,
	/// Requested scopes; defaults to [`DEFAULT_SCOPES`].
	pub scopes: Vec<String>,
}
impl LoginConfigBuilder {
	/// Creates a new builder seeded with the provider defaults.
	pub fn new(client_id: impl Into<String>, origin: Url) -> Self {
		Self {
			client_id: client_id.into(),
			authorization_endpoint: None,
			origin,
			callback_path: DEFAULT_CALLBACK_PATH.into(),
			scopes: DEFAULT_SCOPES.iter().map(|scope| (*scope).to_owned()).collect(),
		}
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Overrides the callback path.
	pub fn callback_path(mut self, path: impl Into<String>) -> Self {
		self.callback_path = path.into();

		self
	}

	/// Replaces the requested scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Validates the collected values and produces the configuration.
	pub fn build(self) -> Result<LoginConfig, ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::EmptyClientId);
		}

		let authorization_endpoint = match self.authorization_endpoint {
			Some(url) => url,
			None => Url::parse(DEFAULT_AUTHORIZATION_ENDPOINT)
				.map_err(|_| ConfigError::InvalidRedirect)?,
		};

		if authorization_endpoint.scheme() != "https" {
			return Err(ConfigError::InsecureAuthorizationEndpoint {
				url: authorization_endpoint.to_string(),
			});
		}
		if !self.callback_path.starts_with('/') {
			return Err(ConfigError::InvalidCallbackPath { path: self.callback_path });
		}
		if self.scopes.is_empty() {
			return Err(ConfigError::EmptyScopes);
		}

		Ok(LoginConfig {
			client_id: self.client_id,
			authorization_endpoint,
			origin: self.origin,
			callback_path: self.callback_path,
			scopes: self.scopes,
		})
	}
}
