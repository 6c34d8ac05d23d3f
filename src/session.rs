//! Authenticated-session models and the single-writer session container.

// self
use crate::{
	_prelude::*,
	http::{ExchangeHttpClient, UserResponse},
};

/// Redacted access token wrapper keeping the bearer secret out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for AccessToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Application roles mapped from the backend's localized role labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
	/// Board administrator.
	Admin,
	/// Regular authenticated user.
	User,
	/// Fallback role for unknown or unmapped labels.
	#[default]
	Guest,
}
impl Role {
	/// Maps the backend's localized label onto a role identifier.
	///
	/// Unknown labels deliberately map to [`Role::Guest`] so a new backend label can never
	/// grant elevated access.
	pub fn from_label(label: &str) -> Self {
		match label {
			"관리자" => Role::Admin,
			"사용자" => Role::User,
			"게스트" => Role::Guest,
			_ => Role::Guest,
		}
	}

	/// Stable identifier string for the role.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Admin => "ADMIN",
			Role::User => "USER",
			Role::Guest => "GUEST",
		}
	}
}

/// Profile of the authenticated user surfaced to the host UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Social handle identifying the user.
	pub id: String,
	/// Display nickname.
	pub nickname: String,
	/// Profile image URL, when the user has one.
	pub avatar: Option<String>,
	/// Mapped application role.
	pub role: Role,
}
impl From<UserResponse> for UserProfile {
	fn from(response: UserResponse) -> Self {
		Self {
			id: response.username,
			nickname: response.name,
			avatar: (!response.picture.is_empty()).then_some(response.picture),
			role: Role::from_label(&response.role),
		}
	}
}

/// Session established after a successful code exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedSession {
	/// Bearer token for subsequent backend calls.
	pub access_token: AccessToken,
	/// Profile bound to the token.
	pub user: UserProfile,
}

/// Single-writer container owning the application's authenticated session.
///
/// Only the login flow's lifecycle hooks (`initialize`/`login`/`logout`) mutate the slot;
/// every consumer reads a snapshot and never mutates shared state directly.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle(Arc<RwLock<Option<AuthenticatedSession>>>);
impl SessionHandle {
	/// Establishes a session after a successful exchange.
	pub fn login(&self, session: AuthenticatedSession) {
		*self.0.write() = Some(session);
	}

	/// Destroys the current session.
	pub fn logout(&self) {
		*self.0.write() = None;
	}

	/// Snapshot of the current session, if any.
	pub fn snapshot(&self) -> Option<AuthenticatedSession> {
		self.0.read().clone()
	}

	/// Whether a session is currently established.
	pub fn is_logged_in(&self) -> bool {
		self.0.read().is_some()
	}

	/// Revalidates a persisted access token via the current-user lookup.
	///
	/// Any lookup failure invalidates the token: the slot is cleared and `None` is
	/// returned, matching the rule that an unverifiable cached token is worthless.
	pub async fn initialize<C>(&self, client: &C, token: AccessToken) -> Option<AuthenticatedSession>
	where
		C: ?Sized + ExchangeHttpClient,
	{
		match client.current_user(&token).await {
			Ok(user) => {
				let session =
					AuthenticatedSession { access_token: token, user: UserProfile::from(user) };

				self.login(session.clone());

				Some(session)
			},
			Err(_) => {
				self.logout();

				None
			},
		}
	}
}
