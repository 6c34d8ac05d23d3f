//! Storage contract for the OAuth scratch parameters that must survive the provider redirect.

pub mod memory;

pub use memory::MemoryScratch;

// self
use crate::_prelude::*;

/// Keys for the per-attempt scratch values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScratchKey {
	/// Secret PKCE code verifier.
	CodeVerifier,
	/// Anti-CSRF state token.
	State,
}
impl ScratchKey {
	/// Stable storage key, matching what a browser host uses in `sessionStorage`.
	pub const fn as_str(self) -> &'static str {
		match self {
			ScratchKey::CodeVerifier => "oauth_code_verifier",
			ScratchKey::State => "oauth_state",
		}
	}
}

/// Error type produced by [`ScratchStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StoreError {
	/// Backing storage is unavailable in this browsing context.
	#[error("Tab-scoped storage is unavailable: {message}.")]
	Unavailable {
		/// Host-supplied detail.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Storage backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Tab-scoped key/value storage holding one attempt's verifier/state pair.
///
/// Values written before navigating away to the authorization page MUST be readable when
/// the browser returns to the callback page in the same tab. Some mobile browsers break
/// that contract by reopening the callback in a different browsing context; the validator
/// treats the resulting mismatch as retryable storage loss rather than an attack.
///
/// The interface is synchronous to match the platform storage it wraps. Writers always
/// [`clear`](ScratchStore::clear) before writing a new attempt's pair so stale values from
/// an abandoned attempt are overwritten, never merged.
pub trait ScratchStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the value under `key`.
	fn put(&self, key: ScratchKey, value: &str) -> Result<(), StoreError>;

	/// Fetches the value under `key`, if present.
	fn get(&self, key: ScratchKey) -> Result<Option<String>, StoreError>;

	/// Removes every scratch value. Idempotent: clearing an empty store succeeds.
	fn clear(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scratch_keys_match_browser_storage_names() {
		assert_eq!(ScratchKey::CodeVerifier.as_str(), "oauth_code_verifier");
		assert_eq!(ScratchKey::State.as_str(), "oauth_state");
	}

	#[test]
	fn store_error_converts_into_flow_error() {
		let err: Error = StoreError::Unavailable { message: "private browsing".into() }.into();

		assert!(matches!(err, Error::Storage(_)));
		assert!(err.to_string().contains("private browsing"));
	}
}
