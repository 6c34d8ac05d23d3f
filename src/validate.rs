//! Anti-CSRF state validation and failure classification.
//!
//! The state comparison is a CSRF defense: any mismatch rejects, including an absent or
//! empty stored value, with no fallback acceptance path. What the module adds on top is
//! classification: deciding whether a mismatch looks like the known mobile storage-context
//! loss (worth one automatic retry) or like a genuinely suspect callback (terminal).

// self
use crate::{_prelude::*, platform::ClientHints};

const DEBUG_PREFIX_LEN: usize = 8;

/// Non-reversible diagnostics captured when state validation fails.
///
/// Carries truncated prefixes only; the full state values never leave the flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateDebugInfo {
	/// Whether the client looked like a mobile-class browser.
	pub is_mobile: bool,
	/// Whether tab-scoped storage was available at all.
	pub storage_available: bool,
	/// Truncated prefix of the state received on the callback.
	pub received_prefix: String,
	/// Truncated prefix of the stored state, when one existed.
	pub stored_prefix: Option<String>,
	/// When the failure was observed.
	pub observed_at: OffsetDateTime,
}

/// Classified state-validation failure surfaced to the orchestrator.
#[derive(Clone, Debug, ThisError)]
#[error("{message}")]
pub struct StateMismatch {
	/// User-facing failure message.
	pub message: String,
	/// Whether one automatic retry is worth attempting.
	pub should_retry: bool,
	/// Diagnostics reported to telemetry; never contains full secrets.
	pub debug: StateDebugInfo,
}

/// Validates the state returned by the provider against the stored attempt state.
///
/// Accepts iff `received` exactly equals a non-empty stored value. `prior_failures` counts
/// earlier validation failures in this attempt lineage: only the first failure on a
/// mobile-class client is marked retryable, since cross-context storage loss is the known
/// transient cause there. Repeated failures must not retry indefinitely; the flow's shared
/// counter bounds them.
pub fn validate_state(
	received: &str,
	stored: Option<&str>,
	hints: &ClientHints,
	prior_failures: u8,
) -> Result<(), StateMismatch> {
	if stored.is_some_and(|value| !value.is_empty() && value == received) {
		return Ok(());
	}

	let is_mobile = hints.is_mobile();
	let storage_loss_suspected =
		is_mobile && (!hints.storage_available || stored.is_none_or(str::is_empty));
	let should_retry = prior_failures == 0 && is_mobile;
	let message = if storage_loss_suspected {
		"Login state was lost while switching apps. Retrying the login.".to_owned()
	} else {
		"State validation failed. Aborting the login for safety.".to_owned()
	};
	let debug = StateDebugInfo {
		is_mobile,
		storage_available: hints.storage_available,
		received_prefix: prefix(received),
		stored_prefix: stored.map(prefix),
		observed_at: OffsetDateTime::now_utc(),
	};

	Err(StateMismatch { message, should_retry, debug })
}

fn prefix(value: &str) -> String {
	value.chars().take(DEBUG_PREFIX_LEN).collect()
}
