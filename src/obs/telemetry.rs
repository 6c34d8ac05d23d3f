//! Fire-and-forget product telemetry for login outcomes.

// self
use crate::{_prelude::*, validate::StateDebugInfo};

const LABEL_MAX_LEN: usize = 100;

/// Login-flow events reported to the host's analytics collaborator.
#[derive(Clone, Debug)]
pub enum LoginEvent {
	/// A code exchange completed and a session was established.
	LoginSucceeded,
	/// State validation rejected the callback.
	StateValidationFailed {
		/// Truncated diagnostics; never full secrets.
		debug: StateDebugInfo,
	},
	/// An automatic or manual retry is starting.
	RetryAttempted {
		/// 1-based retry number.
		attempt: u8,
		/// Result of the mobile-class heuristic at retry time.
		is_mobile: bool,
	},
	/// A terminal login failure of any other kind.
	ErrorReported {
		/// Stable error-kind label.
		kind: &'static str,
		/// Truncated user-facing message.
		message: String,
	},
}

/// Sink receiving login telemetry.
///
/// Reporting must never block or fail the flow; implementations swallow their own errors.
pub trait TelemetrySink
where
	Self: Send + Sync,
{
	/// Reports one event.
	fn report(&self, event: LoginEvent);
}

/// Default sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTelemetry;
impl TelemetrySink for NullTelemetry {
	fn report(&self, _event: LoginEvent) {}
}

/// Sink retaining every reported event in order; useful in tests and demos.
#[derive(Debug, Default)]
pub struct RecordingTelemetry(Mutex<Vec<LoginEvent>>);
impl RecordingTelemetry {
	/// Returns a copy of the events reported so far.
	pub fn events(&self) -> Vec<LoginEvent> {
		self.0.lock().clone()
	}
}
impl TelemetrySink for RecordingTelemetry {
	fn report(&self, event: LoginEvent) {
		self.0.lock().push(event);
	}
}

/// Truncates telemetry labels so messages never exceed the analytics payload budget.
pub fn truncate_label(value: &str) -> String {
	value.chars().take(LABEL_MAX_LEN).collect()
}
