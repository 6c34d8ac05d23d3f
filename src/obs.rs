//! Observability helpers for the login flow.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `pkce_login.flow` with the `stage`
//!   (flow phase) and `op` (call site) fields.
//! - Enable `metrics` to increment the `pkce_login_flow_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.
//!
//! Product telemetry (login success, state-validation failures, retries) goes through the
//! [`TelemetrySink`] trait instead; it is host-provided and fire-and-forget.

mod metrics;
mod telemetry;
mod tracing;

pub use metrics::*;
pub use telemetry::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Login-flow stages observed by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowStage {
	/// Building the authorization URL and parking scratch parameters.
	Start,
	/// Processing the provider redirect on the callback page.
	Callback,
	/// Restarting the flow after a retryable failure.
	Retry,
}
impl FlowStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowStage::Start => "start",
			FlowStage::Callback => "callback",
			FlowStage::Retry => "retry",
		}
	}
}
impl Display for FlowStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure surfaced to the host.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
