//! Shared bounded retry budget for one browser session of login attempts.

// std
use std::sync::atomic::{AtomicU8, Ordering};
// self
use crate::flow::MAX_RETRIES;

/// One shared counter governing automatic and manual retries.
///
/// Automatic retries (scheduled after a retryable state failure) and manual retries (the
/// user pressing "try again") draw from the same budget, hard-capped at
/// [`MAX_RETRIES`]. Exceeding the cap forces a terminal error.
#[derive(Debug, Default)]
pub struct RetryController(AtomicU8);
impl RetryController {
	/// Retries consumed so far.
	pub fn count(&self) -> u8 {
		self.0.load(Ordering::Relaxed)
	}

	/// Whether another retry is still allowed.
	pub fn can_retry(&self) -> bool {
		self.count() < MAX_RETRIES
	}

	/// Claims the next retry slot, returning the 1-based retry number, or `None` once the
	/// cap is reached.
	pub fn try_begin_retry(&self) -> Option<u8> {
		self.0
			.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
				(current < MAX_RETRIES).then_some(current + 1)
			})
			.ok()
			.map(|previous| previous + 1)
	}
}
