//! Client-side OAuth 2.0 Authorization Code + PKCE login state machine: CSRF state
//! validation, storage-loss-aware bounded retries, and host-driven redirect handling for
//! browser-style runtimes.
//!
//! The crate models one login round trip: generate a PKCE pair and an anti-CSRF state, park
//! them in tab-scoped scratch storage, hand the host an authorization URL for a full-page
//! navigation, then process the provider's redirect back onto the callback page. Some mobile
//! browsers reopen that callback in a browsing context that does not share scratch storage
//! with the original tab; the validator classifies those failures as retryable storage loss
//! and the flow restarts the whole handshake, bounded by a shared retry counter.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod callback;
pub mod config;
pub mod error;
pub mod flow;
pub mod http;
pub mod obs;
pub mod pkce;
pub mod platform;
pub mod session;
pub mod store;
pub mod validate;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
