//! PKCE verifier/challenge generation and login-attempt entropy.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng as _, RngCore as _, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

const VERIFIER_ENTROPY_BYTES: usize = 32;
const STATE_LEN: usize = 32;

/// Supported PKCE challenge methods embedded in authorization URLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PkceCodeChallengeMethod {
	/// SHA-256 based PKCE (RFC 7636 S256).
	S256,
}
impl PkceCodeChallengeMethod {
	/// Returns the RFC 7636 identifier for the challenge method.
	pub const fn as_str(self) -> &'static str {
		match self {
			PkceCodeChallengeMethod::S256 => "S256",
		}
	}
}

/// Secret PKCE code verifier held client-side for the duration of one login round trip.
///
/// The verifier travels to the backend exchange only; the authorization endpoint sees the
/// derived challenge exclusively. Formatters redact the value so it never lands in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct CodeVerifier(String);
impl CodeVerifier {
	/// Generates a fresh verifier from 32 cryptographically secure random bytes, rendered as
	/// URL-safe base64 without padding.
	///
	/// There is no fallback randomness source; an environment without a secure RNG cannot
	/// run this flow at all.
	pub fn generate() -> Self {
		let mut entropy = [0_u8; VERIFIER_ENTROPY_BYTES];

		rand::rng().fill_bytes(&mut entropy);

		Self(URL_SAFE_NO_PAD.encode(entropy))
	}

	/// Wraps a verifier read back from scratch storage.
	pub fn from_stored(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the verifier string for the backend exchange. Callers must not log this value.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for CodeVerifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CodeVerifier").field(&"<redacted>").finish()
	}
}
impl Display for CodeVerifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Verifier/challenge pairing produced at login start.
#[derive(Clone, Debug)]
pub struct PkcePair {
	verifier: CodeVerifier,
	challenge: String,
	method: PkceCodeChallengeMethod,
}
impl PkcePair {
	/// Generates a fresh verifier and derives its challenge.
	pub fn generate() -> Self {
		let verifier = CodeVerifier::generate();
		let challenge = code_challenge(&verifier);

		Self { verifier, challenge, method: PkceCodeChallengeMethod::S256 }
	}

	/// Secret verifier half of the pair.
	pub fn verifier(&self) -> &CodeVerifier {
		&self.verifier
	}

	/// Public challenge sent to the authorization endpoint.
	pub fn challenge(&self) -> &str {
		&self.challenge
	}

	/// Challenge method (currently always `S256`).
	pub fn method(&self) -> PkceCodeChallengeMethod {
		self.method
	}
}

/// Computes the S256 challenge for a verifier: `base64url(SHA-256(verifier))`, unpadded.
///
/// Pure and deterministic; the same verifier always yields the same challenge.
pub fn code_challenge(verifier: &CodeVerifier) -> String {
	let mut hasher = Sha256::new();

	hasher.update(verifier.expose().as_bytes());

	URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Generates the opaque anti-CSRF state token bound to one login attempt.
///
/// Alphanumeric from the thread CSPRNG; collision probability is negligible for the attempt
/// volume a single client produces.
pub fn generate_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
