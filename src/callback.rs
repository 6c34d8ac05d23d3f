//! Parsing of the provider redirect back onto the callback page.

// self
use crate::_prelude::*;

/// Query parameters extracted from a callback URL.
///
/// A provider-reported `error` takes precedence in the orchestrator: when present, the flow
/// short-circuits to its error state without consulting the validator or the exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// Single-use authorization code, when present.
	pub code: Option<String>,
	/// Round-tripped anti-CSRF state, when present.
	pub state: Option<String>,
	/// Provider-reported error code, when present.
	pub error: Option<String>,
}
impl CallbackParams {
	/// Extracts `code`/`state`/`error` from a callback URL.
	///
	/// Total over arbitrary input: unparsable URLs and URLs without a query string yield the
	/// all-`None` value instead of an error. Repeated parameters keep the first occurrence.
	pub fn from_url(url: &str) -> Self {
		let Ok(parsed) = Url::parse(url) else {
			return Self::default();
		};
		let mut params = Self::default();

		for (key, value) in parsed.query_pairs() {
			match key.as_ref() {
				"code" if params.code.is_none() => params.code = Some(value.into_owned()),
				"state" if params.state.is_none() => params.state = Some(value.into_owned()),
				"error" if params.error.is_none() => params.error = Some(value.into_owned()),
				_ => {},
			}
		}

		params
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn extracts_code_state_and_error() {
		let params =
			CallbackParams::from_url("https://app.example.com/login-redirect?code=c1&state=s1");

		assert_eq!(params.code.as_deref(), Some("c1"));
		assert_eq!(params.state.as_deref(), Some("s1"));
		assert_eq!(params.error, None);

		let denied = CallbackParams::from_url(
			"https://app.example.com/login-redirect?error=access_denied&state=s1",
		);

		assert_eq!(denied.error.as_deref(), Some("access_denied"));
		assert_eq!(denied.code, None);
	}

	#[test]
	fn never_fails_on_arbitrary_input() {
		for input in ["", "not a url", "relative/path?code=c1", "https://", "::::"] {
			assert_eq!(CallbackParams::from_url(input), CallbackParams::default());
		}
	}

	#[test]
	fn url_without_query_yields_all_none() {
		let params = CallbackParams::from_url("https://app.example.com/login-redirect");

		assert_eq!(params, CallbackParams::default());
	}

	#[test]
	fn repeated_parameters_keep_the_first_occurrence() {
		let params = CallbackParams::from_url(
			"https://app.example.com/login-redirect?code=first&code=second",
		);

		assert_eq!(params.code.as_deref(), Some("first"));
	}

	#[test]
	fn percent_encoded_values_are_decoded() {
		let params =
			CallbackParams::from_url("https://app.example.com/login-redirect?state=a%2Bb");

		assert_eq!(params.state.as_deref(), Some("a+b"));
	}
}
