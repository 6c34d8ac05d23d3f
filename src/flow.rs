//! Login orchestration: the `idle → loading → (success | error | retrying)` state machine.
//!
//! [`LoginFlow::start_login`] parks a fresh verifier/state pair in scratch storage and
//! returns the authorization URL; the host performs the full-page navigation. The provider
//! later redirects back onto the callback page, a distinct process invocation, where the
//! host calls [`LoginFlow::handle_callback`] exactly once with the callback URL. Every
//! transition returns a [`HostAction`] instead of sleeping: the soft UX delays (automatic
//! retry, post-success/post-error navigation home) are data the host event loop schedules.

pub mod retry;

pub use retry::RetryController;

// self
use crate::{
	_prelude::*,
	callback::CallbackParams,
	config::LoginConfig,
	http::{ExchangeHttpClient, ExchangeRequest},
	obs::{
		self, FlowOutcome, FlowSpan, FlowStage, LoginEvent, NullTelemetry, TelemetrySink,
		truncate_label,
	},
	pkce::{CodeVerifier, PkcePair, generate_state},
	platform::ClientHints,
	session::{AuthenticatedSession, SessionHandle, UserProfile},
	store::{ScratchKey, ScratchStore},
	validate,
};

/// Hard cap on automatic + manual retries within one browser session.
pub const MAX_RETRIES: u8 = 2;
/// Delay before the scheduled automatic retry of a retryable state failure.
pub const AUTO_RETRY_DELAY: Duration = Duration::seconds(3);
/// Delay before navigating home after a successful login.
pub const SUCCESS_REDIRECT_DELAY: Duration = Duration::seconds(2);
/// Delay before navigating home after a terminal failure.
pub const ERROR_REDIRECT_DELAY: Duration = Duration::seconds(5);

/// States of one login attempt lineage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginStatus {
	/// No attempt in flight.
	#[default]
	Idle,
	/// Waiting on the redirect round trip or the code exchange.
	Loading,
	/// A bounded retry is restarting the flow.
	Retrying,
	/// Terminal: a session was established.
	Success,
	/// Terminal for this lineage: the attempt failed.
	Error,
}

/// Snapshot of the current attempt surfaced to the host UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginAttempt {
	/// Current state-machine position.
	pub status: LoginStatus,
	/// Retries consumed from the shared automatic + manual budget.
	pub retry_count: u8,
	/// User-facing progress or failure message.
	pub message: String,
}

/// Instruction for the host event loop after a state transition.
///
/// The delays are soft UX timers, not correctness-critical deadlines; the host owns
/// scheduling so the state machine stays free of wall-clock side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostAction {
	/// Nothing to schedule.
	None,
	/// Navigate back to the home page after the delay.
	NavigateHome {
		/// Soft delay before navigating.
		after: Duration,
	},
	/// Invoke [`LoginFlow::retry_login`] after the delay.
	ScheduleRetry {
		/// Soft delay before retrying.
		after: Duration,
	},
}

/// Result of processing one callback navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackOutcome {
	/// Attempt snapshot after the transition.
	pub attempt: LoginAttempt,
	/// Follow-up the host should schedule.
	pub action: HostAction,
}

/// Result of a retry request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetryOutcome {
	/// A new lineage started; navigate the page to the URL.
	Restarted {
		/// Authorization URL for the new attempt.
		url: Url,
		/// 1-based retry number consumed from the shared budget.
		attempt: u8,
	},
	/// The retry budget is exhausted; only going home remains.
	Exhausted {
		/// Attempt snapshot with the terminal message.
		attempt: LoginAttempt,
		/// Forced navigation home.
		action: HostAction,
	},
	/// Starting the new attempt failed (storage or configuration).
	Failed {
		/// Attempt snapshot with the failure message.
		attempt: LoginAttempt,
		/// Forced navigation home.
		action: HostAction,
	},
}

#[derive(Debug, Default)]
struct AttemptState {
	status: LoginStatus,
	message: String,
}

/// Coordinates the whole Authorization Code + PKCE login round trip.
///
/// The flow owns the scratch store, the backend exchange client, the session container,
/// the telemetry sink, and the shared retry budget, so the host only ever navigates,
/// schedules the returned [`HostAction`]s, and renders [`LoginAttempt`] snapshots.
pub struct LoginFlow<C>
where
	C: ?Sized + ExchangeHttpClient,
{
	config: LoginConfig,
	scratch: Arc<dyn ScratchStore>,
	exchange: Arc<C>,
	session: SessionHandle,
	telemetry: Arc<dyn TelemetrySink>,
	retries: RetryController,
	state: Mutex<AttemptState>,
}
impl<C> LoginFlow<C>
where
	C: ?Sized + ExchangeHttpClient,
{
	/// Creates a flow with a no-op telemetry sink.
	pub fn new(
		config: LoginConfig,
		scratch: Arc<dyn ScratchStore>,
		exchange: Arc<C>,
		session: SessionHandle,
	) -> Self {
		Self {
			config,
			scratch,
			exchange,
			session,
			telemetry: Arc::new(NullTelemetry),
			retries: RetryController::default(),
			state: Mutex::default(),
		}
	}

	/// Sets or replaces the telemetry sink.
	pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
		self.telemetry = telemetry;

		self
	}

	/// Snapshot of the current attempt.
	pub fn attempt(&self) -> LoginAttempt {
		let state = self.state.lock();

		LoginAttempt {
			status: state.status,
			retry_count: self.retries.count(),
			message: state.message.clone(),
		}
	}

	/// Session container owned by the application.
	pub fn session(&self) -> &SessionHandle {
		&self.session
	}

	/// Starts a new login lineage and returns the URL for the full-page navigation.
	///
	/// Scratch storage is overwritten, never merged: stale values left by an abandoned
	/// attempt are cleared first, and the fresh verifier/state pair is fully written before
	/// the URL is returned, so the host may navigate as soon as this call succeeds.
	pub fn start_login(&self) -> Result<Url> {
		const STAGE: FlowStage = FlowStage::Start;

		let _guard = FlowSpan::new(STAGE, "start_login").entered();

		obs::record_flow_outcome(STAGE, FlowOutcome::Attempt);

		let result = self.begin_attempt();

		match &result {
			Ok(_) => obs::record_flow_outcome(STAGE, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(STAGE, FlowOutcome::Failure),
		}

		result
	}

	/// Processes one callback navigation and returns the resulting transition.
	///
	/// Invoked exactly once per callback page load. Decision order: a provider-reported
	/// `error` short-circuits everything; a missing code or state is a broken redirect; a
	/// state mismatch consults the retry policy; a missing verifier after a valid state is
	/// a fatal PKCE invariant violation (never downgraded to a plain exchange); otherwise
	/// the code is exchanged and the session established. Scratch storage never survives a
	/// terminal transition with usable credentials.
	pub async fn handle_callback(&self, url: &str, hints: &ClientHints) -> CallbackOutcome {
		const STAGE: FlowStage = FlowStage::Callback;

		let span = FlowSpan::new(STAGE, "handle_callback");

		obs::record_flow_outcome(STAGE, FlowOutcome::Attempt);

		let outcome = span.instrument(self.process_callback(url, hints)).await;

		match outcome.attempt.status {
			LoginStatus::Success => obs::record_flow_outcome(STAGE, FlowOutcome::Success),
			_ => obs::record_flow_outcome(STAGE, FlowOutcome::Failure),
		}

		outcome
	}

	/// Restarts the whole flow as a new lineage, drawing from the shared retry budget.
	///
	/// Serves both the automatic retry scheduled via [`HostAction::ScheduleRetry`] and the
	/// user-initiated "try again" action; one counter governs both. The authorization code
	/// is single-use, so a retry always restarts from the beginning instead of replaying
	/// the exchange.
	pub fn retry_login(&self, hints: &ClientHints) -> RetryOutcome {
		const STAGE: FlowStage = FlowStage::Retry;

		let _guard = FlowSpan::new(STAGE, "retry_login").entered();

		obs::record_flow_outcome(STAGE, FlowOutcome::Attempt);

		let Some(attempt_no) = self.retries.try_begin_retry() else {
			let err = Error::RetriesExhausted;
			let message = err.user_message();

			self.telemetry.report(LoginEvent::ErrorReported {
				kind: err.kind_label(),
				message: truncate_label(&message),
			});
			self.set_state(LoginStatus::Error, &message);
			obs::record_flow_outcome(STAGE, FlowOutcome::Failure);

			return RetryOutcome::Exhausted {
				attempt: self.attempt(),
				action: HostAction::NavigateHome { after: ERROR_REDIRECT_DELAY },
			};
		};

		self.telemetry
			.report(LoginEvent::RetryAttempted { attempt: attempt_no, is_mobile: hints.is_mobile() });
		self.set_state(LoginStatus::Retrying, "Retrying the login.");

		match self.begin_attempt() {
			Ok(url) => {
				obs::record_flow_outcome(STAGE, FlowOutcome::Success);

				RetryOutcome::Restarted { url, attempt: attempt_no }
			},
			Err(err) => {
				obs::record_flow_outcome(STAGE, FlowOutcome::Failure);

				let outcome = self.fail(err);

				RetryOutcome::Failed { attempt: outcome.attempt, action: outcome.action }
			},
		}
	}

	fn begin_attempt(&self) -> Result<Url> {
		// Overwrite whatever a previous or abandoned attempt left behind.
		self.scratch.clear()?;

		let pkce = PkcePair::generate();
		let state = generate_state();

		// Both writes must land before the caller navigates away, or the round trip can
		// never be validated on return.
		self.scratch.put(ScratchKey::CodeVerifier, pkce.verifier().expose())?;
		self.scratch.put(ScratchKey::State, &state)?;

		let url = self.authorization_url(&pkce, &state)?;

		self.set_state(LoginStatus::Loading, "Redirecting to the authorization server.");

		Ok(url)
	}

	fn authorization_url(&self, pkce: &PkcePair, state: &str) -> Result<Url> {
		let redirect_uri = self.config.redirect_uri().map_err(Error::from)?;
		let mut url = self.config.authorization_endpoint.clone();

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair("response_type", "code");
			pairs.append_pair("client_id", &self.config.client_id);
			pairs.append_pair("redirect_uri", redirect_uri.as_str());
			pairs.append_pair("scope", &self.config.scope_param());
			pairs.append_pair("state", state);
			// Only the challenge leaves the client; the verifier stays in scratch storage.
			pairs.append_pair("code_challenge", pkce.challenge());
			pairs.append_pair("code_challenge_method", pkce.method().as_str());
		}

		Ok(url)
	}

	async fn process_callback(&self, url: &str, hints: &ClientHints) -> CallbackOutcome {
		self.set_state(LoginStatus::Loading, "Processing the login callback.");

		let params = CallbackParams::from_url(url);

		if let Some(code) = params.error {
			return self.fail(Error::Provider { code });
		}

		let Some(code) = params.code else {
			return self.fail(Error::MissingCode);
		};
		let Some(received_state) = params.state else {
			return self.fail(Error::MissingState);
		};

		let stored_state = self.scratch.get(ScratchKey::State).ok().flatten();

		if let Err(mismatch) = validate::validate_state(
			&received_state,
			stored_state.as_deref(),
			hints,
			self.retries.count(),
		) {
			self.telemetry
				.report(LoginEvent::StateValidationFailed { debug: mismatch.debug.clone() });

			if mismatch.should_retry && self.retries.can_retry() {
				// Transient error state; the host schedules the automatic retry, which
				// clears scratch itself when the new lineage begins.
				self.set_state(LoginStatus::Error, &mismatch.message);

				return CallbackOutcome {
					attempt: self.attempt(),
					action: HostAction::ScheduleRetry { after: AUTO_RETRY_DELAY },
				};
			}

			return self.fail(Error::StateMismatch(mismatch));
		}

		let verifier = match self.scratch.get(ScratchKey::CodeVerifier) {
			Ok(Some(value)) if !value.is_empty() => CodeVerifier::from_stored(value),
			Ok(_) => return self.fail(Error::MissingVerifier),
			Err(err) => return self.fail(Error::Storage(err)),
		};

		self.set_state(LoginStatus::Loading, "Exchanging the authorization code.");

		let request =
			ExchangeRequest { code, code_verifier: verifier.expose().to_owned() };
		let response = match self.exchange.exchange_code(&request).await {
			Ok(response) => response,
			Err(err) => return self.fail(Error::Exchange(err)),
		};
		let user = match self.exchange.current_user(&response.access_token).await {
			Ok(user) => user,
			Err(err) => return self.fail(Error::Exchange(err)),
		};

		self.session.login(AuthenticatedSession {
			access_token: response.access_token,
			user: UserProfile::from(user),
		});

		// The code is spent; the scratch pair must not outlive the attempt.
		let _ = self.scratch.clear();

		self.telemetry.report(LoginEvent::LoginSucceeded);
		self.set_state(LoginStatus::Success, "Login succeeded. Returning to the home page.");

		CallbackOutcome {
			attempt: self.attempt(),
			action: HostAction::NavigateHome { after: SUCCESS_REDIRECT_DELAY },
		}
	}

	fn fail(&self, err: Error) -> CallbackOutcome {
		// No failure may leave credentials usable by a later unrelated attempt.
		let _ = self.scratch.clear();

		let message = err.user_message();

		self.telemetry.report(LoginEvent::ErrorReported {
			kind: err.kind_label(),
			message: truncate_label(&message),
		});
		self.set_state(LoginStatus::Error, &message);

		CallbackOutcome {
			attempt: self.attempt(),
			action: HostAction::NavigateHome { after: ERROR_REDIRECT_DELAY },
		}
	}

	fn set_state(&self, status: LoginStatus, message: &str) {
		let mut state = self.state.lock();

		state.status = status;
		state.message = message.to_owned();
	}
}
impl<C> Debug for LoginFlow<C>
where
	C: ?Sized + ExchangeHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginFlow")
			.field("config", &self.config)
			.field("retries", &self.retries)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		http::{ExchangeError, ExchangeFuture, ExchangeResponse, UserResponse},
		obs::RecordingTelemetry,
		session::AccessToken,
		store::MemoryScratch,
	};

	const MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile";
	const DESKTOP_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/537.36";

	#[derive(Default)]
	struct StubExchange {
		fail_exchange: bool,
		last_request: Mutex<Option<ExchangeRequest>>,
	}
	impl StubExchange {
		fn rejecting() -> Self {
			Self { fail_exchange: true, ..Self::default() }
		}
	}
	impl ExchangeHttpClient for StubExchange {
		fn exchange_code<'a>(
			&'a self,
			request: &'a ExchangeRequest,
		) -> ExchangeFuture<'a, ExchangeResponse> {
			*self.last_request.lock() = Some(request.clone());

			let fail = self.fail_exchange;
			let code = request.code.clone();

			Box::pin(async move {
				if fail {
					Err(ExchangeError::Rejected { status: 400, message: "invalid code".into() })
				} else {
					Ok(ExchangeResponse { access_token: AccessToken::new(format!("token-{code}")) })
				}
			})
		}

		fn current_user<'a>(
			&'a self,
			_token: &'a AccessToken,
		) -> ExchangeFuture<'a, UserResponse> {
			Box::pin(async {
				Ok(UserResponse {
					username: "otaku_master".into(),
					name: "Otaku Master".into(),
					picture: String::new(),
					role: "사용자".into(),
				})
			})
		}
	}

	fn config() -> LoginConfig {
		let origin = Url::parse("https://themes.example.com")
			.expect("Origin fixture should parse successfully.");

		LoginConfig::builder("client-test", origin)
			.build()
			.expect("Test configuration should build successfully.")
	}

	fn flow(
		exchange: StubExchange,
	) -> (LoginFlow<StubExchange>, Arc<MemoryScratch>, Arc<RecordingTelemetry>) {
		let scratch = Arc::new(MemoryScratch::default());
		let telemetry = Arc::new(RecordingTelemetry::default());
		let flow = LoginFlow::new(
			config(),
			scratch.clone(),
			Arc::new(exchange),
			SessionHandle::default(),
		)
		.with_telemetry(telemetry.clone());

		(flow, scratch, telemetry)
	}

	fn callback_url(code: &str, state: &str) -> String {
		format!("https://themes.example.com/login-redirect?code={code}&state={state}")
	}

	#[test]
	fn start_login_parks_scratch_before_returning_the_url() {
		let (flow, scratch, _) = flow(StubExchange::default());
		let url = flow.start_login().expect("Login should start successfully.");
		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
		let stored_state = scratch
			.get(ScratchKey::State)
			.expect("State read should succeed.")
			.expect("State should be parked before the URL is returned.");
		let stored_verifier = scratch
			.get(ScratchKey::CodeVerifier)
			.expect("Verifier read should succeed.")
			.expect("Verifier should be parked before the URL is returned.");

		assert_eq!(pairs.get("response_type"), Some(&"code".into()));
		assert_eq!(pairs.get("client_id"), Some(&"client-test".into()));
		assert_eq!(
			pairs.get("redirect_uri"),
			Some(&"https://themes.example.com/login-redirect".into()),
		);
		assert_eq!(pairs.get("scope"), Some(&"tweet.read users.read".into()));
		assert_eq!(pairs.get("state"), Some(&stored_state));
		assert_eq!(pairs.get("code_challenge_method"), Some(&"S256".into()));

		let challenge = pairs.get("code_challenge").expect("Challenge should be present.");

		assert_ne!(challenge, &stored_verifier, "The verifier itself must never be sent.");
		assert!(!url.as_str().contains(&stored_verifier));
		assert_eq!(flow.attempt().status, LoginStatus::Loading);
	}

	#[test]
	fn start_login_overwrites_stale_scratch() {
		let (flow, scratch, _) = flow(StubExchange::default());

		scratch.put(ScratchKey::State, "stale-state").expect("Seed put should succeed.");
		scratch
			.put(ScratchKey::CodeVerifier, "stale-verifier")
			.expect("Seed put should succeed.");
		flow.start_login().expect("Login should start successfully.");

		let state = scratch
			.get(ScratchKey::State)
			.expect("State read should succeed.")
			.expect("State should exist.");

		assert_ne!(state, "stale-state");
	}

	#[tokio::test]
	async fn full_round_trip_exchanges_the_parked_verifier() {
		let (flow, scratch, _) = flow(StubExchange::default());
		let _url = flow.start_login().expect("Login should start successfully.");
		let state = scratch
			.get(ScratchKey::State)
			.expect("State read should succeed.")
			.expect("State should exist.");
		let verifier = scratch
			.get(ScratchKey::CodeVerifier)
			.expect("Verifier read should succeed.")
			.expect("Verifier should exist.");
		let outcome = flow
			.handle_callback(&callback_url("c1", &state), &ClientHints::new(DESKTOP_UA))
			.await;

		assert_eq!(outcome.attempt.status, LoginStatus::Success);
		assert_eq!(
			outcome.action,
			HostAction::NavigateHome { after: SUCCESS_REDIRECT_DELAY },
		);

		let request = flow
			.exchange
			.last_request
			.lock()
			.clone()
			.expect("Exchange should have been invoked.");

		assert_eq!(request.code, "c1");
		assert_eq!(request.code_verifier, verifier);

		let session = flow.session().snapshot().expect("Session should be established.");

		assert_eq!(session.access_token.expose(), "token-c1");
		assert_eq!(session.user.id, "otaku_master");
		assert_eq!(
			scratch.get(ScratchKey::State).expect("State read should succeed."),
			None,
			"Scratch must be cleared after a successful exchange.",
		);
	}

	#[tokio::test]
	async fn provider_error_short_circuits_before_validation_and_exchange() {
		let (flow, scratch, _) = flow(StubExchange::default());

		flow.start_login().expect("Login should start successfully.");

		let outcome = flow
			.handle_callback(
				"https://themes.example.com/login-redirect?error=access_denied&state=s1",
				&ClientHints::new(DESKTOP_UA),
			)
			.await;

		assert_eq!(outcome.attempt.status, LoginStatus::Error);
		assert!(outcome.attempt.message.contains("access_denied"));
		assert_eq!(outcome.action, HostAction::NavigateHome { after: ERROR_REDIRECT_DELAY });
		assert!(
			flow.exchange.last_request.lock().is_none(),
			"The exchange must never run for provider-reported errors.",
		);
		assert_eq!(
			scratch.get(ScratchKey::State).expect("State read should succeed."),
			None,
			"Scratch must be cleared on terminal failures.",
		);
	}

	#[tokio::test]
	async fn missing_code_and_missing_state_are_terminal() {
		let (flow, _, _) = flow(StubExchange::default());

		flow.start_login().expect("Login should start successfully.");

		let missing_code = flow
			.handle_callback(
				"https://themes.example.com/login-redirect?state=s1",
				&ClientHints::new(DESKTOP_UA),
			)
			.await;

		assert_eq!(missing_code.attempt.status, LoginStatus::Error);
		assert!(missing_code.attempt.message.contains("authorization code"));

		flow.start_login().expect("Login should restart successfully.");

		let missing_state = flow
			.handle_callback(
				"https://themes.example.com/login-redirect?code=c1",
				&ClientHints::new(DESKTOP_UA),
			)
			.await;

		assert_eq!(missing_state.attempt.status, LoginStatus::Error);
		assert!(missing_state.attempt.message.contains("state parameter"));
	}

	#[tokio::test]
	async fn first_mobile_mismatch_schedules_an_automatic_retry() {
		let (flow, _, telemetry) = flow(StubExchange::default());

		flow.start_login().expect("Login should start successfully.");

		let outcome = flow
			.handle_callback(&callback_url("c1", "wrong-state"), &ClientHints::new(MOBILE_UA))
			.await;

		assert_eq!(outcome.attempt.status, LoginStatus::Error);
		assert_eq!(outcome.action, HostAction::ScheduleRetry { after: AUTO_RETRY_DELAY });
		assert!(telemetry.events().iter().any(|event| matches!(
			event,
			LoginEvent::StateValidationFailed { .. }
		)));
		assert!(
			flow.exchange.last_request.lock().is_none(),
			"The exchange must never run on a state mismatch.",
		);
	}

	#[tokio::test]
	async fn desktop_mismatch_is_terminal() {
		let (flow, _, _) = flow(StubExchange::default());

		flow.start_login().expect("Login should start successfully.");

		let outcome = flow
			.handle_callback(&callback_url("c1", "wrong-state"), &ClientHints::new(DESKTOP_UA))
			.await;

		assert_eq!(outcome.attempt.status, LoginStatus::Error);
		assert_eq!(outcome.action, HostAction::NavigateHome { after: ERROR_REDIRECT_DELAY });
	}

	#[tokio::test]
	async fn missing_verifier_is_fatal_even_with_a_valid_state() {
		let (flow, scratch, _) = flow(StubExchange::default());

		flow.start_login().expect("Login should start successfully.");

		let state = scratch
			.get(ScratchKey::State)
			.expect("State read should succeed.")
			.expect("State should exist.");

		// Simulate partial storage loss: the state survived but the verifier did not.
		scratch.clear().expect("Clear should succeed.");
		scratch.put(ScratchKey::State, &state).expect("Put should succeed.");

		let outcome = flow
			.handle_callback(&callback_url("c1", &state), &ClientHints::new(DESKTOP_UA))
			.await;

		assert_eq!(outcome.attempt.status, LoginStatus::Error);
		assert!(
			flow.exchange.last_request.lock().is_none(),
			"A missing verifier must never downgrade to a plain exchange.",
		);
	}

	#[tokio::test]
	async fn exchange_rejection_is_terminal_and_clears_scratch() {
		let (flow, scratch, _) = flow(StubExchange::rejecting());

		flow.start_login().expect("Login should start successfully.");

		let state = scratch
			.get(ScratchKey::State)
			.expect("State read should succeed.")
			.expect("State should exist.");
		let outcome = flow
			.handle_callback(&callback_url("c1", &state), &ClientHints::new(DESKTOP_UA))
			.await;

		assert_eq!(outcome.attempt.status, LoginStatus::Error);
		assert_eq!(outcome.action, HostAction::NavigateHome { after: ERROR_REDIRECT_DELAY });
		assert!(!flow.session().is_logged_in());
		assert_eq!(
			scratch.get(ScratchKey::CodeVerifier).expect("Read should succeed."),
			None,
			"Scratch must be cleared even when the exchange fails.",
		);
	}

	#[test]
	fn retry_budget_is_shared_and_capped() {
		let (flow, _, telemetry) = flow(StubExchange::default());
		let hints = ClientHints::new(MOBILE_UA);

		assert!(matches!(
			flow.retry_login(&hints),
			RetryOutcome::Restarted { attempt: 1, .. },
		));
		assert!(matches!(
			flow.retry_login(&hints),
			RetryOutcome::Restarted { attempt: 2, .. },
		));

		let exhausted = flow.retry_login(&hints);

		assert!(matches!(exhausted, RetryOutcome::Exhausted { .. }));

		if let RetryOutcome::Exhausted { attempt, action } = exhausted {
			assert_eq!(attempt.status, LoginStatus::Error);
			assert_eq!(attempt.retry_count, MAX_RETRIES);
			assert_eq!(action, HostAction::NavigateHome { after: ERROR_REDIRECT_DELAY });
		}

		let retry_events = telemetry
			.events()
			.iter()
			.filter(|event| matches!(event, LoginEvent::RetryAttempted { .. }))
			.count();

		assert_eq!(retry_events, 2, "The exhausted attempt must not count as a retry.");
	}
}
