//! The per-session search state machine.
//!
//! [`SessionState`] is an immutable value; every user action and every
//! settled fetch becomes a [`SessionEvent`] pushed through the pure
//! [`SessionState::apply`] transition, which returns the successor state plus
//! an optional [`FetchPlan`]. [`SearchSession`] is the thin dispatcher that
//! owns the state, hands plans to the [`FetchCoordinator`], and pumps settled
//! outcomes back in as events.

use std::time::Duration;

use tracing::debug;

use crate::cache::QueryCache;
use crate::coordinator::{FetchCoordinator, FetchSettled, LivenessToken};
use crate::item::{Item, ResultPage};
use crate::transport::{Transport, TransportError};

/// Lifecycle phase derived from the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
	/// Nothing fetched yet for the active key.
	Idle,
	/// A request for the active key is outstanding.
	Loading,
	/// The active key has cached results and no error.
	Ready,
	/// The most recent settle for the session was a failure.
	Errored,
}

/// External stimulus applied to the session state.
#[derive(Debug, Clone)]
pub enum SessionEvent {
	/// The pending input text changed; no fetch, no key change.
	TermChanged(String),
	/// The pending term was submitted as the new active key.
	Submitted,
	/// The next page for the active key was requested.
	LoadMoreRequested,
	/// A hit with the given identifier was dismissed from the active key.
	Dismissed(String),
	/// A page response settled successfully for `key`.
	PageSettled {
		key: String,
		hits: Vec<Item>,
		page: u32,
	},
	/// A page request settled with a transport failure.
	FetchFailed(TransportError),
}

/// Fetch a transition asked its dispatcher to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
	pub term: String,
	pub page: u32,
}

/// Successor state plus the side effect the transition requires.
#[derive(Debug, Clone)]
pub struct Transition {
	pub next: SessionState,
	pub fetch: Option<FetchPlan>,
}

/// Immutable session state: the pending input, the active key, the per-term
/// cache, and the transient fetch flags.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
	pending_term: String,
	active_key: String,
	cache: QueryCache,
	is_loading: bool,
	error: Option<TransportError>,
}

impl SessionState {
	/// Initial state for `initial_term`, before the opening submit.
	#[must_use]
	pub fn new(initial_term: impl Into<String>) -> Self {
		Self {
			pending_term: initial_term.into(),
			..Self::default()
		}
	}

	/// Apply one event, returning the successor state and the fetch (if any)
	/// the dispatcher must issue. Pure: `self` is left untouched.
	#[must_use]
	pub fn apply(&self, event: SessionEvent) -> Transition {
		let mut next = self.clone();
		let mut fetch = None;

		match event {
			SessionEvent::TermChanged(text) => {
				next.pending_term = text;
			}
			SessionEvent::Submitted => {
				next.active_key = next.pending_term.clone();
				if next.cache.needs_fetch(&next.active_key) {
					next.is_loading = true;
					fetch = Some(FetchPlan {
						term: next.active_key.clone(),
						page: 0,
					});
				}
			}
			SessionEvent::LoadMoreRequested => {
				// Never deduplicated: each load-more issues a fetch.
				next.is_loading = true;
				fetch = Some(FetchPlan {
					term: next.active_key.clone(),
					page: next.cache.current_page(&next.active_key) + 1,
				});
			}
			SessionEvent::Dismissed(id) => {
				next.cache = next.cache.remove_item(&next.active_key, &id);
			}
			SessionEvent::PageSettled { key, hits, page } => {
				next.cache = next.cache.merge(&key, hits, page);
				next.is_loading = false;
				// A stale error must not outlive fresh data for the key the
				// user is looking at; success for some other key leaves it.
				if key == next.active_key {
					next.error = None;
				}
			}
			SessionEvent::FetchFailed(error) => {
				next.is_loading = false;
				next.error = Some(error);
			}
		}

		Transition { next, fetch }
	}

	/// Read-only projection handed to the renderer.
	#[must_use]
	pub fn snapshot(&self) -> SessionSnapshot<'_> {
		SessionSnapshot {
			active_term: &self.pending_term,
			active_key: &self.active_key,
			page: self.cache.get(&self.active_key),
			is_loading: self.is_loading,
			error: self.error.as_ref(),
		}
	}

	/// Derived lifecycle phase.
	#[must_use]
	pub fn phase(&self) -> SessionPhase {
		if self.is_loading {
			SessionPhase::Loading
		} else if self.error.is_some() {
			SessionPhase::Errored
		} else if self.cache.get(&self.active_key).is_some() {
			SessionPhase::Ready
		} else {
			SessionPhase::Idle
		}
	}

	/// The cache backing this session.
	#[must_use]
	pub fn cache(&self) -> &QueryCache {
		&self.cache
	}
}

/// Read-only snapshot of the session derived per read, never stored.
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot<'a> {
	/// Pending input text (may differ from `active_key` between a keystroke
	/// and the next submit).
	pub active_term: &'a str,
	/// Key whose cached results are displayed.
	pub active_key: &'a str,
	/// Accumulated results for the active key, if any page has settled.
	pub page: Option<&'a ResultPage>,
	pub is_loading: bool,
	pub error: Option<&'a TransportError>,
}

impl SessionSnapshot<'_> {
	/// Hits to display, empty until the first page settles.
	#[must_use]
	pub fn hits(&self) -> &[Item] {
		self.page.map_or(&[], |page| page.hits.as_slice())
	}

	/// Most recent page number for the active key, 0 before any settle.
	#[must_use]
	pub fn page_number(&self) -> u32 {
		self.page.map_or(0, |page| page.page)
	}
}

/// Top-level state holder binding user actions to cache and coordinator.
pub struct SearchSession {
	state: SessionState,
	coordinator: FetchCoordinator,
	token: LivenessToken,
}

impl SearchSession {
	/// Start a session over `transport` and immediately submit
	/// `initial_term`, issuing its page-0 fetch.
	#[must_use]
	pub fn start(
		transport: Box<dyn Transport>,
		initial_term: impl Into<String>,
		hits_per_page: u32,
	) -> Self {
		let mut session = Self {
			state: SessionState::new(initial_term),
			coordinator: FetchCoordinator::spawn(transport, hits_per_page),
			token: LivenessToken::new(),
		};
		session.dispatch(SessionEvent::Submitted);
		session
	}

	/// Update the pending input text. No fetch, no key change.
	pub fn on_term_change(&mut self, text: impl Into<String>) {
		self.dispatch(SessionEvent::TermChanged(text.into()));
	}

	/// Promote the pending term to the active key, fetching page 0 only when
	/// the cache has no entry for it.
	pub fn on_submit(&mut self) {
		self.dispatch(SessionEvent::Submitted);
	}

	/// Fetch the next page for the active key.
	pub fn on_load_more(&mut self) {
		self.dispatch(SessionEvent::LoadMoreRequested);
	}

	/// Dismiss a hit from the active key's results. Purely local.
	pub fn on_dismiss(&mut self, id: &str) {
		self.dispatch(SessionEvent::Dismissed(id.to_owned()));
	}

	/// Commit every settled outcome currently waiting on the channel.
	/// Returns whether any commit happened (i.e. the snapshot changed).
	pub fn pump(&mut self) -> bool {
		let mut committed = false;
		while let Some(settled) = self.coordinator.try_settle() {
			self.commit(settled);
			committed = true;
		}
		committed
	}

	/// Wait up to `timeout` for one outstanding request to settle and commit
	/// it. Returns false when nothing was outstanding or nothing committable
	/// arrived in time.
	pub fn pump_within(&mut self, timeout: Duration) -> bool {
		if self.coordinator.in_flight() == 0 {
			return false;
		}
		match self.coordinator.settle_within(timeout) {
			Some(settled) => {
				self.commit(settled);
				true
			}
			None => false,
		}
	}

	/// Whether any request is outstanding.
	#[must_use]
	pub fn is_fetching(&self) -> bool {
		self.coordinator.in_flight() > 0
	}

	/// Read-only projection for the renderer.
	#[must_use]
	pub fn snapshot(&self) -> SessionSnapshot<'_> {
		self.state.snapshot()
	}

	/// Derived lifecycle phase.
	#[must_use]
	pub fn phase(&self) -> SessionPhase {
		self.state.phase()
	}

	/// Tear the session down: revoke the liveness token so in-flight
	/// responses are discarded, and let the worker wind down.
	pub fn shutdown(&mut self) {
		self.token.revoke();
		self.coordinator.shutdown();
	}

	fn dispatch(&mut self, event: SessionEvent) {
		let Transition { next, fetch } = self.state.apply(event);
		self.state = next;
		if let Some(plan) = fetch {
			self.coordinator.request(&plan.term, plan.page, &self.token);
		}
	}

	fn commit(&mut self, settled: FetchSettled) {
		match settled.outcome {
			Ok(page) => self.dispatch(SessionEvent::PageSettled {
				key: settled.term,
				hits: page.hits,
				page: page.page,
			}),
			Err(error) => {
				debug!(term = %settled.term, %error, "page request failed");
				self.dispatch(SessionEvent::FetchFailed(error));
			}
		}
	}
}

impl Drop for SearchSession {
	fn drop(&mut self) {
		self.shutdown();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	use super::*;

	const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

	fn items(ids: &[&str]) -> Vec<Item> {
		ids.iter().copied().map(Item::new).collect()
	}

	/// Transport answering each call with the next scripted response and
	/// counting how many calls it served.
	struct ScriptedTransport {
		responses: Mutex<Vec<Result<ResultPage, TransportError>>>,
		calls: AtomicUsize,
	}

	impl ScriptedTransport {
		fn new(responses: Vec<Result<ResultPage, TransportError>>) -> Self {
			Self {
				responses: Mutex::new(responses),
				calls: AtomicUsize::new(0),
			}
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}

	impl Transport for &'static ScriptedTransport {
		fn fetch(
			&self,
			_term: &str,
			_page: u32,
			_hits_per_page: u32,
		) -> Result<ResultPage, TransportError> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			let mut responses = self.responses.lock().expect("script lock");
			if responses.is_empty() {
				Err(TransportError::Network("script exhausted".into()))
			} else {
				responses.remove(0)
			}
		}
	}

	fn scripted(
		responses: Vec<Result<ResultPage, TransportError>>,
	) -> &'static ScriptedTransport {
		Box::leak(Box::new(ScriptedTransport::new(responses)))
	}

	// Pure transition coverage.

	#[test]
	fn term_change_updates_only_the_pending_text() {
		let state = SessionState::new("redux");
		let Transition { next, fetch } =
			state.apply(SessionEvent::TermChanged("rust".into()));

		assert!(fetch.is_none());
		assert_eq!(next.snapshot().active_term, "rust");
		assert_eq!(next.snapshot().active_key, "");
	}

	#[test]
	fn submit_promotes_the_key_and_plans_the_initial_page() {
		let state = SessionState::new("redux");
		let Transition { next, fetch } = state.apply(SessionEvent::Submitted);

		assert_eq!(
			fetch,
			Some(FetchPlan {
				term: "redux".into(),
				page: 0
			})
		);
		assert_eq!(next.snapshot().active_key, "redux");
		assert!(next.snapshot().is_loading);
	}

	#[test]
	fn submit_reuses_cached_results_without_a_fetch() {
		let state = SessionState::new("redux");
		let state = state.apply(SessionEvent::Submitted).next;
		let state = state
			.apply(SessionEvent::PageSettled {
				key: "redux".into(),
				hits: items(&["a"]),
				page: 0,
			})
			.next;

		let Transition { next, fetch } = state.apply(SessionEvent::Submitted);
		assert!(fetch.is_none());
		assert!(!next.snapshot().is_loading);
		assert_eq!(next.snapshot().hits().len(), 1);
	}

	#[test]
	fn load_more_always_plans_the_next_page() {
		let state = SessionState::new("redux");
		let state = state.apply(SessionEvent::Submitted).next;
		let state = state
			.apply(SessionEvent::PageSettled {
				key: "redux".into(),
				hits: items(&["a"]),
				page: 0,
			})
			.next;

		let first = state.apply(SessionEvent::LoadMoreRequested);
		let second = state.apply(SessionEvent::LoadMoreRequested);
		let expected = Some(FetchPlan {
			term: "redux".into(),
			page: 1,
		});
		assert_eq!(first.fetch, expected);
		assert_eq!(second.fetch, expected);
	}

	#[test]
	fn settled_pages_merge_under_their_own_key_not_the_active_one() {
		let state = SessionState::new("redux");
		let state = state.apply(SessionEvent::Submitted).next;
		// User switches terms while the redux response is still in flight.
		let state = state.apply(SessionEvent::TermChanged("rust".into())).next;
		let state = state.apply(SessionEvent::Submitted).next;

		let state = state
			.apply(SessionEvent::PageSettled {
				key: "redux".into(),
				hits: items(&["a"]),
				page: 0,
			})
			.next;

		assert_eq!(state.snapshot().active_key, "rust");
		assert!(state.snapshot().hits().is_empty());
		assert_eq!(
			state.cache().get("redux").expect("redux entry").hits.len(),
			1
		);
	}

	#[test]
	fn out_of_order_settles_append_in_completion_order() {
		let state = SessionState::new("redux");
		let state = state.apply(SessionEvent::Submitted).next;
		let state = state
			.apply(SessionEvent::PageSettled {
				key: "redux".into(),
				hits: items(&["c"]),
				page: 1,
			})
			.next;
		let state = state
			.apply(SessionEvent::PageSettled {
				key: "redux".into(),
				hits: items(&["a", "b"]),
				page: 0,
			})
			.next;

		let snapshot = state.snapshot();
		let ids: Vec<&str> = snapshot
			.hits()
			.iter()
			.map(|item| item.id.as_str())
			.collect();
		assert_eq!(ids, ["c", "a", "b"]);
		assert_eq!(state.snapshot().page_number(), 0);
	}

	#[test]
	fn failure_records_the_error_and_leaves_the_cache_untouched() {
		let state = SessionState::new("rust");
		let state = state.apply(SessionEvent::Submitted).next;
		let state = state
			.apply(SessionEvent::FetchFailed(TransportError::Status(500)))
			.next;

		let snapshot = state.snapshot();
		assert!(!snapshot.is_loading);
		assert_eq!(snapshot.error, Some(&TransportError::Status(500)));
		assert!(state.cache().needs_fetch("rust"));
		assert_eq!(state.phase(), SessionPhase::Errored);
	}

	#[test]
	fn error_survives_a_failed_retry_and_clears_on_active_key_success() {
		let state = SessionState::new("rust");
		let state = state.apply(SessionEvent::Submitted).next;
		let state = state
			.apply(SessionEvent::FetchFailed(TransportError::Status(500)))
			.next;

		// Retry fails again: the newer error replaces, never clears.
		let state = state.apply(SessionEvent::LoadMoreRequested).next;
		let state = state
			.apply(SessionEvent::FetchFailed(TransportError::Status(503)))
			.next;
		assert_eq!(state.snapshot().error, Some(&TransportError::Status(503)));

		// Success for a non-active key leaves the error in place.
		let state = state
			.apply(SessionEvent::PageSettled {
				key: "redux".into(),
				hits: items(&["a"]),
				page: 0,
			})
			.next;
		assert!(state.snapshot().error.is_some());

		// Success for the active key finally clears it.
		let state = state
			.apply(SessionEvent::PageSettled {
				key: "rust".into(),
				hits: items(&["b"]),
				page: 0,
			})
			.next;
		assert!(state.snapshot().error.is_none());
		assert_eq!(state.phase(), SessionPhase::Ready);
	}

	#[test]
	fn dismiss_mutates_only_the_active_key() {
		let state = SessionState::new("redux");
		let state = state.apply(SessionEvent::Submitted).next;
		let state = state
			.apply(SessionEvent::PageSettled {
				key: "redux".into(),
				hits: items(&["shared"]),
				page: 0,
			})
			.next;
		let state = state
			.apply(SessionEvent::PageSettled {
				key: "rust".into(),
				hits: items(&["shared"]),
				page: 0,
			})
			.next;

		let state = state.apply(SessionEvent::Dismissed("shared".into())).next;
		assert!(state.snapshot().hits().is_empty());
		assert_eq!(
			state.cache().get("rust").expect("rust entry").hits.len(),
			1
		);
	}

	// Dispatcher coverage over a real worker thread.

	#[test]
	fn default_term_round_trip_populates_the_snapshot() {
		let transport = scripted(vec![Ok(ResultPage::new(items(&["a", "b"]), 0))]);
		let mut session = SearchSession::start(Box::new(transport), "redux", 100);

		assert!(session.pump_within(SETTLE_TIMEOUT));

		let snapshot = session.snapshot();
		let ids: Vec<&str> = snapshot.hits().iter().map(|item| item.id.as_str()).collect();
		assert_eq!(ids, ["a", "b"]);
		assert!(!snapshot.is_loading);
		assert!(snapshot.error.is_none());
		assert_eq!(session.phase(), SessionPhase::Ready);
	}

	#[test]
	fn load_more_then_dismiss_matches_the_accumulated_list() {
		let transport = scripted(vec![
			Ok(ResultPage::new(items(&["a", "b"]), 0)),
			Ok(ResultPage::new(items(&["c"]), 1)),
		]);
		let mut session = SearchSession::start(Box::new(transport), "redux", 100);
		assert!(session.pump_within(SETTLE_TIMEOUT));

		session.on_load_more();
		assert!(session.snapshot().is_loading);
		assert!(session.pump_within(SETTLE_TIMEOUT));

		let ids: Vec<String> = session
			.snapshot()
			.hits()
			.iter()
			.map(|item| item.id.clone())
			.collect();
		assert_eq!(ids, ["a", "b", "c"]);
		assert_eq!(session.snapshot().page_number(), 1);

		session.on_dismiss("b");
		let ids: Vec<String> = session
			.snapshot()
			.hits()
			.iter()
			.map(|item| item.id.clone())
			.collect();
		assert_eq!(ids, ["a", "c"]);
		assert_eq!(session.snapshot().page_number(), 1);
	}

	#[test]
	fn transport_rejection_surfaces_as_session_error_without_a_cache_entry() {
		let transport = scripted(vec![Err(TransportError::Network("boom".into()))]);
		let mut session = SearchSession::start(Box::new(transport), "rust", 100);

		assert!(session.pump_within(SETTLE_TIMEOUT));

		let snapshot = session.snapshot();
		assert!(snapshot.error.is_some());
		assert!(!snapshot.is_loading);
		assert!(snapshot.page.is_none());
	}

	#[test]
	fn resubmitting_a_settled_term_issues_no_second_fetch() {
		let transport = scripted(vec![Ok(ResultPage::new(items(&["a"]), 0))]);
		let mut session = SearchSession::start(Box::new(transport), "redux", 100);
		assert!(session.pump_within(SETTLE_TIMEOUT));
		assert_eq!(transport.calls(), 1);

		session.on_submit();
		assert!(!session.is_fetching());
		assert_eq!(transport.calls(), 1);
		assert_eq!(session.snapshot().hits().len(), 1);
	}

	#[test]
	fn outcome_settling_after_teardown_mutates_nothing() {
		let transport = scripted(vec![Ok(ResultPage::new(items(&["a"]), 0))]);
		let mut session = SearchSession::start(Box::new(transport), "redux", 100);

		session.shutdown();
		assert!(!session.pump_within(Duration::from_millis(250)));

		let snapshot = session.snapshot();
		assert!(snapshot.page.is_none());
		assert!(snapshot.error.is_none());
		// The loading flag was set when the request went out and must not be
		// touched by the discarded settle.
		assert!(snapshot.is_loading);
	}
}
