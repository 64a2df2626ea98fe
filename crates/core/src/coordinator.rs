//! Background coordination for page fetches.
//!
//! [`FetchCoordinator`] encapsulates communication with the transport worker
//! thread: requests go out over a command channel, settled outcomes come back
//! over an outcome channel, and each request carries the [`LivenessToken`] of
//! the session that issued it. An outcome whose token has been revoked by the
//! time it is drained is discarded wholesale, which is what keeps a response
//! that settles after teardown from mutating any session state.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError, channel};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::item::ResultPage;
use crate::transport::{Transport, TransportError};

/// Shared flag tying in-flight requests to the lifetime of their issuer.
///
/// The session revokes its token on teardown; the coordinator checks the
/// token before handing any settled outcome back for commit.
#[derive(Debug, Clone, Default)]
pub struct LivenessToken {
	live: Arc<AtomicBool>,
}

impl LivenessToken {
	/// A fresh, live token.
	#[must_use]
	pub fn new() -> Self {
		Self {
			live: Arc::new(AtomicBool::new(true)),
		}
	}

	/// Mark the owning context as torn down.
	pub fn revoke(&self) {
		self.live.store(false, AtomicOrdering::Release);
	}

	/// Whether the owning context is still live.
	#[must_use]
	pub fn is_live(&self) -> bool {
		self.live.load(AtomicOrdering::Acquire)
	}
}

/// Work sent to the transport worker.
enum FetchCommand {
	Fetch { id: u64, term: String, page: u32 },
	Shutdown,
}

/// Settled outcome of one page request, exactly one per request.
#[derive(Debug)]
pub struct FetchSettled {
	id: u64,
	/// Term the request was issued for; merges are scoped to it, not to
	/// whichever key happens to be active when the response arrives.
	pub term: String,
	pub outcome: Result<ResultPage, TransportError>,
}

/// Handle to the transport worker plus the in-flight bookkeeping.
pub struct FetchCoordinator {
	tx: Sender<FetchCommand>,
	rx: Receiver<FetchSettled>,
	next_id: u64,
	in_flight: HashMap<u64, LivenessToken>,
	hits_per_page: u32,
}

impl FetchCoordinator {
	/// Spawn the worker thread owning `transport` and return the coordinator
	/// wired to it.
	#[must_use]
	pub fn spawn(transport: Box<dyn Transport>, hits_per_page: u32) -> Self {
		let (cmd_tx, cmd_rx) = channel::<FetchCommand>();
		let (out_tx, out_rx) = channel::<FetchSettled>();

		thread::spawn(move || run_worker(transport.as_ref(), hits_per_page, &cmd_rx, &out_tx));

		Self {
			tx: cmd_tx,
			rx: out_rx,
			next_id: 0,
			in_flight: HashMap::new(),
			hits_per_page,
		}
	}

	/// Issue a page request on behalf of the context owning `token`.
	///
	/// The worker cannot be interrupted once it picks the request up; a
	/// revoked token only suppresses the commit.
	pub fn request(&mut self, term: &str, page: u32, token: &LivenessToken) {
		self.next_id = self.next_id.saturating_add(1);
		let id = self.next_id;
		self.in_flight.insert(id, token.clone());
		debug!(id, term, page, "issuing page request");
		let _ = self.tx.send(FetchCommand::Fetch {
			id,
			term: term.to_owned(),
			page,
		});
	}

	/// Number of requests issued but not yet drained.
	#[must_use]
	pub fn in_flight(&self) -> usize {
		self.in_flight.len()
	}

	/// Drain the next committable outcome without blocking.
	///
	/// Outcomes whose token was revoked are dropped silently; `None` means
	/// the channel is currently empty (or every pending outcome was stale).
	pub fn try_settle(&mut self) -> Option<FetchSettled> {
		loop {
			match self.rx.try_recv() {
				Ok(settled) => {
					if let Some(settled) = self.accept(settled) {
						return Some(settled);
					}
				}
				Err(TryRecvError::Empty | TryRecvError::Disconnected) => return None,
			}
		}
	}

	/// Like [`try_settle`](Self::try_settle) but waits up to `timeout` for an
	/// outcome to arrive. Used by headless callers and tests that need a
	/// deterministic settle point.
	pub fn settle_within(&mut self, timeout: Duration) -> Option<FetchSettled> {
		loop {
			match self.rx.recv_timeout(timeout) {
				Ok(settled) => {
					if let Some(settled) = self.accept(settled) {
						return Some(settled);
					}
				}
				Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
			}
		}
	}

	/// Ask the worker to exit once its current request finishes.
	pub fn shutdown(&self) {
		let _ = self.tx.send(FetchCommand::Shutdown);
	}

	fn accept(&mut self, settled: FetchSettled) -> Option<FetchSettled> {
		let live = self
			.in_flight
			.remove(&settled.id)
			.is_some_and(|token| token.is_live());
		if live {
			Some(settled)
		} else {
			debug!(id = settled.id, term = %settled.term, "discarding stale fetch outcome");
			None
		}
	}
}

impl Drop for FetchCoordinator {
	fn drop(&mut self) {
		self.shutdown();
	}
}

fn run_worker(
	transport: &dyn Transport,
	hits_per_page: u32,
	rx: &Receiver<FetchCommand>,
	tx: &Sender<FetchSettled>,
) {
	while let Ok(command) = rx.recv() {
		match command {
			FetchCommand::Fetch { id, term, page } => {
				let outcome = transport.fetch(&term, page, hits_per_page);
				if tx.send(FetchSettled { id, term, outcome }).is_err() {
					break;
				}
			}
			FetchCommand::Shutdown => break,
		}
	}
}
