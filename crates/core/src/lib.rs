//! Result cache and fetch coordination for paginated keyword search.
//!
//! The crate is the stateful core behind the `hns` terminal client: it keeps
//! one accumulated [`ResultPage`] per search term, decides when a network
//! fetch is actually necessary, and commits settled responses without ever
//! letting a stale response mutate a torn-down session.
//!
//! The pieces compose bottom-up:
//!
//! - [`Item`] and [`ResultPage`] describe the data returned by the index.
//! - [`QueryCache`] holds the per-term accumulators and exposes pure
//!   copy-on-write operations over them.
//! - [`FetchCoordinator`] owns the background worker that performs the
//!   blocking transport call and funnels settled outcomes back over a
//!   channel, discarding anything whose [`LivenessToken`] was revoked.
//! - [`SearchSession`] is a thin dispatcher over the pure
//!   [`SessionState`] transitions and derives the renderable
//!   [`SessionSnapshot`].

pub mod cache;
pub mod coordinator;
pub mod item;
pub mod session;
pub mod transport;

pub use cache::QueryCache;
pub use coordinator::{FetchCoordinator, FetchSettled, LivenessToken};
pub use item::{Item, ResultPage};
pub use session::{
	FetchPlan, SearchSession, SessionEvent, SessionPhase, SessionSnapshot, SessionState,
	Transition,
};
pub use transport::{DEFAULT_HITS_PER_PAGE, Transport, TransportError};
