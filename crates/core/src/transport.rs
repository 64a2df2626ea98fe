//! The boundary to the external search index.

use thiserror::Error;

use crate::item::ResultPage;

/// Page size requested from the index when none is configured.
pub const DEFAULT_HITS_PER_PAGE: u32 = 100;

/// Failure surfaced by the search transport.
///
/// The session does not distinguish further: any variant ends up as the
/// session-level error state and is rendered as a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
	/// The request never produced an HTTP response.
	#[error("search request failed: {0}")]
	Network(String),
	/// The endpoint answered with a non-success status.
	#[error("search endpoint returned HTTP {0}")]
	Status(u16),
	/// The response body did not decode into a result page.
	#[error("malformed search payload: {0}")]
	Payload(String),
}

/// Blocking page fetch against the external search index.
///
/// Implementations run on the coordinator's worker thread, so a call may
/// block; it must eventually return exactly one of success or failure.
pub trait Transport: Send {
	/// Fetch one page of hits for `term`.
	fn fetch(
		&self,
		term: &str,
		page: u32,
		hits_per_page: u32,
	) -> Result<ResultPage, TransportError>;
}
