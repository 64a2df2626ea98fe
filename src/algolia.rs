//! Concrete [`Transport`] against the Algolia Hacker News search API.

use std::time::Duration;

use hns_core::{ResultPage, Transport, TransportError};

/// Base URL of the public Hacker News search API.
pub const DEFAULT_ENDPOINT: &str = "https://hn.algolia.com/api/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP client for the search endpoint.
///
/// Lives on the fetch coordinator's worker thread, so blocking calls are
/// fine here.
pub struct AlgoliaTransport {
	agent: ureq::Agent,
	base: String,
}

impl AlgoliaTransport {
	/// Build a transport against `base` (trailing slashes are tolerated).
	#[must_use]
	pub fn new(base: impl Into<String>) -> Self {
		let base = base.into();
		Self {
			agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
			base: base.trim_end_matches('/').to_owned(),
		}
	}

	fn search_url(&self) -> String {
		format!("{}/search", self.base)
	}
}

impl Transport for AlgoliaTransport {
	fn fetch(
		&self,
		term: &str,
		page: u32,
		hits_per_page: u32,
	) -> Result<ResultPage, TransportError> {
		let response = self
			.agent
			.get(&self.search_url())
			.query("query", term)
			.query("page", &page.to_string())
			.query("hitsPerPage", &hits_per_page.to_string())
			.call()
			.map_err(|err| match err {
				ureq::Error::Status(code, _) => TransportError::Status(code),
				ureq::Error::Transport(transport) => {
					TransportError::Network(transport.to_string())
				}
			})?;

		response
			.into_json::<ResultPage>()
			.map_err(|err| TransportError::Payload(err.to_string()))
	}
}
