use anyhow::Result;
use hns::AlgoliaTransport;
use hns_tui::{App, SearchOutcome};

use crate::settings::ResolvedConfig;

/// Coordinates building and running the interactive search experience.
pub(crate) struct SearchWorkflow {
	app: App,
}

impl SearchWorkflow {
	pub(crate) fn from_config(config: ResolvedConfig) -> Self {
		let ResolvedConfig {
			query,
			endpoint,
			hits_per_page,
			..
		} = config;

		let transport = AlgoliaTransport::new(endpoint);
		Self {
			app: App::new(Box::new(transport), query, hits_per_page),
		}
	}

	pub(crate) fn run(mut self) -> Result<SearchOutcome> {
		self.app.run()
	}
}
