use std::path::PathBuf;

use hns::DEFAULT_ENDPOINT;
use hns_core::DEFAULT_HITS_PER_PAGE;
use serde::Deserialize;

use super::resolved::ResolvedConfig;
use crate::cli::CliArgs;

const DEFAULT_QUERY: &str = "redux";
const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration exactly as deserialized from files and environment, before
/// CLI overrides and defaulting.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	query: Option<String>,
	endpoint: Option<String>,
	hits_per_page: Option<u32>,
	log_file: Option<PathBuf>,
	log_filter: Option<String>,
}

impl RawConfig {
	/// CLI flags take precedence over every file and environment source.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(query) = &cli.query {
			self.query = Some(query.clone());
		}
		if let Some(endpoint) = &cli.endpoint {
			self.endpoint = Some(endpoint.clone());
		}
		if let Some(hits_per_page) = cli.hits_per_page {
			self.hits_per_page = Some(hits_per_page);
		}
		if let Some(log_file) = &cli.log_file {
			self.log_file = Some(log_file.clone());
		}
	}

	/// Fill in defaults for everything left unset.
	pub(super) fn resolve(self) -> ResolvedConfig {
		ResolvedConfig {
			query: self.query.unwrap_or_else(|| DEFAULT_QUERY.to_owned()),
			endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
			hits_per_page: self.hits_per_page.unwrap_or(DEFAULT_HITS_PER_PAGE),
			log_file: self.log_file,
			log_filter: self
				.log_filter
				.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
		}
	}
}
