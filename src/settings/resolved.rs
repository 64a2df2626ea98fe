use std::path::PathBuf;

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
	/// Term submitted when the session starts.
	pub(crate) query: String,
	/// Base URL of the search endpoint.
	pub(crate) endpoint: String,
	/// Fixed page size sent with every request.
	pub(crate) hits_per_page: u32,
	/// Log destination; logging stays disabled without one.
	pub(crate) log_file: Option<PathBuf>,
	/// Default tracing filter when `HNS_LOG` is unset.
	pub(crate) log_filter: String,
}

impl ResolvedConfig {
	/// Print a human-readable summary of the effective configuration.
	pub(crate) fn print_summary(&self) {
		println!("query: {}", self.query);
		println!("endpoint: {}", self.endpoint);
		println!("hits_per_page: {}", self.hits_per_page);
		match &self.log_file {
			Some(path) => println!("log_file: {}", path.display()),
			None => println!("log_file: (disabled)"),
		}
		println!("log_filter: {}", self.log_filter);
	}
}
