//! Logging setup for the terminal application.
//!
//! The TUI owns stdout and stderr, so tracing output only goes anywhere when
//! a log file is configured; without one, initialization is a no-op.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const FILTER_ENV: &str = "HNS_LOG";

/// Install the global tracing subscriber writing to `file`.
///
/// The `HNS_LOG` environment variable overrides the configured filter.
pub fn initialize(filter: &str, file: Option<&Path>) -> Result<()> {
	let Some(path) = file else {
		return Ok(());
	};

	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(path)
		.with_context(|| format!("failed to open log file {}", path.display()))?;

	let filter = EnvFilter::try_from_env(FILTER_ENV)
		.or_else(|_| EnvFilter::try_new(filter))
		.with_context(|| format!("invalid log filter '{filter}'"))?;

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(Mutex::new(file))
		.with_ansi(false)
		.init();

	Ok(())
}
