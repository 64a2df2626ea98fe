use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Command-line arguments accepted by the `hns` binary.
#[derive(Parser, Debug)]
#[command(
	name = "hns",
	version,
	about = "Search Hacker News stories from the terminal"
)]
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "HNS_CONFIG",
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'q',
		long,
		value_name = "TERM",
		help = "Initial search term (default: 'redux')"
	)]
	pub(crate) query: Option<String>,
	#[arg(
		long,
		value_name = "URL",
		help = "Base URL of the search endpoint (default: the public HN index)"
	)]
	pub(crate) endpoint: Option<String>,
	#[arg(
		long = "hits-per-page",
		value_name = "N",
		help = "Fixed page size requested from the index (default: 100)"
	)]
	pub(crate) hits_per_page: Option<u32>,
	#[arg(
		short = 'o',
		long,
		value_enum,
		default_value = "plain",
		help = "Format used to print the exit selection (default: plain)"
	)]
	pub(crate) output: OutputFormat,
	#[arg(
		long = "log-file",
		value_name = "FILE",
		help = "Append tracing output to this file (default: logging disabled)"
	)]
	pub(crate) log_file: Option<PathBuf>,
	#[arg(long = "print-config", help = "Print the resolved configuration")]
	pub(crate) print_config: bool,
}

/// Output format for the selection printed on exit.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum OutputFormat {
	#[default]
	Plain,
	Json,
}

/// Parse CLI arguments from the process environment.
pub(crate) fn parse_cli() -> CliArgs {
	CliArgs::parse()
}
