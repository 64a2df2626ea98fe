mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use settings::ResolvedConfig;
use workflow::SearchWorkflow;

fn main() -> Result<()> {
	let cli = parse_cli();
	let resolved = settings::load(&cli)?;

	if cli.print_config {
		resolved.print_summary();
	}

	hns::logging::initialize(&resolved.log_filter, resolved.log_file.as_deref())?;
	tracing::info!(query = %resolved.query, endpoint = %resolved.endpoint, "starting session");

	run_search(cli.output, resolved)
}

/// Execute the search session and print the exit selection in the chosen
/// format.
fn run_search(format: OutputFormat, settings: ResolvedConfig) -> Result<()> {
	let workflow = SearchWorkflow::from_config(settings);
	let outcome = workflow.run()?;

	match format {
		OutputFormat::Plain => print_plain(&outcome),
		OutputFormat::Json => print_json(&outcome)?,
	}

	Ok(())
}
