use anyhow::Result;
use hns_tui::SearchOutcome;
use serde_json::json;

/// Print a plain-text representation of the exit selection.
pub(crate) fn print_plain(outcome: &SearchOutcome) {
	if !outcome.accepted {
		println!("Search cancelled (query: '{}')", outcome.query);
		return;
	}

	match &outcome.selection {
		Some(item) => println!("{}", item_link(item)),
		None => println!("No selection"),
	}
}

/// Format the exit selection as a JSON string.
pub(crate) fn format_outcome_json(outcome: &SearchOutcome) -> Result<String> {
	let selection = match &outcome.selection {
		Some(item) => serde_json::to_value(item)?,
		None => serde_json::Value::Null,
	};

	let payload = json!({
		"accepted": outcome.accepted,
		"query": outcome.query,
		"selection": selection,
	});

	Ok(serde_json::to_string_pretty(&payload)?)
}

/// Print the JSON representation of the exit selection.
pub(crate) fn print_json(outcome: &SearchOutcome) -> Result<()> {
	println!("{}", format_outcome_json(outcome)?);
	Ok(())
}

/// Stories without their own URL still have a discussion page on the site.
fn item_link(item: &hns_core::Item) -> String {
	item.url.clone().unwrap_or_else(|| {
		format!("https://news.ycombinator.com/item?id={}", item.id)
	})
}
