//! Rendering pipeline for the search session.

use hns_core::SessionSnapshot;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table};
use throbber_widgets_tui::Throbber;
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const HIGHLIGHT_SYMBOL: &str = "▶ ";
const INPUT_TITLE: &str = "Search by title";
const TABLE_HEADERS: [&str; 4] = ["Title", "Points", "Comments", "Author"];
const KEY_HINTS: &str =
	"enter submit · ctrl-l more · ctrl-d dismiss · ctrl-o open · esc quit";

impl App {
	/// Draw the whole UI for one frame.
	pub fn draw(&mut self, frame: &mut Frame) {
		let chunks = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(3),
				Constraint::Min(3),
				Constraint::Length(1),
			])
			.split(frame.area());

		self.draw_input(frame, chunks[0]);
		if self.snapshot().error.is_some() {
			Self::draw_error(frame, chunks[1]);
		} else {
			self.draw_results(frame, chunks[1]);
		}
		self.draw_status(frame, chunks[2]);
	}

	fn draw_input(&self, frame: &mut Frame, area: Rect) {
		let snapshot = self.snapshot();
		let input = Paragraph::new(Line::from(vec![
			Span::raw(snapshot.active_term.to_owned()),
			Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
		]))
		.block(
			Block::default()
				.borders(Borders::ALL)
				.border_set(ratatui::symbols::border::ROUNDED)
				.title(INPUT_TITLE),
		);
		frame.render_widget(input, area);
	}

	fn draw_results(&mut self, frame: &mut Frame, area: Rect) {
		let snapshot = self.session.snapshot();
		let title_width = usize::from(area.width).saturating_sub(30).max(20);

		let rows: Vec<Row<'_>> = snapshot
			.hits()
			.iter()
			.map(|item| {
				let title = item.title.as_deref().unwrap_or("(untitled)");
				Row::new(vec![
					Cell::from(truncate_to_width(title, title_width)),
					Cell::from(display_count(item.points)),
					Cell::from(display_count(item.num_comments)),
					Cell::from(item.author.clone().unwrap_or_else(|| "-".into())),
				])
			})
			.collect();

		let header = Row::new(TABLE_HEADERS.map(Cell::from))
			.style(Style::default().add_modifier(Modifier::BOLD))
			.height(1)
			.bottom_margin(1);

		let table = Table::new(
			rows,
			[
				Constraint::Fill(1),
				Constraint::Length(7),
				Constraint::Length(9),
				Constraint::Length(16),
			],
		)
		.header(header)
		.highlight_spacing(HighlightSpacing::WhenSelected)
		.row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
		.highlight_symbol(HIGHLIGHT_SYMBOL)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.border_set(ratatui::symbols::border::ROUNDED)
				.title(format!("Results · {}", snapshot.active_key)),
		);

		frame.render_stateful_widget(table, area, &mut self.table_state);
	}

	fn draw_error(frame: &mut Frame, area: Rect) {
		// The list is withheld while an error is present; only the generic
		// failure indicator is shown.
		let message = Paragraph::new("Something went wrong.")
			.style(Style::default().fg(Color::Red))
			.block(
				Block::default()
					.borders(Borders::ALL)
					.border_set(ratatui::symbols::border::ROUNDED)
					.title("Error"),
			);
		frame.render_widget(message, area);
	}

	fn draw_status(&mut self, frame: &mut Frame, area: Rect) {
		let snapshot = self.session.snapshot();
		let summary = format!(
			" {} hits · page {} · {}",
			snapshot.hits().len(),
			snapshot.page_number(),
			KEY_HINTS
		);

		if snapshot.is_loading {
			let throbber = Throbber::default().label(summary);
			frame.render_stateful_widget(throbber, area, &mut self.throbber_state);
		} else {
			frame.render_widget(Paragraph::new(summary), area);
		}
	}
}

/// Truncate `text` to at most `max_width` columns, appending an ellipsis when
/// anything was cut.
fn truncate_to_width(text: &str, max_width: usize) -> String {
	if text.width() <= max_width {
		return text.to_owned();
	}

	let mut truncated = String::new();
	let mut used = 0;
	for ch in text.chars() {
		let ch_width = ch.to_string().width();
		if used + ch_width > max_width.saturating_sub(1) {
			break;
		}
		truncated.push(ch);
		used += ch_width;
	}
	truncated.push('…');
	truncated
}

fn display_count(value: Option<u64>) -> String {
	value.map_or_else(|| "-".into(), |count| count.to_string())
}

#[cfg(test)]
mod tests {
	use hns_core::{Item, ResultPage, Transport, TransportError};
	use ratatui::Terminal;
	use ratatui::backend::TestBackend;

	use super::*;

	struct OneStoryTransport;

	impl Transport for OneStoryTransport {
		fn fetch(
			&self,
			_term: &str,
			page: u32,
			_hits_per_page: u32,
		) -> Result<ResultPage, TransportError> {
			Ok(ResultPage::new(
				vec![Item::new("1").with_title("Learning Rust the hard way")],
				page,
			))
		}
	}

	struct FailingTransport;

	impl Transport for FailingTransport {
		fn fetch(
			&self,
			_term: &str,
			_page: u32,
			_hits_per_page: u32,
		) -> Result<ResultPage, TransportError> {
			Err(TransportError::Status(503))
		}
	}

	fn rendered_view(transport: Box<dyn Transport>) -> String {
		let mut app = App::new(transport, "redux", 100);
		let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
		while app.session.is_fetching() && std::time::Instant::now() < deadline {
			std::thread::sleep(std::time::Duration::from_millis(5));
			app.pump_session();
		}

		let mut terminal = Terminal::new(TestBackend::new(80, 16)).expect("test terminal");
		terminal.draw(|frame| app.draw(frame)).expect("draw");
		terminal.backend().to_string()
	}

	#[test]
	fn settled_results_render_the_story_title_and_term() {
		let view = rendered_view(Box::new(OneStoryTransport));
		assert!(view.contains("Learning Rust the hard way"), "view:\n{view}");
		assert!(view.contains("Results · redux"), "view:\n{view}");
		assert!(view.contains("1 hits · page 0"), "view:\n{view}");
	}

	#[test]
	fn errors_replace_the_result_table_with_the_failure_banner() {
		let view = rendered_view(Box::new(FailingTransport));
		assert!(view.contains("Something went wrong."), "view:\n{view}");
		assert!(!view.contains("Results ·"), "view:\n{view}");
	}

	#[test]
	fn truncation_respects_display_width() {
		assert_eq!(truncate_to_width("short", 20), "short");
		let cut = truncate_to_width("a very long story title indeed", 10);
		assert!(cut.ends_with('…'));
		assert!(cut.width() <= 10);
	}
}
