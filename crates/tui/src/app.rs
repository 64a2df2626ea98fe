//! Aggregate state for the terminal front-end.

use hns_core::{Item, SearchSession, SessionSnapshot, Transport};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;
use throbber_widgets_tui::ThrobberState;

use crate::input::QueryInput;

/// What the user left the session with when the UI exited.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
	/// False when the user bailed out with `Esc`.
	pub accepted: bool,
	/// Active search key at exit time.
	pub query: String,
	/// Row selected at exit time, if any.
	pub selection: Option<Item>,
}

/// The terminal application: one search session plus UI affordances.
pub struct App {
	pub(crate) session: SearchSession,
	pub(crate) input: QueryInput,
	pub(crate) table_state: TableState,
	pub(crate) throbber_state: ThrobberState,
}

impl App {
	/// Start a session over `transport` for `initial_term` and wrap it in an
	/// app ready to run.
	#[must_use]
	pub fn new(
		transport: Box<dyn Transport>,
		initial_term: impl Into<String>,
		hits_per_page: u32,
	) -> Self {
		let initial_term = initial_term.into();
		Self {
			session: SearchSession::start(transport, initial_term.clone(), hits_per_page),
			input: QueryInput::new(initial_term),
			table_state: TableState::default(),
			throbber_state: ThrobberState::default(),
		}
	}

	/// Current read-only session snapshot.
	#[must_use]
	pub fn snapshot(&self) -> SessionSnapshot<'_> {
		self.session.snapshot()
	}

	/// Commit any settled fetches and keep the row selection valid.
	pub fn pump_session(&mut self) {
		if self.session.pump() {
			self.ensure_selection();
		}
	}

	/// Translate one key press into session callbacks.
	///
	/// Returns the exit outcome once the user leaves the UI.
	pub fn handle_key(&mut self, key: KeyEvent) -> Option<SearchOutcome> {
		if key.modifiers.contains(KeyModifiers::CONTROL) {
			match key.code {
				KeyCode::Char('c') => return Some(self.outcome(false)),
				KeyCode::Char('o') => return Some(self.outcome(true)),
				KeyCode::Char('l') => self.session.on_load_more(),
				KeyCode::Char('d') => self.dismiss_selected(),
				KeyCode::Char('u') => {
					self.input.clear();
					self.session.on_term_change(self.input.text());
				}
				_ => {}
			}
			return None;
		}

		match key.code {
			KeyCode::Esc => return Some(self.outcome(false)),
			KeyCode::Enter => self.session.on_submit(),
			KeyCode::Up => self.move_selection(-1),
			KeyCode::Down => self.move_selection(1),
			KeyCode::Backspace => {
				self.input.pop();
				self.session.on_term_change(self.input.text());
			}
			KeyCode::Char(ch) => {
				self.input.push(ch);
				self.session.on_term_change(self.input.text());
			}
			_ => {}
		}
		None
	}

	/// Drop the selected row from the active key's results.
	pub(crate) fn dismiss_selected(&mut self) {
		let Some(id) = self.selected_item().map(|item| item.id) else {
			return;
		};
		self.session.on_dismiss(&id);
		self.ensure_selection();
	}

	/// Clamp the selection to the currently displayed hits.
	pub(crate) fn ensure_selection(&mut self) {
		let len = self.snapshot().hits().len();
		if len == 0 {
			self.table_state.select(None);
			return;
		}
		let selected = self.table_state.selected().unwrap_or(0).min(len - 1);
		self.table_state.select(Some(selected));
	}

	fn move_selection(&mut self, delta: isize) {
		let len = self.snapshot().hits().len();
		if len == 0 {
			return;
		}
		let current = self.table_state.selected().unwrap_or(0) as isize;
		let next = (current + delta).clamp(0, len as isize - 1) as usize;
		self.table_state.select(Some(next));
	}

	fn selected_item(&self) -> Option<Item> {
		let index = self.table_state.selected()?;
		self.snapshot().hits().get(index).cloned()
	}

	fn outcome(&self, accepted: bool) -> SearchOutcome {
		SearchOutcome {
			accepted,
			query: self.snapshot().active_key.to_owned(),
			selection: self.selected_item(),
		}
	}
}
