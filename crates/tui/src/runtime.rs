//! Application runtime and event loop.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use hns_core::Transport;
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use crate::app::{App, SearchOutcome};

/// Construct an [`App`] over `transport` and run it to completion.
pub fn run(
	transport: Box<dyn Transport>,
	initial_term: impl Into<String>,
	hits_per_page: u32,
) -> Result<SearchOutcome> {
	let mut app = App::new(transport, initial_term, hits_per_page);
	app.run()
}

impl App {
	/// Pump the terminal event loop until the user exits with an outcome.
	pub fn run(&mut self) -> Result<SearchOutcome> {
		let mut terminal = ratatui::init();
		terminal.clear()?;

		let (event_tx, event_rx) = mpsc::channel();
		let event_loop_running = Arc::new(AtomicBool::new(true));
		let event_loop_flag = Arc::clone(&event_loop_running);

		let event_thread = thread::spawn(move || -> Result<()> {
			while event_loop_flag.load(Ordering::Relaxed) {
				if event::poll(Duration::from_millis(50))? {
					let event = event::read()?;
					if event_tx.send(event).is_err() {
						break;
					}
				}
			}
			Ok(())
		});

		let mut pending_events = VecDeque::new();

		let result: Result<SearchOutcome> = 'event_loop: loop {
			loop {
				match event_rx.try_recv() {
					Ok(event) => pending_events.push_back(event),
					Err(mpsc::TryRecvError::Empty) => break,
					Err(mpsc::TryRecvError::Disconnected) => {
						break 'event_loop Err(anyhow!("input event channel disconnected"));
					}
				}
			}

			let mut maybe_outcome = None;
			while let Some(event) = pending_events.pop_front() {
				match event {
					Event::Key(key) if key.kind == KeyEventKind::Press => {
						if let Some(outcome) = self.handle_key(key) {
							maybe_outcome = Some(outcome);
							break;
						}
					}
					_ => {}
				}
			}

			if let Some(outcome) = maybe_outcome {
				break Ok(outcome);
			}

			self.pump_session();
			self.throbber_state.calc_next();

			terminal.draw(|frame| self.draw(frame))?;

			thread::sleep(Duration::from_millis(16));
		};

		ratatui::restore();

		event_loop_running.store(false, Ordering::Relaxed);
		match event_thread.join() {
			Ok(join_result) => join_result?,
			Err(err) => std::panic::resume_unwind(err),
		}

		result
	}
}
