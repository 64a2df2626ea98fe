//! Per-term result accumulation.
//!
//! [`QueryCache`] maps each search term, verbatim, to the [`ResultPage`]
//! accumulated for it so far. Every operation is pure: it leaves `self`
//! untouched and returns the successor cache, so a reader holding a snapshot
//! never observes a half-merged state.

use std::collections::HashMap;

use crate::item::{Item, ResultPage};

/// Copy-on-write mapping from search term to its accumulated results.
///
/// Keys are added lazily on the first successful fetch for a term and are
/// never removed for the lifetime of the session.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
	entries: HashMap<String, ResultPage>,
}

impl QueryCache {
	/// An empty cache.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Append `hits` to the accumulator for `key` and record `page` as its
	/// most recent page number. Creates the entry if this is the first page
	/// merged for `key`; every other key is carried over unchanged.
	#[must_use]
	pub fn merge(&self, key: &str, hits: Vec<Item>, page: u32) -> Self {
		let mut entries = self.entries.clone();
		let entry = entries.entry(key.to_owned()).or_default();
		entry.hits.extend(hits);
		entry.page = page;
		Self { entries }
	}

	/// Drop every hit under `key` whose identifier equals `id`, preserving
	/// the recorded page number. A no-op when `key` has no entry.
	#[must_use]
	pub fn remove_item(&self, key: &str, id: &str) -> Self {
		let mut entries = self.entries.clone();
		if let Some(entry) = entries.get_mut(key) {
			entry.hits.retain(|item| item.id != id);
		}
		Self { entries }
	}

	/// Whether a page-0 fetch is required for `key`.
	///
	/// Absence of an entry is the sole criterion: a term is fetched at most
	/// once per session unless further pages are explicitly requested.
	#[must_use]
	pub fn needs_fetch(&self, key: &str) -> bool {
		!self.entries.contains_key(key)
	}

	/// The accumulated results for `key`, if any page has been merged.
	#[must_use]
	pub fn get(&self, key: &str) -> Option<&ResultPage> {
		self.entries.get(key)
	}

	/// Most recently merged page number for `key`, or 0 when absent.
	#[must_use]
	pub fn current_page(&self, key: &str) -> u32 {
		self.entries.get(key).map_or(0, |entry| entry.page)
	}

	/// Number of cached terms.
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether any term has been cached yet.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
