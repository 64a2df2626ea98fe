//! Data returned by the search index.

use serde::{Deserialize, Serialize};

/// One story returned by the search index.
///
/// Everything beyond the identifier is display data and may be absent in the
/// wild (comment hits carry no `title`, job postings no `points`), so the
/// display fields stay optional and are rendered with placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
	/// Stable identifier assigned by the index. Dismissals match on this.
	#[serde(rename = "objectID")]
	pub id: String,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub author: Option<String>,
	#[serde(default)]
	pub points: Option<u64>,
	#[serde(default)]
	pub num_comments: Option<u64>,
}

impl Item {
	/// Construct an item carrying only an identifier.
	#[must_use]
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: None,
			url: None,
			author: None,
			points: None,
			num_comments: None,
		}
	}

	/// Attach a title, mainly useful when building fixtures.
	#[must_use]
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}
}

/// Accumulated hits plus the most recent page index for one search key.
///
/// `hits` grows append-only as further pages are merged; `page` always
/// reflects the most recently merged response, not the number of pages held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
	#[serde(default)]
	pub hits: Vec<Item>,
	#[serde(default)]
	pub page: u32,
}

impl ResultPage {
	/// Build a page from its parts.
	#[must_use]
	pub fn new(hits: Vec<Item>, page: u32) -> Self {
		Self { hits, page }
	}
}
