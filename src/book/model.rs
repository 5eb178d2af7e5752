//! Book records
//!
//! This module defines the single entity the application manages. The
//! serialized shape is a stable contract: shelves written by earlier
//! versions keep the exact field names `id, title, author, year,
//! isComplete` and must keep loading.

use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for a book.
///
/// Ids are wall-clock sized integers (unix milliseconds at creation
/// time), which keeps them compatible with previously written shelves.
/// Uniqueness is guaranteed by the shelf, not by the clock; see
/// [`crate::book::Bookshelf`].
pub type BookId = i64;

/// A single book on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Stable identifier, assigned at creation, immutable afterward.
    pub id: BookId,
    /// Display title. Non-empty expected but not enforced.
    pub title: String,
    /// Author name(s).
    pub author: String,
    /// Publication year. Older shelves sometimes stored this as a numeric
    /// string; reads accept both forms, writes always produce an integer.
    #[serde(deserialize_with = "year_compat")]
    pub year: i32,
    /// Whether the reader has finished the book.
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

impl Book {
    /// Create a book record with every field supplied by the caller.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        is_complete: bool,
    ) -> Self {
        Self { id, title: title.into(), author: author.into(), year, is_complete }
    }

    /// Case-insensitive title match. `needle_lower` must already be
    /// lowercased; an empty needle matches every title.
    pub fn title_contains(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }
}

/// The replaceable fields of a book: everything except `id`.
///
/// This is the payload the edit form and the `edit` subcommand produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub is_complete: bool,
}

impl BookFields {
    /// Capture the current fields of an existing book, e.g. to prefill
    /// an edit form.
    pub fn of(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            is_complete: book.is_complete,
        }
    }
}

/// Accept `1965` or `"1965"` for the year field and normalize to an
/// integer. Anything else is a malformed slot.
fn year_compat<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(year) => Ok(year),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
