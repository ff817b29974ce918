//! Directory listing retrieval.
//!
//! A listing is the HTML index page for one `{year}/{day}` partition. Its
//! first table names the files available for that day.

mod error;
mod fetcher;
mod parser;

pub use error::ListingError;
pub use fetcher::ListingFetcher;
pub use parser::parse_listing;

/// Filenames published under one listing URL, in page order.
///
/// Duplicates are kept as found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    url: String,
    entries: Vec<String>,
}

impl Listing {
    /// Wraps parsed entries for `url`.
    pub fn new(url: impl Into<String>, entries: Vec<String>) -> Self {
        Self {
            url: url.into(),
            entries,
        }
    }

    /// The URL the listing was fetched from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// All entries.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the page named no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in page order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
