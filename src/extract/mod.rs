//! Extraction of structured data from fetched pages
//!
//! This module contains:
//! - The identifier scanner that pulls `KEYWORD-NNN` codes out of free text
//! - A narrow query view over parsed HTML
//! - Listing page extraction (thread links and month buckets)
//! - Thread page extraction (title, publish time, identifier codes)

mod detail;
mod document;
mod listing;
mod scanner;

pub use detail::{DetailExtractor, DetailRecord};
pub use document::{attr_of, closest, text_of, DocumentView, PageSelectors};
pub use listing::{bucket_key, join_detail_uri, ListEntry, ListExtractor};
pub use scanner::{scan, IdentifierSet};
