//! Thread page extraction
//!
//! A thread page becomes a `DetailRecord` only if at least one detail
//! keyword produces a valid identifier code in its body.

use crate::crawler::FetchedPage;
use crate::extract::document::{DocumentView, PageSelectors};
use crate::extract::scanner::{scan, IdentifierSet};

/// One harvested thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    /// The requested thread URI
    pub url: String,
    /// Thread title
    pub title: String,
    /// Publish time as displayed on the page; only used as a sort key
    pub published_at: String,
    /// Detail keywords that produced at least one code, in configured order
    pub matched_keywords: Vec<String>,
    /// Normalized identifier codes, in discovery order
    pub identifiers: IdentifierSet,
}

/// Turns thread pages into `DetailRecord` values
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    selectors: PageSelectors,
    keywords: Vec<String>,
}

impl DetailExtractor {
    pub fn new(selectors: PageSelectors, keywords: Vec<String>) -> Self {
        Self {
            selectors,
            keywords,
        }
    }

    /// Builds the record for one thread page, if it carries any codes
    pub fn extract(&self, page: &FetchedPage) -> Option<DetailRecord> {
        let mut matched_keywords = Vec::new();
        let mut identifiers = IdentifierSet::new();

        for keyword in &self.keywords {
            if !page.body.contains(keyword.as_str()) {
                continue;
            }

            let found = scan(&page.body, keyword);
            if found.is_empty() {
                continue;
            }

            matched_keywords.push(keyword.clone());
            identifiers.union(found);
        }

        if matched_keywords.is_empty() {
            tracing::debug!("No identifiers on {}", page.request_uri);
            return None;
        }

        let document = DocumentView::parse(&page.body);
        let title = document
            .first_text(&self.selectors.title)
            .unwrap_or_default();
        let published_at = document
            .first_text(&self.selectors.published)
            .map(|text| skip_chars(&text, self.selectors.published_skip_chars))
            .unwrap_or_default();

        Some(DetailRecord {
            url: page.request_uri.clone(),
            title,
            published_at,
            matched_keywords,
            identifiers,
        })
    }
}

/// Drops the first `count` characters (a label such as `Posted: `)
fn skip_chars(text: &str, count: usize) -> String {
    text.chars().skip(count).collect::<String>().trim().to_string()
}
