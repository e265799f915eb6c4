//! Listing page extraction
//!
//! A listing page is a forum index: one row per thread with the thread link
//! and its display date. Threads whose title contains a link keyword become
//! `ListEntry` values keyed by the month they were posted in.

use crate::crawler::FetchedPage;
use crate::extract::document::{attr_of, closest, text_of, DocumentView, PageSelectors};
use url::Url;

/// A thread discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// `YYYYMM` derived from the thread's display date
    pub bucket_key: String,
    /// Absolute thread URI
    pub uri: String,
}

/// Turns listing pages into `ListEntry` values
#[derive(Debug, Clone)]
pub struct ListExtractor {
    selectors: PageSelectors,
    detail_base_uri: String,
    link_keywords: Vec<String>,
}

impl ListExtractor {
    pub fn new(
        selectors: PageSelectors,
        detail_base_uri: impl Into<String>,
        link_keywords: Vec<String>,
    ) -> Self {
        Self {
            selectors,
            detail_base_uri: detail_base_uri.into(),
            link_keywords,
        }
    }

    /// Extracts the matching thread entries of one listing page
    ///
    /// Entries come back in document order. A page without any anchors (a
    /// login wall, an error page) yields an empty list.
    pub fn extract(&self, page: &FetchedPage) -> Vec<ListEntry> {
        let document = DocumentView::parse(&page.body);
        let mut entries = Vec::new();

        for anchor in document.select(&self.selectors.anchor) {
            if !self.has_link_keyword(&text_of(anchor)) {
                continue;
            }

            let Some(href) = attr_of(anchor, "href") else {
                continue;
            };

            let date_text = closest(anchor, &self.selectors.row)
                .and_then(|row| row.select(&self.selectors.date).next())
                .map(|date| text_of(date).trim().to_string())
                .unwrap_or_default();

            entries.push(ListEntry {
                bucket_key: bucket_key(&date_text),
                uri: join_detail_uri(&self.detail_base_uri, href),
            });
        }

        if entries.is_empty() {
            tracing::debug!("No matching threads on {}", page.request_uri);
        }

        entries
    }

    fn has_link_keyword(&self, text: &str) -> bool {
        self.link_keywords
            .iter()
            .any(|keyword| text.contains(keyword.as_str()))
    }
}

/// Collapses a `YYYY-MM-DD` display date to its `YYYYMM` bucket key
///
/// Shorter strings give a shorter key rather than an error.
pub fn bucket_key(date_text: &str) -> String {
    let chars: Vec<char> = date_text.chars().collect();
    let year = chars.iter().take(4);
    let month = chars.iter().skip(5).take(2);
    year.chain(month).collect()
}

/// Joins a thread href onto the detail base URI
///
/// Absolute http(s) hrefs are returned as they are.
pub fn join_detail_uri(base: &str, href: &str) -> String {
    let href = href.trim();

    if let Ok(url) = Url::parse(href) {
        if url.scheme() == "http" || url.scheme() == "https" {
            return href.to_string();
        }
    }

    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;

    const LISTING: &str = r#"<html><body><table>
        <tr class="tr3">
            <td><h3><a href="read.php?tid=101">[Weekly] CLUB picks</a></h3></td>
            <td><a class="f10">2023-11-05</a></td>
        </tr>
        <tr class="tr3">
            <td><h3><a href="read.php?tid=102">Off topic chatter</a></h3></td>
            <td><a class="f10">2023-11-06</a></td>
        </tr>
        <tr class="tr3">
            <td><h3><a href="/read.php?tid=103">[Weekly] December roundup</a></h3></td>
            <td><a class="f10"> 2023-12-01 </a></td>
        </tr>
    </table></body></html>"#;

    fn extractor() -> ListExtractor {
        ListExtractor::new(
            PageSelectors::compile(&SelectorConfig::default()).unwrap(),
            "http://forum.example/pw/",
            vec!["Weekly".to_string()],
        )
    }

    fn page(body: &str) -> FetchedPage {
        FetchedPage {
            request_uri: "http://forum.example/pw/thread.php?fid=3&page=1".to_string(),
            final_uri: "http://forum.example/pw/thread.php?fid=3&page=1".to_string(),
            status_code: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_extracts_matching_entries_in_order() {
        let entries = extractor().extract(&page(LISTING));

        assert_eq!(
            entries,
            vec![
                ListEntry {
                    bucket_key: "202311".to_string(),
                    uri: "http://forum.example/pw/read.php?tid=101".to_string(),
                },
                ListEntry {
                    bucket_key: "202312".to_string(),
                    uri: "http://forum.example/pw/read.php?tid=103".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_keyword_match_is_case_sensitive() {
        let extractor = ListExtractor::new(
            PageSelectors::compile(&SelectorConfig::default()).unwrap(),
            "http://forum.example/pw",
            vec!["weekly".to_string()],
        );
        assert!(extractor.extract(&page(LISTING)).is_empty());
    }

    #[test]
    fn test_page_without_anchors() {
        let entries = extractor().extract(&page("<html><body>Please log in</body></html>"));
        assert!(entries.is_empty());
    }

    #[test]
    fn test_anchor_without_row_gets_empty_key() {
        let body = r#"<div><h3><a href="read.php?tid=9">Weekly</a></h3></div>"#;
        let entries = extractor().extract(&page(body));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bucket_key, "");
    }

    #[test]
    fn test_bucket_key() {
        assert_eq!(bucket_key("2023-11-05"), "202311");
        assert_eq!(bucket_key("2023-12-01"), "202312");
        assert_eq!(bucket_key("2023-1"), "20231");
        assert_eq!(bucket_key(""), "");
    }

    #[test]
    fn test_join_detail_uri() {
        assert_eq!(
            join_detail_uri("http://forum.example/pw", "read.php?tid=1"),
            "http://forum.example/pw/read.php?tid=1"
        );
        assert_eq!(
            join_detail_uri("http://forum.example/pw/", "/read.php?tid=1"),
            "http://forum.example/pw/read.php?tid=1"
        );
        assert_eq!(
            join_detail_uri("http://forum.example/pw", "https://mirror.example/read.php?tid=1"),
            "https://mirror.example/read.php?tid=1"
        );
    }
}
