use serde::Deserialize;

/// Main configuration structure for Forum-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub pages: PageSpec,
    pub keywords: KeywordConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Listing page URIs for every page in the configured range
    pub fn listing_uris(&self) -> Vec<String> {
        self.pages
            .iter()
            .map(|page| listing_uri(&self.site.list_base_uri, page))
            .collect()
    }
}

/// Builds the URI of one listing page
pub fn listing_uri(list_base_uri: &str, page: u32) -> String {
    format!("{}&page={}", list_base_uri, page)
}

/// Where the forum lives
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Listing URI prefix, `&page=N` is appended per page
    #[serde(rename = "list-base-uri")]
    pub list_base_uri: String,

    /// Prefix joined with the relative thread links found on listing pages
    #[serde(rename = "detail-base-uri")]
    pub detail_base_uri: String,
}

/// Inclusive range of listing pages to enumerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageSpec {
    pub start: u32,
    pub end: u32,
}

impl PageSpec {
    /// Iterates the page numbers in the range
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    /// Number of pages in the range
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keyword rules
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    /// A listing anchor's text must contain one of these to be followed
    pub link: Vec<String>,

    /// Marker keywords scanned for identifier codes in thread bodies
    pub detail: Vec<String>,
}

/// How fetched records are aggregated before they reach the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMode {
    /// Group all entries by month, fetch bucket by bucket, sort once, write once
    #[default]
    Bucketed,

    /// Fetch and flush the threads of each listing page as soon as it is read
    PerPage,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of in-flight fetches per batch
    #[serde(rename = "concurrency-cap", default = "default_concurrency_cap")]
    pub concurrency_cap: usize,

    /// Bucket `k` waits `k * unit` seconds before its fetches start
    #[serde(
        rename = "bucket-delay-unit-seconds",
        default = "default_bucket_delay_unit_seconds"
    )]
    pub bucket_delay_unit_seconds: u64,

    #[serde(default)]
    pub aggregation: AggregationMode,

    /// Per-request timeout
    #[serde(
        rename = "request-timeout-seconds",
        default = "default_request_timeout_seconds"
    )]
    pub request_timeout_seconds: u64,

    /// Optional proxy used for every request
    #[serde(default)]
    pub proxy: Option<String>,

    /// Optional User-Agent header
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency_cap: default_concurrency_cap(),
            bucket_delay_unit_seconds: default_bucket_delay_unit_seconds(),
            aggregation: AggregationMode::default(),
            request_timeout_seconds: default_request_timeout_seconds(),
            proxy: None,
            user_agent: None,
        }
    }
}

fn default_concurrency_cap() -> usize {
    10_000
}

fn default_bucket_delay_unit_seconds() -> u64 {
    3
}

fn default_request_timeout_seconds() -> u64 {
    30
}

/// CSS selectors used to read listing and thread pages
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Thread anchors on a listing page
    #[serde(default = "default_anchor")]
    pub anchor: String,

    /// Ancestor element of an anchor that holds its date
    #[serde(default = "default_row")]
    pub row: String,

    /// Date element inside the row, text formatted `YYYY-MM-DD`
    #[serde(default = "default_date")]
    pub date: String,

    /// Thread title on a detail page
    #[serde(default = "default_title")]
    pub title: String,

    /// Publish-time element on a detail page (first match wins)
    #[serde(default = "default_published")]
    pub published: String,

    /// Leading label characters dropped from the publish-time text
    #[serde(rename = "published-skip-chars", default = "default_published_skip_chars")]
    pub published_skip_chars: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            anchor: default_anchor(),
            row: default_row(),
            date: default_date(),
            title: default_title(),
            published: default_published(),
            published_skip_chars: default_published_skip_chars(),
        }
    }
}

fn default_anchor() -> String {
    "h3 a".to_string()
}

fn default_row() -> String {
    "tr".to_string()
}

fn default_date() -> String {
    "a.f10".to_string()
}

fn default_title() -> String {
    "#subject_tpc".to_string()
}

fn default_published() -> String {
    ".fl.gray".to_string()
}

fn default_published_skip_chars() -> usize {
    4
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Markdown,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Report file, truncated when a run starts
    pub file: String,

    #[serde(default)]
    pub format: ReportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_spec_iter() {
        let pages = PageSpec { start: 2, end: 4 };
        assert_eq!(pages.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn test_listing_uri() {
        assert_eq!(
            listing_uri("http://forum.example/thread.php?fid=3", 7),
            "http://forum.example/thread.php?fid=3&page=7"
        );
    }
}
