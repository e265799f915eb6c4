use crate::config::types::{
    Config, CrawlerConfig, KeywordConfig, OutputConfig, PageSpec, SelectorConfig, SiteConfig,
};
use crate::extract::PageSelectors;
use crate::ConfigError;
use url::Url;

/// Upper bound for `bucket-delay-unit-seconds` (one day)
pub const MAX_BUCKET_DELAY_UNIT_SECONDS: u64 = 86_400;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_page_spec(&config.pages)?;
    validate_keywords(&config.keywords)?;
    validate_crawler_config(&config.crawler)?;
    validate_selectors(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the listing and detail base URIs
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("list-base-uri", &config.list_base_uri)?;
    validate_http_url("detail-base-uri", &config.detail_base_uri)?;
    Ok(())
}

/// Validates the listing page range
fn validate_page_spec(pages: &PageSpec) -> Result<(), ConfigError> {
    if pages.start < 1 {
        return Err(ConfigError::Validation(format!(
            "pages.start must be >= 1, got {}",
            pages.start
        )));
    }

    if pages.start > pages.end {
        return Err(ConfigError::Validation(format!(
            "pages.start ({}) must not be greater than pages.end ({})",
            pages.start, pages.end
        )));
    }

    Ok(())
}

/// Validates keyword lists
fn validate_keywords(config: &KeywordConfig) -> Result<(), ConfigError> {
    validate_keyword_list("keywords.link", &config.link)?;
    validate_keyword_list("keywords.detail", &config.detail)?;
    Ok(())
}

fn validate_keyword_list(name: &str, keywords: &[String]) -> Result<(), ConfigError> {
    if keywords.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} must contain at least one keyword",
            name
        )));
    }

    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{} cannot contain empty keywords",
            name
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrency_cap < 1 {
        return Err(ConfigError::Validation(format!(
            "concurrency-cap must be >= 1, got {}",
            config.concurrency_cap
        )));
    }

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-seconds must be >= 1, got {}",
            config.request_timeout_seconds
        )));
    }

    if config.bucket_delay_unit_seconds > MAX_BUCKET_DELAY_UNIT_SECONDS {
        return Err(ConfigError::Validation(format!(
            "bucket-delay-unit-seconds must be <= {}, got {}",
            MAX_BUCKET_DELAY_UNIT_SECONDS, config.bucket_delay_unit_seconds
        )));
    }

    if let Some(proxy) = &config.proxy {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;
    }

    Ok(())
}

/// Validates that every selector parses
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    PageSelectors::compile(config)?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.file.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that `value` is an absolute http(s) URL
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}
