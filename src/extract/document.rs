//! Narrow query view over a parsed HTML page
//!
//! The extractors only need a handful of queries: select by CSS selector,
//! read text, read an attribute, and walk up to an enclosing element. This
//! module exposes exactly those on top of `scraper`.

use crate::config::SelectorConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Compiled selectors for listing and thread pages
#[derive(Debug, Clone)]
pub struct PageSelectors {
    pub anchor: Selector,
    pub row: Selector,
    pub date: Selector,
    pub title: Selector,
    pub published: Selector,
    pub published_skip_chars: usize,
}

impl PageSelectors {
    /// Compiles the configured selectors
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSelector` naming the first selector that
    /// fails to parse.
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            anchor: compile_one("anchor", &config.anchor)?,
            row: compile_one("row", &config.row)?,
            date: compile_one("date", &config.date)?,
            title: compile_one("title", &config.title)?,
            published: compile_one("published", &config.published)?,
            published_skip_chars: config.published_skip_chars,
        })
    }
}

fn compile_one(name: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("selectors.{} '{}': {:?}", name, selector, e))
    })
}

/// A parsed HTML page
pub struct DocumentView {
    html: Html,
}

impl DocumentView {
    /// Parses a full HTML document. Malformed markup never fails; the parser
    /// recovers the same way a browser would.
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// All elements matching `selector`, in document order
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> {
        self.html.select(selector)
    }

    /// Trimmed text of the first element matching `selector`
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        self.html.select(selector).next().map(|e| text_of(e).trim().to_string())
    }
}

/// Concatenated text content of an element
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Value of an attribute on an element
pub fn attr_of<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// Nearest ancestor of `element` matching `selector`
pub fn closest<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| selector.matches(ancestor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    #[test]
    fn test_first_text_trims() {
        let doc = DocumentView::parse("<html><body><h1 id='t'>  Hello  </h1></body></html>");
        assert_eq!(doc.first_text(&selector("#t")), Some("Hello".to_string()));
        assert_eq!(doc.first_text(&selector("#missing")), None);
    }

    #[test]
    fn test_closest_finds_enclosing_row() {
        let doc = DocumentView::parse(
            r#"<table><tr class="r"><td><h3><a href="x">Go</a></h3></td>
               <td><a class="f10">2023-11-05</a></td></tr></table>"#,
        );
        let anchor_sel = selector("h3 a");
        let anchor = doc.select(&anchor_sel).next().unwrap();
        let row = closest(anchor, &selector("tr")).unwrap();

        assert_eq!(attr_of(row, "class"), Some("r"));
        let date = row.select(&selector("a.f10")).next().unwrap();
        assert_eq!(text_of(date), "2023-11-05");
    }

    #[test]
    fn test_closest_without_match() {
        let doc = DocumentView::parse("<div><a href='x'>Go</a></div>");
        let anchor_sel = selector("a");
        let anchor = doc.select(&anchor_sel).next().unwrap();
        assert!(closest(anchor, &selector("tr")).is_none());
    }

    #[test]
    fn test_compile_default_selectors() {
        assert!(PageSelectors::compile(&SelectorConfig::default()).is_ok());
    }
}
