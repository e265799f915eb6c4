//! HTML report rendering
//!
//! Each record becomes one `<p>` block: publish time, the thread link, and
//! the comma-joined identifier codes. Blocks are meant to be concatenated
//! into a single page that is opened directly in a browser.

use crate::extract::DetailRecord;
use html_escape::{encode_single_quoted_attribute, encode_text};

/// Renders records as HTML paragraphs, in input order
pub fn render_html(records: &[DetailRecord]) -> String {
    let mut html = String::new();

    for record in records {
        html.push_str(&format!(
            r#"
<p>
    <span>{}</span>
    <a style='margin-left:10px;width:600px;display: inline-block;' target="_blank" href='{}'>{}</a>
    <span>{}</span>
</p>
"#,
            encode_text(&record.published_at),
            encode_single_quoted_attribute(&record.url),
            encode_text(&record.title),
            encode_text(&record.identifiers.join(","))
        ));
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::IdentifierSet;

    fn record(title: &str, codes: &[&str]) -> DetailRecord {
        DetailRecord {
            url: "http://forum.example/pw/read.php?tid=1".to_string(),
            title: title.to_string(),
            published_at: "2023-11-05 10:30".to_string(),
            matched_keywords: vec!["CLUB".to_string()],
            identifiers: codes.iter().map(|c| c.to_string()).collect::<IdentifierSet>(),
        }
    }

    #[test]
    fn test_render_block() {
        let html = render_html(&[record("Weekly picks", &["CLUB-123", "CLUB-456"])]);

        assert!(html.contains("<span>2023-11-05 10:30</span>"));
        assert!(html.contains("href='http://forum.example/pw/read.php?tid=1'>Weekly picks</a>"));
        assert!(html.contains("<span>CLUB-123,CLUB-456</span>"));
        assert_eq!(html.matches("<p>").count(), 1);
    }

    #[test]
    fn test_render_preserves_order() {
        let html = render_html(&[record("first", &["A-001"]), record("second", &["A-002"])]);
        let first = html.find("first").unwrap();
        let second = html.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_title_is_escaped() {
        let html = render_html(&[record("<b>Tom & Jerry</b>", &["A-001"])]);
        assert!(html.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
    }

    #[test]
    fn test_href_quote_is_escaped() {
        let mut rec = record("t", &["A-001"]);
        rec.url = "http://forum.example/pw/read.php?tid=1'onclick".to_string();

        let html = render_html(&[rec]);
        assert!(!html.contains("tid=1'onclick"));
        assert!(html.contains("read.php?tid=1&#"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_html(&[]), "");
    }
}
