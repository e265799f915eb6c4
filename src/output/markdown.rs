//! Markdown report rendering
//!
//! One list item per record so that batches appended at different times
//! still form a single valid list.

use crate::extract::DetailRecord;

/// Formats records as a markdown list, in input order
///
/// # Arguments
///
/// * `records` - The records to render
///
/// # Returns
///
/// A markdown string, empty when there are no records
pub fn render_markdown(records: &[DetailRecord]) -> String {
    let mut md = String::new();

    for record in records {
        let title = if record.title.is_empty() {
            record.url.as_str()
        } else {
            record.title.as_str()
        };

        md.push_str(&format!(
            "- **{}** [{}]({}) `{}`\n",
            record.published_at,
            escape_link_text(title),
            record.url,
            record.identifiers.join(", ")
        ));
    }

    md
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::IdentifierSet;

    fn record(title: &str) -> DetailRecord {
        DetailRecord {
            url: "http://forum.example/pw/read.php?tid=7".to_string(),
            title: title.to_string(),
            published_at: "2023-12-01 08:00".to_string(),
            matched_keywords: vec!["ABP".to_string()],
            identifiers: ["ABP-001".to_string(), "ABP-002".to_string()]
                .into_iter()
                .collect::<IdentifierSet>(),
        }
    }

    #[test]
    fn test_render_markdown_line() {
        let md = render_markdown(&[record("December roundup")]);
        assert_eq!(
            md,
            "- **2023-12-01 08:00** [December roundup](http://forum.example/pw/read.php?tid=7) `ABP-001, ABP-002`\n"
        );
    }

    #[test]
    fn test_brackets_in_title_are_escaped() {
        let md = render_markdown(&[record("[Weekly] picks")]);
        assert!(md.contains("[\\[Weekly\\] picks]"));
    }

    #[test]
    fn test_missing_title_falls_back_to_url() {
        let md = render_markdown(&[record("")]);
        assert!(md.contains("[http://forum.example/pw/read.php?tid=7]("));
    }
}
