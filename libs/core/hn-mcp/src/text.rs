//! Plain-text helpers for upstream HTML fragments and timestamps
//!
//! Uses the scraper crate so entity decoding follows the HTML5 rules instead
//! of a hand-maintained replacement table.

use chrono::DateTime;
use scraper::Html;

/// Strip markup from an HN body fragment, keeping paragraph breaks.
///
/// HN separates paragraphs with a bare `<p>` and never closes them.
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let spaced = html.replace("<p>", "\n\n<p>");
    let fragment = Html::parse_fragment(&spaced);
    let text: String = fragment.root_element().text().collect();
    text.trim().to_string()
}

/// Render unix seconds as `YYYY-MM-DD HH:MM:SS UTC`
pub fn format_timestamp(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| unix_seconds.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_html_decodes_entities() {
        assert_eq!(
            clean_html("&quot;quoted&quot; &amp; 1 &lt; 2 &gt; 0 &#x27;ok&#x27;"),
            "\"quoted\" & 1 < 2 > 0 'ok'"
        );
    }

    #[test]
    fn test_clean_html_strips_tags_and_keeps_link_text() {
        assert_eq!(
            clean_html(r#"See <a href="https://example.com" rel="nofollow">the docs</a>"#),
            "See the docs"
        );
    }

    #[test]
    fn test_clean_html_preserves_paragraphs() {
        assert_eq!(
            clean_html("First paragraph.<p>Second one.<p><i>Third</i>."),
            "First paragraph.\n\nSecond one.\n\nThird."
        );
    }

    #[test]
    fn test_clean_html_empty() {
        assert_eq!(clean_html(""), "");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1175714200), "2007-04-04 19:16:40 UTC");
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    }
}
