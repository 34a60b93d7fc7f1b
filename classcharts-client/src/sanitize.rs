//! HTML-to-text sanitization for free-text fields

use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// Two or more consecutive line breaks
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n+").unwrap());

/// Convert HTML-bearing text into plain text.
///
/// The visible text of the fragment is kept, runs of blank lines are collapsed to a
/// single line break and surrounding whitespace is trimmed. The result is a fixed
/// point: `sanitize(&sanitize(x)) == sanitize(x)`.
///
/// # Example
///
/// ```
/// use classcharts_client::sanitize;
///
/// assert_eq!(sanitize("<p>Read <b>chapter 4</b></p>\n\n\n<p>Answer Q1</p>"), "Read chapter 4\nAnswer Q1");
/// ```
pub fn sanitize(content: &str) -> String {
    let mut text = extract_text(content);
    // Decoded entities such as `&lt;b&gt;` turn into markup on the next round, so run
    // until nothing changes. Rounds only drop markup or decode references, so the
    // text never grows and the loop ends.
    loop {
        let next = extract_text(&text);
        if next == text {
            return text;
        }
        text = next;
    }
}

/// One round of text extraction and blank line collapsing
fn extract_text(content: &str) -> String {
    let fragment = Html::parse_fragment(content);
    let text: String = fragment.root_element().text().collect();
    BLANK_LINES.replace_all(&text, "\n").trim().to_string()
}
