//! HTML to plain-text conversion.
//!
//! `<script>` and `<style>` elements are removed entirely (including their
//! content). All other tags are removed but their text content is preserved.
//! Common HTML entities are decoded and whitespace is collapsed so the output
//! chunks cleanly.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#x?[0-9a-fA-F]+|[a-zA-Z]+);").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Converts an HTML document into plain text.
///
/// Block-level closing tags become newlines before tag stripping so that
/// headings and paragraphs stay on separate lines.
pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, "");
    let without_styles = STYLE_RE.replace_all(&without_scripts, "");

    // Keep paragraph boundaries: closing block tags turn into newlines.
    let with_breaks = without_styles
        .replace("</p>", "\n")
        .replace("</P>", "\n")
        .replace("</div>", "\n")
        .replace("</li>", "\n")
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</h1>", "\n")
        .replace("</h2>", "\n")
        .replace("</h3>", "\n")
        .replace("</h4>", "\n")
        .replace("</tr>", "\n");

    let stripped = TAG_RE.replace_all(&with_breaks, "");
    let decoded = decode_entities(&stripped);
    collapse_whitespace(&decoded)
}

/// Decodes named, decimal, and hex HTML entities.
fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    ENTITY_RE.replace_all(input, |caps: &regex::Captures<'_>| {
        let inner = &caps[1];
        if let Some(hex) = inner.strip_prefix("#x").or_else(|| inner.strip_prefix("#X")) {
            u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map_or_else(|| caps[0].to_string(), |c| c.to_string())
        } else if let Some(dec) = inner.strip_prefix('#') {
            dec.parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map_or_else(|| caps[0].to_string(), |c| c.to_string())
        } else {
            match inner {
                "amp" => "&".to_string(),
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                "nbsp" => " ".to_string(),
                _ => caps[0].to_string(),
            }
        }
    })
}

/// Collapses runs of spaces/tabs and trims every line; at most one blank
/// line survives between paragraphs.
fn collapse_whitespace(input: &str) -> String {
    let collapsed = SPACE_RE.replace_all(input, " ");
    let lines: Vec<&str> = collapsed.lines().map(str::trim).collect();
    let joined = lines.join("\n");
    BLANK_RE.replace_all(&joined, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_and_styles_with_content() {
        let html = "<html><head><style>body{color:red}</style></head>\
                    <body><script>alert('x')</script><p>Example Domain</p></body></html>";
        assert_eq!(html_to_text(html), "Example Domain");
    }

    #[test]
    fn preserves_paragraph_boundaries() {
        let html = "<h1>Title</h1><p>First paragraph.</p><p>Second paragraph.</p>";
        let text = html_to_text(html);
        assert_eq!(text, "Title\nFirst paragraph.\nSecond paragraph.");
    }

    #[test]
    fn decodes_entities() {
        let html = "<p>Fish &amp; chips &lt;3 &#65; &#x42;</p>";
        assert_eq!(html_to_text(html), "Fish & chips <3 A B");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let html = "<p>a    b\t\tc</p>\n\n\n\n<p>d</p>";
        assert_eq!(html_to_text(html), "a b c\n\nd");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_to_text("just text"), "just text");
    }
}
