//! Inline markup handling for cell text.
//!
//! Cell text may carry Pango-style markup such as `<b>bold</b>` or
//! `<span foreground="red">x</span>`, with `&amp;`-style entities for
//! literal `<`, `>` and `&`. The canvas renders the markup; this module only
//! computes the *visible* text so widths are measured on what ends up on the
//! page rather than on tag syntax.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.+?>").expect("invalid regex"));

/// Remove every `<...>` tag, leaving entities untouched.
#[must_use]
pub fn strip_tags(markup: &str) -> Cow<'_, str> {
    if !markup.contains('<') {
        return Cow::Borrowed(markup);
    }
    ANY_TAG.replace_all(markup, "")
}

/// Replace the XML entities the markup language defines with their characters.
#[must_use]
pub fn unescape_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    // `&amp;` goes last so "&amp;lt;" becomes "&lt;" and not "<".
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&"),
    )
}

/// The text a reader sees once markup is rendered.
#[must_use]
pub fn visible_text(markup: &str) -> String {
    unescape_entities(&strip_tags(markup)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_is_borrowed() {
        assert!(matches!(strip_tags("hello world"), Cow::Borrowed(_)));
        assert!(matches!(unescape_entities("hello"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_visible_text_removes_tags() {
        assert_eq!(visible_text("<b>bold</b> and <i>italic</i>"), "bold and italic");
        assert_eq!(
            visible_text(r#"<span foreground="red">red</span>"#),
            "red"
        );
    }

    #[test]
    fn test_visible_text_unescapes() {
        assert_eq!(visible_text("data4&amp;5"), "data4&5");
        assert_eq!(visible_text("a &lt;b&gt; c"), "a <b> c");
        assert_eq!(visible_text("&amp;lt;"), "&lt;");
    }
}
