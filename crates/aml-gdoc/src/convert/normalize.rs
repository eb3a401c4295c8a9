//! Post-processing of rendered text.

use std::sync::LazyLock;

use regex::Regex;

/// Anything that looks like an inline tag.
static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("invalid inline tag regex"));

/// Decode entities, then straighten smart quotes inside inline tags.
pub fn normalize_text(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    straighten_tag_quotes(&decoded)
}

/// Replace curly quotes with straight ones, only between `<` and `>`.
///
/// Word processors curl the quotes around attribute values; prose keeps its
/// typography.
pub fn straighten_tag_quotes(text: &str) -> String {
    INLINE_TAG
        .replace_all(text, |caps: &regex::Captures| {
            caps[0]
                .replace(['\u{201c}', '\u{201d}'], "\"")
                .replace(['\u{2018}', '\u{2019}'], "'")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decodes_named_entities() {
        assert_eq!(normalize_text("Salt &amp; pepper"), "Salt & pepper");
        assert_eq!(normalize_text("a&nbsp;b&mdash;c"), "a\u{a0}b\u{2014}c");
    }

    #[test]
    fn test_decodes_numeric_entities() {
        assert_eq!(normalize_text("&#8220;hi&#x201D;"), "\u{201c}hi\u{201d}");
    }

    #[test]
    fn test_quotes_outside_tags_untouched() {
        let text = "He said \u{201c}hi\u{201d} and \u{2018}bye\u{2019}";
        assert_eq!(normalize_text(text), text);
    }

    #[test]
    fn test_quotes_inside_tags_straightened() {
        let text = "He said \u{201c}hi\u{201d} <a href=\u{201c}x\u{201d} title=\u{2018}t\u{2019}>\u{201c}link\u{201d}</a>";
        assert_eq!(
            normalize_text(text),
            "He said \u{201c}hi\u{201d} <a href=\"x\" title='t'>\u{201c}link\u{201d}</a>"
        );
    }

    #[test]
    fn test_already_straight_tag_unchanged() {
        let text = "He said \u{201c}hi\u{201d} <a href=\"x\">\u{201c}link\u{201d}</a>";
        assert_eq!(normalize_text(text), text);
    }

    #[test]
    fn test_decoded_brackets_form_tags() {
        assert_eq!(
            normalize_text("&lt;a href=\u{201c}x\u{201d}&gt;"),
            "<a href=\"x\">"
        );
    }

    #[test]
    fn test_unclosed_bracket_left_alone() {
        let text = "1 < 2 and \u{201c}quoted\u{201d}";
        assert_eq!(straighten_tag_quotes(text), text);
    }
}
