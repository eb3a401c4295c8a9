//! End-to-end conversion of an exported Google Doc.

use aml_gdoc::{convert_html, render_text};
use pretty_assertions::assert_eq;
use serde_json::json;

const EXPORT: &str = include_str!("fixtures/export.html");

#[test]
fn test_export_renders_one_line_per_block() {
    let text = render_text(EXPORT).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "headline: Rents are rising");
    assert_eq!(
        lines[2],
        "intro: Prices went up <a href=\"https://example.com/report\">last year</a>."
    );
    assert_eq!(
        lines[3],
        "credit: Photo by <a href=\"https://example.com/photo\">Ann</a>"
    );
    assert_eq!(lines[4], "sponsor: AT&amp;T &lt;ads&gt;");
    assert!(lines.contains(&"* housing"));
    assert!(lines.contains(&"Second \u{201c}quoted\u{201d} paragraph."));
    assert!(!text.contains("Rents story"));
    assert!(!text.contains("table: dropped"));
}

#[test]
fn test_export_converts_to_json() {
    let data = convert_html(EXPORT).unwrap();

    assert_eq!(
        data,
        json!({
            "headline": "Rents are rising",
            "byline": "Jane Reporter",
            "intro": "Prices went up <a href=\"https://example.com/report\">last year</a>.",
            "credit": "Photo by <a href=\"https://example.com/photo\">Ann</a>",
            "sponsor": "AT&amp;T &lt;ads&gt;",
            "meta": {"section": "Housing"},
            "sources": [
                {"name": "Census", "url": "https://census.gov"},
                {"name": "Survey", "url": "https://example.org"}
            ],
            "tags": ["housing", "rent"],
            "body": "First paragraph.\nSecond \u{201c}quoted\u{201d} paragraph."
        })
    );
}

#[test]
fn test_export_keys_keep_document_order() {
    let data = convert_html(EXPORT).unwrap();
    let keys: Vec<&str> = data
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();

    assert_eq!(
        keys,
        ["headline", "byline", "intro", "credit", "sponsor", "meta", "sources", "tags", "body"]
    );
}
