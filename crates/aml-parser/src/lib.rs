//! ArchieML parser.
//!
//! Converts the line-oriented text exported from a word processor into a JSON
//! object. Supported syntax:
//!
//! - `key: value` and dotted `a.b: value` keys
//! - multi-line values closed by `:end`, with `\` escaping line starts
//! - `{scope}`, `{.nested}` and `{}` object scopes
//! - `[array]`, `[.nested]` and `[]` arrays of strings (`* item`) or objects
//! - `[+freeform]` arrays of `{"type", "value"}` items
//! - `:skip` / `:endskip` and `:ignore`
//!
//! Parsing never fails: lines that match no rule are ignored unless they
//! continue a multi-line value.
//!
//! ```
//! let doc = aml_parser::load("title: Budget\n[tags]\n* city\n* money\n[]\n");
//! assert_eq!(doc["title"], "Budget");
//! assert_eq!(doc["tags"][1], "money");
//! ```

mod parser;
mod path;

use serde_json::Value;

/// Parse ArchieML text into a JSON object.
///
/// Keys keep the order in which they first appear in `input`.
pub fn load(input: &str) -> Value {
    parser::Parser::new().parse(input)
}
