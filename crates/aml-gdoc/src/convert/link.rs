//! Unwrapping of Google's redirect links.
//!
//! Doc exports route every hyperlink through a tracker:
//! `https://www.google.com/url?q=https%3A%2F%2Fexample.com&sa=D&...`.

use url::form_urlencoded;

/// Return the real destination of a redirect-wrapped `href`.
///
/// If the query string carries a non-empty `q` parameter, its decoded value is
/// returned; otherwise `href` is returned unchanged.
pub fn normalize_href(href: &str) -> String {
    redirect_target(href).unwrap_or_else(|| href.to_owned())
}

fn redirect_target(href: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    let query = query.split_once('#').map_or(query, |(query, _)| query);

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
