//! URL serialization of a [`Location`].
//!
//! # Format
//!
//! ```text
//! /seg0/seg1?flag=true&key=value&list[]=a&list[]=b
//! ```
//!
//! - Segments are percent-encoded and joined by `/` behind a leading `/`; an
//!   empty path serializes as `/`.
//! - Search keys are sorted (the map is a `BTreeMap`); `None` entries are
//!   dropped; lists use bracket array notation.
//! - Parsing yields `Text` for every scalar and `List` for bracket keys.  A
//!   `#fragment` is ignored.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::{Location, RouterError, RouterResult, SearchValue};

/// Everything but RFC 3986 unreserved characters is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Render `location` as a path-plus-query string.
pub fn serialize_location(location: &Location) -> String {
    let mut out = String::from("/");
    let path: Vec<String> = location
        .pathname
        .iter()
        .map(|s| utf8_percent_encode(s, COMPONENT).to_string())
        .collect();
    out.push_str(&path.join("/"));

    let mut pairs: Vec<String> = Vec::new();
    for (key, value) in location.present_search() {
        let k = utf8_percent_encode(key, COMPONENT).to_string();
        match value {
            SearchValue::List(items) => {
                for item in items {
                    pairs.push(format!("{k}[]={}", utf8_percent_encode(item, COMPONENT)));
                }
            }
            scalar => {
                let text = scalar.to_string();
                pairs.push(format!("{k}={}", utf8_percent_encode(&text, COMPONENT)));
            }
        }
    }
    if !pairs.is_empty() {
        out.push('?');
        out.push_str(&pairs.join("&"));
    }
    out
}

/// Parse a path-plus-query string into a [`Location`] with default options.
///
/// # Errors
///
/// `InvalidLocation` when a component does not decode to UTF-8.
pub fn parse_url(url: &str) -> RouterResult<Location> {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let (path, query) = match without_fragment.split_once('?') {
        Some((p, q)) => (p, q),
        None         => (without_fragment, ""),
    };

    let mut location = Location::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        location.pathname.push(decode(url, segment)?);
    }

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        // Split on the first '=' only so values may contain '='.
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(url, raw_key)?;
        let value = decode(url, raw_value)?;

        match key.strip_suffix("[]") {
            Some(list_key) => {
                let entry = location
                    .search
                    .entry(list_key.to_owned())
                    .or_insert_with(|| Some(SearchValue::List(Vec::new())));
                match entry {
                    Some(SearchValue::List(items)) => items.push(value),
                    other => *other = Some(SearchValue::List(vec![value])),
                }
            }
            None => {
                location.search.insert(key, Some(SearchValue::Text(value)));
            }
        }
    }
    Ok(location)
}

fn decode(url: &str, component: &str) -> RouterResult<String> {
    let spaced = component.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| RouterError::InvalidLocation {
            url:    url.to_owned(),
            reason: e.to_string(),
        })
}
