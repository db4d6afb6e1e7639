//! Case-insensitive lookups over an ordered header list.
//!
//! Header names repeat (`set-cookie` being the usual suspect), so headers are
//! kept as a list rather than a map and lookups filter by name.

use serde::Serialize;

use crate::record::Header;

/// Result of looking up a header by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue<'a> {
    /// Exactly one header matched.
    Single(&'a str),
    /// Several headers matched; values keep their original order.
    Multiple(Vec<&'a str>),
}

impl<'a> HeaderValue<'a> {
    /// All matched values in order, whatever the arity.
    #[must_use]
    pub fn values(&self) -> Vec<&'a str> {
        match self {
            Self::Single(v) => vec![*v],
            Self::Multiple(vs) => vs.clone(),
        }
    }
}

fn matching<'a>(headers: &'a [Header], name: &str) -> impl Iterator<Item = &'a Header> {
    headers.iter().filter(move |h| h.name.eq_ignore_ascii_case(name))
}

/// Find the value(s) of `name` in `headers`.
///
/// # Examples
///
/// ```
/// use respctx::headers::{HeaderValue, find_header};
/// use respctx::record::Header;
///
/// let headers = [Header::new("Set-Cookie", "a=1"), Header::new("set-cookie", "b=2")];
/// assert_eq!(
///     find_header(&headers, "SET-COOKIE"),
///     Some(HeaderValue::Multiple(vec!["a=1", "b=2"]))
/// );
/// assert_eq!(find_header(&headers, "accept"), None);
/// ```
#[must_use]
pub fn find_header<'a>(headers: &'a [Header], name: &str) -> Option<HeaderValue<'a>> {
    let mut values: Vec<&str> = matching(headers, name).map(|h| h.value.as_str()).collect();
    match values.len() {
        0 => None,
        1 => values.pop().map(HeaderValue::Single),
        _ => Some(HeaderValue::Multiple(values)),
    }
}

/// Whether any header is called `name`, ignoring case.
#[must_use]
pub fn has_header(headers: &[Header], name: &str) -> bool {
    matching(headers, name).next().is_some()
}
