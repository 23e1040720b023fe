//! Explicit cookie jar handling.
//!
//! The session cookies are carried by hand instead of through reqwest's cookie
//! store so the caller can snapshot, time-stamp and swap them as one unit.

use reqwest::header::{HeaderMap, SET_COOKIE};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Merge every `Set-Cookie` header into `jar`.
///
/// Only the leading `name=value` pair is kept; attributes such as `Path` or
/// `Expires` are ignored. A cookie set again by a later response replaces the
/// earlier value.
///
/// Returns the number of cookies stored from these headers.
pub fn parse_set_cookies(headers: &HeaderMap, jar: &mut FxHashMap<String, String>) -> usize {
    let mut stored = 0;
    for value in headers.get_all(SET_COOKIE).iter() {
        if let Ok(cookie_str) = value.to_str()
            && let Some(cookie_part) = cookie_str.split(';').next()
            && let Some((name, value)) = cookie_part.split_once('=')
        {
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            trace!(cookie = %name, "Storing session cookie");
            jar.insert(name.to_owned(), value.to_owned());
            stored += 1;
        }
    }
    stored
}

/// Render a jar as a `Cookie` header value (`a=1; b=2`).
///
/// Names are sorted so the same jar always renders the same header.
pub fn build_cookie_header(jar: &FxHashMap<String, String>) -> Option<String> {
    if jar.is_empty() {
        return None;
    }

    let mut pairs: Vec<(&String, &String)> = jar.iter().collect();
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));

    // Rough capacity estimate to avoid repeated growth.
    let mut cookie_string =
        String::with_capacity(pairs.iter().map(|(k, v)| k.len() + 1 + v.len() + 2).sum());

    for (name, value) in pairs {
        if !cookie_string.is_empty() {
            cookie_string.push_str("; ");
        }
        cookie_string.push_str(name);
        cookie_string.push('=');
        cookie_string.push_str(value);
    }

    Some(cookie_string)
}
