//! Header set access and normalization.
//!
//! Host events deliver response/request headers as ordered name/value
//! pairs. Names are matched case-insensitively. Parsing of the range
//! grammars lives in the `range` submodule.

pub mod range;

use serde::{Deserialize, Serialize};

/// A single HTTP header as carried in host event payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Value of the first header whose name matches case-insensitively.
pub fn get_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Replace the value of an existing header (case-insensitive name match)
/// or append a new one. Used by the download header-injection path.
pub fn set_or_add_header(headers: &mut Vec<Header>, name: &str, value: &str) {
    for h in headers.iter_mut() {
        if h.name.eq_ignore_ascii_case(name) {
            h.value = value.to_string();
            return;
        }
    }
    headers.push(Header::new(name, value));
}

/// Normalize a `Content-Type` value: lowercase, parameters stripped
/// (`Video/MP4; codecs="avc1"` becomes `video/mp4`). Empty input
/// normalizes to `None`.
pub fn normalize_content_type(value: &str) -> Option<String> {
    let type_only = match value.split_once(';') {
        Some((t, _)) => t,
        None => value,
    };
    let type_only = type_only.trim().to_ascii_lowercase();
    if type_only.is_empty() {
        None
    } else {
        Some(type_only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<Header> {
        vec![
            Header::new("Content-Type", "video/mp4"),
            Header::new("Content-Length", "5000000"),
        ]
    }

    #[test]
    fn get_header_is_case_insensitive() {
        let hs = headers();
        assert_eq!(get_header(&hs, "content-type"), Some("video/mp4"));
        assert_eq!(get_header(&hs, "CONTENT-LENGTH"), Some("5000000"));
        assert_eq!(get_header(&hs, "Accept-Ranges"), None);
    }

    #[test]
    fn get_header_returns_first_match() {
        let hs = vec![
            Header::new("X-Test", "one"),
            Header::new("x-test", "two"),
        ];
        assert_eq!(get_header(&hs, "X-Test"), Some("one"));
    }

    #[test]
    fn set_or_add_header_replaces_in_place() {
        let mut hs = headers();
        set_or_add_header(&mut hs, "content-type", "application/octet-stream");
        assert_eq!(hs.len(), 2);
        assert_eq!(hs[0].value, "application/octet-stream");
    }

    #[test]
    fn set_or_add_header_appends_when_missing() {
        let mut hs = headers();
        set_or_add_header(&mut hs, "Range", "bytes=0-");
        assert_eq!(hs.len(), 3);
        assert_eq!(get_header(&hs, "range"), Some("bytes=0-"));
    }

    #[test]
    fn normalize_content_type_strips_parameters() {
        assert_eq!(
            normalize_content_type("Video/MP4; codecs=\"avc1\"").as_deref(),
            Some("video/mp4")
        );
        assert_eq!(
            normalize_content_type("  text/html ").as_deref(),
            Some("text/html")
        );
        assert_eq!(normalize_content_type(""), None);
        assert_eq!(normalize_content_type(" ; charset=utf-8"), None);
    }
}
