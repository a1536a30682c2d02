//! Range grammar parsers.
//!
//! Two grammars, anchored end to end (no substring matching):
//! - `Content-Range: bytes <start>-<end>/<size|*>` from responses
//! - `Range: bytes=<start?>-<end?>` from outbound requests
//!
//! Both parsers are total: any input that does not match the grammar
//! exactly yields `None`, never a partial result or a panic.

use serde::{Deserialize, Serialize};

/// Byte window a server reported in `Content-Range`. `size` is `None`
/// when the server replied with `*` (total length unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRange {
    pub start: u64,
    pub end: u64,
    pub size: Option<u64>,
}

/// Byte window a client asked for in `Range`. Either bound may be
/// open-ended (`bytes=0-`, `bytes=-500`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRequest {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// Parse `bytes <start>-<end>/<size|*>`. Keyword is case-insensitive and
/// must be followed by at least one whitespace character.
pub fn parse_content_range(value: &str) -> Option<ContentRange> {
    let v = value.trim();
    let rest = strip_keyword(v, "bytes")?;
    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }
    let rest = rest.trim_start();
    let (span, size_tok) = rest.split_once('/')?;
    let (start_tok, end_tok) = span.split_once('-')?;
    let start = parse_decimal(start_tok)?;
    let end = parse_decimal(end_tok)?;
    let size = if size_tok == "*" {
        None
    } else {
        Some(parse_decimal(size_tok)?)
    };
    Some(ContentRange { start, end, size })
}

/// Parse `bytes=<start?>-<end?>`. Whitespace is tolerated around `=`;
/// both bounds are optional but the `-` separator is required.
pub fn parse_range_request(value: &str) -> Option<RangeRequest> {
    let v = value.trim();
    let rest = strip_keyword(v, "bytes")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let (start_tok, end_tok) = rest.split_once('-')?;
    let start = if start_tok.is_empty() {
        None
    } else {
        Some(parse_decimal(start_tok)?)
    };
    let end = if end_tok.is_empty() {
        None
    } else {
        Some(parse_decimal(end_tok)?)
    };
    Some(RangeRequest { start, end })
}

fn strip_keyword<'a>(s: &'a str, keyword: &str) -> Option<&'a str> {
    // get() instead of slicing: the input may cut a multi-byte char here
    let head = s.get(..keyword.len())?;
    if head.eq_ignore_ascii_case(keyword) {
        Some(&s[keyword.len()..])
    } else {
        None
    }
}

/// Strict decimal token: one or more ASCII digits, nothing else.
/// Overflowing u64 counts as malformed.
pub(crate) fn parse_decimal(tok: &str) -> Option<u64> {
    if tok.is_empty() || !tok.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    tok.parse().ok()
}
