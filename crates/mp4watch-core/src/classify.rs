//! MP4-likeness heuristic.
//!
//! A resource counts as MP4-like if its declared content type is
//! `video/mp4`, or its URL is http(s) and contains `.mp4` anywhere in
//! the full string. The substring check deliberately has no extension
//! or path-boundary logic: `https://cdn.example.com/x.mp4backup/seg1.ts`
//! is accepted. This trades precision for recall; downstream status
//! stays `unknown` until response headers say otherwise, so a false
//! positive costs a tracked record, not a wrong completeness verdict.

use url::Url;

/// Normalized content type that marks a resource as MP4 regardless of URL.
pub const MP4_CONTENT_TYPE: &str = "video/mp4";

/// URL-only heuristic: http(s) scheme and a case-insensitive `.mp4`
/// substring over the whole URL string. Malformed URLs and non-http(s)
/// schemes are never candidates.
pub fn looks_like_mp4_url(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    url.to_ascii_lowercase().contains(".mp4")
}

/// Full classifier: declared content type wins, URL heuristic second.
/// `content_type` must already be normalized (lowercase, no parameters).
pub fn is_mp4_resource(url: &str, content_type: Option<&str>) -> bool {
    content_type == Some(MP4_CONTENT_TYPE) || looks_like_mp4_url(url)
}
