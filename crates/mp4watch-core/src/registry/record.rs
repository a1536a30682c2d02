//! Per-resource record and completeness status.

use serde::{Deserialize, Serialize};

use crate::headers::range::{ContentRange, RangeRequest};

/// Whether the whole resource is believed retrievable in one request.
/// Monotonic per record: inference only ever upgrades to `Full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unknown,
    Full,
}

/// Everything observed about one URL within one tab. Serialized with
/// the transport's camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    pub url: String,
    /// Best known total byte length (Content-Length on a 200, or the
    /// total from a Content-Range).
    pub size: Option<u64>,
    /// Normalized MIME type (lowercase, parameters stripped).
    pub content_type: Option<String>,
    /// Lowercased `Accept-Ranges` value from the most recent response.
    pub accept_ranges: Option<String>,
    /// Timestamp of the last observation, request or response.
    #[serde(rename = "lastSeen")]
    pub last_seen_ms: u64,
    /// Most recent outbound `Range` request, if any.
    pub last_request_range: Option<RangeRequest>,
    /// Most recent inbound `Content-Range`, if any.
    pub last_content_range: Option<ContentRange>,
    pub status: Status,
    /// Snapshot-order tie-breaker for records touched within the same
    /// millisecond. Not part of the transport shape.
    #[serde(skip)]
    pub(crate) seq: u64,
}

impl ResourceRecord {
    pub(crate) fn new(url: &str, now_ms: u64, seq: u64) -> Self {
        Self {
            url: url.to_string(),
            size: None,
            content_type: None,
            accept_ranges: None,
            last_seen_ms: now_ms,
            last_request_range: None,
            last_content_range: None,
            status: Status::Unknown,
            seq,
        }
    }
}
