//! Per-tab resource registry.
//!
//! One record per (tab, URL). Sub-maps are created lazily on first
//! observation and destroyed wholesale when the host reports the tab
//! closed; there is no time-based eviction. The registry owns every
//! record; callers only ever see point-in-time copies via [`TabRegistry::snapshot`].
//!
//! `ensure` trusts its caller to have pre-filtered MP4-like URLs. The
//! two observation entry points re-check classification themselves and
//! silently skip non-candidates, so a stray event never creates a record.

mod infer;
mod record;

pub use infer::infer_status;
pub use record::{ResourceRecord, Status};

use std::collections::HashMap;

use crate::classify;
use crate::clock::{Clock, SystemClock};
use crate::headers::{self, range, Header};

/// Host tab identifier. Negative values are host placeholders for
/// tabless requests; the pipeline filters them before the registry.
pub type TabId = i64;

/// In-memory map from tab to its observed MP4-like resources.
pub struct TabRegistry {
    tabs: HashMap<TabId, HashMap<String, ResourceRecord>>,
    clock: Box<dyn Clock>,
    next_seq: u64,
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Construct with an injected clock (tests, deterministic replay).
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            tabs: HashMap::new(),
            clock,
            next_seq: 0,
        }
    }

    /// Current time per the registry's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Return the record for (tab, url) with `last_seen` refreshed,
    /// creating a default record if none exists. Callers must have
    /// classified the URL as MP4-like already.
    pub fn ensure(&mut self, tab: TabId, url: &str) -> &mut ResourceRecord {
        let now = self.clock.now_ms();
        let seq = self.next_seq;
        self.next_seq += 1;

        let map = self.tabs.entry(tab).or_default();
        let rec = map
            .entry(url.to_string())
            .or_insert_with(|| ResourceRecord::new(url, now, seq));
        // last_seen stays non-decreasing even if the wall clock steps back
        rec.last_seen_ms = rec.last_seen_ms.max(now);
        rec.seq = seq;
        rec
    }

    /// Fold a response-header observation into the record for (tab, url),
    /// then re-run completeness inference. Skipped entirely unless the
    /// URL or the observed content type classifies as MP4-like.
    pub fn apply_response_observation(
        &mut self,
        tab: TabId,
        url: &str,
        response_headers: &[Header],
        status_code: u16,
    ) {
        let content_type = headers::get_header(response_headers, "Content-Type")
            .and_then(headers::normalize_content_type);
        if !classify::is_mp4_resource(url, content_type.as_deref()) {
            return;
        }

        let accept_ranges = headers::get_header(response_headers, "Accept-Ranges")
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty());
        let content_range = headers::get_header(response_headers, "Content-Range")
            .and_then(range::parse_content_range);
        let content_length = headers::get_header(response_headers, "Content-Length")
            .and_then(|v| range::parse_decimal(v.trim()));

        let rec = self.ensure(tab, url);
        if content_type.is_some() {
            rec.content_type = content_type;
        }
        // The latest response is authoritative for these two, including
        // clearing them when the header is absent this time around.
        rec.accept_ranges = accept_ranges;
        rec.last_content_range = content_range;

        if status_code == 200 {
            if let Some(len) = content_length {
                rec.size = Some(len);
            }
        }
        if let Some(total) = content_range.and_then(|cr| cr.size) {
            rec.size = Some(total);
        }

        rec.status = infer_status(rec);
        tracing::trace!(
            tab,
            url,
            status = ?rec.status,
            size = ?rec.size,
            "response observation applied"
        );
    }

    /// Record an outbound `Range` header for (tab, url). Skipped when the
    /// URL is not MP4-like or the header is absent or unparseable.
    pub fn apply_request_observation(&mut self, tab: TabId, url: &str, request_headers: &[Header]) {
        if !classify::looks_like_mp4_url(url) {
            return;
        }
        let Some(requested) = headers::get_header(request_headers, "Range")
            .and_then(range::parse_range_request)
        else {
            return;
        };
        let rec = self.ensure(tab, url);
        rec.last_request_range = Some(requested);
    }

    /// Drop all records for a tab. Idempotent.
    pub fn remove_tab(&mut self, tab: TabId) {
        if self.tabs.remove(&tab).is_some() {
            tracing::debug!(tab, "tab state discarded");
        }
    }

    /// Point-in-time copy of a tab's records, most recently observed
    /// first. Empty for unknown tabs. Later registry mutation is not
    /// observable through the returned vector.
    pub fn snapshot(&self, tab: TabId) -> Vec<ResourceRecord> {
        let mut records: Vec<ResourceRecord> = self
            .tabs
            .get(&tab)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        records.sort_by(|a, b| (b.last_seen_ms, b.seq).cmp(&(a.last_seen_ms, a.seq)));
        records
    }

    /// Tabs currently holding at least one record, ascending.
    pub fn tab_ids(&self) -> Vec<TabId> {
        let mut ids: Vec<TabId> = self.tabs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
