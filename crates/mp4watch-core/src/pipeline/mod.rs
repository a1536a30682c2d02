//! Observation pipeline: glue between host events and the registry.
//!
//! The host's network notifications arrive as the payload types below.
//! A [`Pipeline`] owns the registry and the pending-injection store, so
//! construction and teardown are explicit; nothing here is global.
//! Everything runs synchronously on the caller's thread, and a malformed
//! header or URL in one event never disturbs processing of the next.


use serde::{Deserialize, Serialize};

use crate::classify;
use crate::clock::Clock;
use crate::config::WatchConfig;
use crate::download::{
    self, DownloadError, DownloadHost, DownloadId, DownloadRequest, PendingInjections,
};
use crate::headers::{self, Header};
use crate::registry::{ResourceRecord, TabId, TabRegistry};

/// Outbound-request notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEvent {
    pub url: String,
    pub tab_id: TabId,
    #[serde(default)]
    pub request_headers: Vec<Header>,
    /// Origin that initiated the request, when the host reports one.
    #[serde(default)]
    pub initiator: Option<String>,
}

/// Response-headers notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEvent {
    pub url: String,
    pub tab_id: TabId,
    #[serde(default)]
    pub response_headers: Vec<Header>,
    pub status_code: u16,
}

/// Tab-closed notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TabClosedEvent {
    pub tab_id: TabId,
}

/// Reply to the per-tab status query. `ok` is false when the tab id is
/// invalid; `data` is the snapshot, most recently observed first.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReply {
    pub ok: bool,
    pub data: Vec<ResourceRecord>,
}

/// Wires host events into the registry and serves status queries.
pub struct Pipeline {
    registry: TabRegistry,
    pending: PendingInjections,
    self_origin: Option<String>,
}

impl Pipeline {
    pub fn new(cfg: &WatchConfig) -> Self {
        Self::from_parts(cfg, TabRegistry::new())
    }

    /// Construct with an injected clock for deterministic replay.
    pub fn with_clock(cfg: &WatchConfig, clock: Box<dyn Clock>) -> Self {
        Self::from_parts(cfg, TabRegistry::with_clock(clock))
    }

    fn from_parts(cfg: &WatchConfig, registry: TabRegistry) -> Self {
        Self {
            registry,
            pending: PendingInjections::new(cfg.pending_ttl_ms(), cfg.pending_max_entries),
            self_origin: cfg.self_origin.clone(),
        }
    }

    /// Handle an outbound request. If the request is a pending download
    /// initiated by the extension itself, returns the header set with the
    /// registered injections applied (and consumes them); otherwise
    /// records any MP4-like `Range` observation and returns `None`.
    pub fn on_outbound_request(&mut self, event: &RequestEvent) -> Option<Vec<Header>> {
        if let Some(patched) = self.inject_pending(event) {
            return Some(patched);
        }
        if event.tab_id >= 0 {
            self.registry
                .apply_request_observation(event.tab_id, &event.url, &event.request_headers);
        }
        None
    }

    fn inject_pending(&mut self, event: &RequestEvent) -> Option<Vec<Header>> {
        let origin = self.self_origin.as_deref()?;
        let initiator = event.initiator.as_deref()?;
        if !initiator.starts_with(origin) {
            return None;
        }
        let now = self.registry.now_ms();
        let inject = self.pending.take(&event.url, now)?;
        let mut patched = event.request_headers.clone();
        for h in &inject {
            headers::set_or_add_header(&mut patched, &h.name, &h.value);
        }
        tracing::debug!(url = %event.url, "injected headers into pending download request");
        Some(patched)
    }

    /// Handle a response-headers notification.
    pub fn on_response_headers(&mut self, event: &ResponseEvent) {
        if event.tab_id < 0 {
            return;
        }
        self.registry.apply_response_observation(
            event.tab_id,
            &event.url,
            &event.response_headers,
            event.status_code,
        );
    }

    /// Handle a tab-closed notification.
    pub fn on_tab_closed(&mut self, event: &TabClosedEvent) {
        self.registry.remove_tab(event.tab_id);
    }

    /// Register candidate URLs a DOM scanner discovered in markup, before
    /// any network observation. Each accepted URL becomes an
    /// `unknown`-status record. URLs that fail the MP4 heuristic are
    /// skipped, which keeps the registry's creation invariant even for a
    /// sloppy scanner.
    pub fn seed_candidates(&mut self, tab: TabId, urls: &[String]) {
        if tab < 0 {
            return;
        }
        for url in urls {
            if classify::looks_like_mp4_url(url) {
                self.registry.ensure(tab, url);
            }
        }
    }

    /// Point-in-time status for a tab.
    pub fn status_for_tab(&self, tab: TabId) -> StatusReply {
        if tab < 0 {
            return StatusReply {
                ok: false,
                data: Vec::new(),
            };
        }
        StatusReply {
            ok: true,
            data: self.registry.snapshot(tab),
        }
    }

    /// Tabs with at least one tracked resource, ascending.
    pub fn tab_ids(&self) -> Vec<TabId> {
        self.registry.tab_ids()
    }

    /// Start a download via the host, registering its headers for
    /// one-shot injection into the matching outbound request.
    pub fn start_download(
        &mut self,
        host: &mut dyn DownloadHost,
        req: &DownloadRequest,
    ) -> Result<DownloadId, DownloadError> {
        let now = self.registry.now_ms();
        download::start_download(host, &mut self.pending, req, now)
    }
}
