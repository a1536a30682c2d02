//! Download initiation and one-shot header injection bookkeeping.
//!
//! The host's download API may silently drop custom headers, so the
//! headers are also registered in a pending store and injected into the
//! first matching outbound request the extension itself initiates.
//! Whichever event consumes an entry removes it; entries are never
//! consumed twice. The baseline had no cleanup for entries whose
//! injection point never fires; this store bounds growth with a TTL and
//! a maximum entry count instead (see `PendingInjections`).

use std::collections::HashMap;

use thiserror::Error;

use crate::headers::Header;

/// Identifier the host assigns to a started download.
pub type DownloadId = i64;

/// Failure to start a download. Surfaced to the caller with the host's
/// message; never retried automatically.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download rejected by host: {0}")]
    HostRejected(String),
}

/// Host capability for actually starting a download. The real
/// implementation wraps the browser's download API; tests use a stub.
pub trait DownloadHost {
    fn begin_download(&mut self, url: &str, headers: &[Header]) -> Result<DownloadId, DownloadError>;
}

/// What the caller wants downloaded.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    /// Injected as a `Referer` header when present (some CDNs require it).
    pub referer: Option<String>,
    /// Send `Range: bytes=0-` so range-only servers reply with the full span.
    pub force_range: bool,
}

struct PendingEntry {
    headers: Vec<Header>,
    inserted_ms: u64,
}

/// Headers awaiting injection, keyed by download URL.
///
/// Single-consumer: `take` removes the entry whether or not it is still
/// fresh. `insert` sweeps expired entries and, at capacity, drops the
/// oldest entry so the store stays bounded.
pub struct PendingInjections {
    entries: HashMap<String, PendingEntry>,
    ttl_ms: u64,
    max_entries: usize,
}

impl PendingInjections {
    pub fn new(ttl_ms: u64, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_ms,
            max_entries: max_entries.max(1),
        }
    }

    pub fn insert(&mut self, url: &str, headers: Vec<Header>, now_ms: u64) {
        self.sweep(now_ms);
        if !self.entries.contains_key(url) && self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_ms)
                .map(|(url, _)| url.clone());
            if let Some(oldest) = oldest {
                self.entries.remove(&oldest);
                tracing::debug!(url = %oldest, "pending injection dropped at capacity");
            }
        }
        self.entries.insert(
            url.to_string(),
            PendingEntry {
                headers,
                inserted_ms: now_ms,
            },
        );
    }

    /// Consume the entry for `url`. Returns `None` for unknown URLs and
    /// for entries that outlived their TTL (still removed).
    pub fn take(&mut self, url: &str, now_ms: u64) -> Option<Vec<Header>> {
        let entry = self.entries.remove(url)?;
        if now_ms.saturating_sub(entry.inserted_ms) > self.ttl_ms {
            tracing::debug!(url, "pending injection expired before use");
            return None;
        }
        Some(entry.headers)
    }

    fn sweep(&mut self, now_ms: u64) {
        let ttl = self.ttl_ms;
        self.entries
            .retain(|_, e| now_ms.saturating_sub(e.inserted_ms) <= ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the injection headers for `req`, register them for one-shot
/// injection, and ask the host to begin the download. On host rejection
/// the pending entry is withdrawn, since the request it would patch will
/// never be sent.
pub fn start_download(
    host: &mut dyn DownloadHost,
    pending: &mut PendingInjections,
    req: &DownloadRequest,
    now_ms: u64,
) -> Result<DownloadId, DownloadError> {
    let mut headers = Vec::new();
    if req.force_range {
        headers.push(Header::new("Range", "bytes=0-"));
    }
    if let Some(referer) = &req.referer {
        headers.push(Header::new("Referer", referer.clone()));
    }

    pending.insert(&req.url, headers.clone(), now_ms);

    match host.begin_download(&req.url, &headers) {
        Ok(id) => {
            tracing::info!(url = %req.url, id, "download started");
            Ok(id)
        }
        Err(err) => {
            let _ = pending.take(&req.url, now_ms);
            tracing::warn!(url = %req.url, %err, "download rejected");
            Err(err)
        }
    }
}
