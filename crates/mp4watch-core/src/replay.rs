//! Recorded event logs.
//!
//! A capture harness can dump the host's notifications as a JSON array
//! of tagged events; feeding that file back through [`replay`] rebuilds
//! the registry state the live pipeline would have reached. This is how
//! the CLI inspects traffic and how end-to-end tests drive the core
//! without a browser.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::pipeline::{Pipeline, RequestEvent, ResponseEvent, TabClosedEvent};
use crate::registry::TabId;

/// One recorded host notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Request(RequestEvent),
    ResponseHeaders(ResponseEvent),
    TabClosed(TabClosedEvent),
    SeedCandidates { tab_id: TabId, urls: Vec<String> },
}

/// Parse a JSON event log.
pub fn parse_log(data: &str) -> Result<Vec<Event>> {
    serde_json::from_str(data).context("invalid event log JSON")
}

/// Read and parse an event log file.
pub fn read_log(path: &Path) -> Result<Vec<Event>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read event log {}", path.display()))?;
    parse_log(&data)
}

/// Feed events to the pipeline in recorded order.
pub fn replay(pipeline: &mut Pipeline, events: &[Event]) {
    for event in events {
        match event {
            Event::Request(e) => {
                let _ = pipeline.on_outbound_request(e);
            }
            Event::ResponseHeaders(e) => pipeline.on_response_headers(e),
            Event::TabClosed(e) => pipeline.on_tab_closed(e),
            Event::SeedCandidates { tab_id, urls } => pipeline.seed_candidates(*tab_id, urls),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WatchConfig;
    use crate::registry::Status;

    #[test]
    fn parse_log_accepts_tagged_events() {
        let events = parse_log(
            r#"[
                {"type": "seed_candidates", "tab_id": 1, "urls": ["https://a/v.mp4"]},
                {"type": "request", "url": "https://a/v.mp4", "tab_id": 1,
                 "request_headers": [{"name": "Range", "value": "bytes=0-"}]},
                {"type": "response_headers", "url": "https://a/v.mp4", "tab_id": 1,
                 "response_headers": [{"name": "Content-Range", "value": "bytes 0-9/10"}],
                 "status_code": 206},
                {"type": "tab_closed", "tab_id": 1}
            ]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], Event::SeedCandidates { .. }));
        assert!(matches!(events[3], Event::TabClosed(_)));
    }

    #[test]
    fn parse_log_rejects_unknown_event_type() {
        assert!(parse_log(r#"[{"type": "reboot"}]"#).is_err());
        assert!(parse_log("not json").is_err());
    }

    #[test]
    fn read_log_from_file() {
        use std::io::Write;

        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"[{{"type": "tab_closed", "tab_id": 2}}]"#).unwrap();
        let events = read_log(f.path()).unwrap();
        assert_eq!(events.len(), 1);

        assert!(read_log(std::path::Path::new("/nonexistent/log.json")).is_err());
    }

    #[test]
    fn replay_rebuilds_registry_state() {
        let events = parse_log(
            r#"[
                {"type": "response_headers", "url": "https://a/v.mp4", "tab_id": 1,
                 "response_headers": [
                    {"name": "Content-Type", "value": "video/mp4"},
                    {"name": "Content-Range", "value": "bytes 0-4999999/5000000"}
                 ],
                 "status_code": 206}
            ]"#,
        )
        .unwrap();

        let mut pipeline = Pipeline::new(&WatchConfig::default());
        replay(&mut pipeline, &events);
        let reply = pipeline.status_for_tab(1);
        assert_eq!(reply.data.len(), 1);
        assert_eq!(reply.data[0].status, Status::Full);
        assert_eq!(reply.data[0].size, Some(5_000_000));
    }
}
