//! `mp4watch replay` – rebuild registry state from a recorded event log.

use std::path::Path;

use anyhow::Result;
use mp4watch_core::config::WatchConfig;
use mp4watch_core::pipeline::Pipeline;
use mp4watch_core::registry::{ResourceRecord, Status, TabId};
use mp4watch_core::replay;

pub fn run_replay(cfg: &WatchConfig, path: &Path, tab: Option<TabId>, json: bool) -> Result<()> {
    let events = replay::read_log(path)?;
    tracing::debug!("replaying {} events from {}", events.len(), path.display());

    let mut pipeline = Pipeline::new(cfg);
    replay::replay(&mut pipeline, &events);

    let tabs = match tab {
        Some(t) => vec![t],
        None => pipeline.tab_ids(),
    };

    if json {
        let mut out = serde_json::Map::new();
        for t in &tabs {
            out.insert(
                t.to_string(),
                serde_json::to_value(pipeline.status_for_tab(*t))?,
            );
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Object(out))?
        );
        return Ok(());
    }

    if tabs.is_empty() {
        println!("No MP4-like resources observed.");
        return Ok(());
    }

    for t in tabs {
        let reply = pipeline.status_for_tab(t);
        if !reply.ok {
            println!("tab {t}: invalid tab id");
            continue;
        }
        println!("tab {t}:");
        println!("{:<8} {:<12} {:<14} {}", "STATUS", "SIZE", "TYPE", "URL");
        for rec in &reply.data {
            println!("{}", render_row(rec));
        }
    }
    Ok(())
}

fn render_row(rec: &ResourceRecord) -> String {
    let status = match rec.status {
        Status::Full => "full",
        Status::Unknown => "unknown",
    };
    let size = rec
        .size
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let ctype = rec.content_type.as_deref().unwrap_or("-");
    format!("{:<8} {:<12} {:<14} {}", status, size, ctype, rec.url)
}
