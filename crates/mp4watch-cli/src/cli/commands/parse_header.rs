//! `mp4watch parse-header` – try a value against both range grammars.

use anyhow::Result;
use mp4watch_core::headers::range::{parse_content_range, parse_range_request};

pub fn run_parse_header(value: &str) -> Result<()> {
    if let Some(cr) = parse_content_range(value) {
        let size = cr
            .size
            .map(|s| s.to_string())
            .unwrap_or_else(|| "*".to_string());
        println!(
            "content-range: start={} end={} size={}",
            cr.start, cr.end, size
        );
        return Ok(());
    }
    if let Some(rr) = parse_range_request(value) {
        println!(
            "range-request: start={} end={}",
            fmt_bound(rr.start),
            fmt_bound(rr.end)
        );
        return Ok(());
    }
    println!("unparseable as Content-Range or Range");
    Ok(())
}

fn fmt_bound(bound: Option<u64>) -> String {
    bound
        .map(|b| b.to_string())
        .unwrap_or_else(|| "open".to_string())
}
