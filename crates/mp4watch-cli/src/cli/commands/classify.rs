//! `mp4watch classify` – run the MP4-likeness heuristic on a URL.

use anyhow::Result;
use mp4watch_core::classify;

pub fn run_classify(url: &str) -> Result<()> {
    if classify::looks_like_mp4_url(url) {
        println!("mp4-like: {url}");
    } else {
        println!("not a candidate: {url}");
    }
    Ok(())
}
