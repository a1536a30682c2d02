//! Integration test: replay a recorded browsing session through the
//! pipeline and check the completeness verdicts an observer would see.

use std::rc::Rc;

use mp4watch_core::clock::ManualClock;
use mp4watch_core::config::WatchConfig;
use mp4watch_core::pipeline::Pipeline;
use mp4watch_core::registry::Status;
use mp4watch_core::replay::{parse_log, replay};

fn session_log() -> &'static str {
    r#"[
        {"type": "seed_candidates", "tab_id": 10,
         "urls": ["https://cdn.example.com/trailer.mp4",
                  "https://cdn.example.com/video.mp4backup/seg1.ts"]},

        {"type": "request", "url": "https://cdn.example.com/stream.mp4", "tab_id": 10,
         "request_headers": [{"name": "Range", "value": "bytes=0-"}]},
        {"type": "response_headers", "url": "https://cdn.example.com/stream.mp4", "tab_id": 10,
         "response_headers": [
            {"name": "Content-Type", "value": "video/mp4"},
            {"name": "Accept-Ranges", "value": "bytes"},
            {"name": "Content-Range", "value": "bytes 0-1999999/2000000"}],
         "status_code": 206},

        {"type": "response_headers", "url": "https://cdn.example.com/trailer.mp4", "tab_id": 10,
         "response_headers": [
            {"name": "Content-Type", "value": "Video/MP4; codecs=\"avc1\""},
            {"name": "Accept-Ranges", "value": "none"},
            {"name": "Content-Length", "value": "5000000"}],
         "status_code": 200},

        {"type": "response_headers", "url": "https://cdn.example.com/clip.mp4", "tab_id": 10,
         "response_headers": [
            {"name": "Content-Type", "value": "video/mp4"},
            {"name": "Accept-Ranges", "value": "bytes"},
            {"name": "Content-Range", "value": "bytes 1000-1999/8000000"}],
         "status_code": 206},

        {"type": "response_headers", "url": "https://other.example.com/page.html", "tab_id": 22,
         "response_headers": [{"name": "Content-Type", "value": "text/html"}],
         "status_code": 200}
    ]"#
}

fn build_pipeline() -> (Pipeline, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(1_000));
    let pipeline = Pipeline::with_clock(&WatchConfig::default(), Box::new(Rc::clone(&clock)));
    (pipeline, clock)
}

#[test]
fn session_replay_yields_expected_verdicts() {
    let (mut pipeline, _clock) = build_pipeline();
    replay(&mut pipeline, &parse_log(session_log()).unwrap());

    let reply = pipeline.status_for_tab(10);
    assert!(reply.ok);
    assert_eq!(reply.data.len(), 4);

    let by_url = |suffix: &str| {
        reply
            .data
            .iter()
            .find(|r| r.url.ends_with(suffix))
            .unwrap_or_else(|| panic!("missing record for {suffix}"))
    };

    // Whole-span 206: full.
    let stream = by_url("stream.mp4");
    assert_eq!(stream.status, Status::Full);
    assert_eq!(stream.size, Some(2_000_000));
    assert_eq!(stream.last_request_range.unwrap().start, Some(0));

    // Plain 200 with no range support: full.
    let trailer = by_url("trailer.mp4");
    assert_eq!(trailer.status, Status::Full);
    assert_eq!(trailer.size, Some(5_000_000));
    assert_eq!(trailer.content_type.as_deref(), Some("video/mp4"));

    // Mid-file chunk: still unknown, but size learned.
    let clip = by_url("clip.mp4");
    assert_eq!(clip.status, Status::Unknown);
    assert_eq!(clip.size, Some(8_000_000));

    // Seeded false positive: tracked, never upgraded.
    let seg = by_url("seg1.ts");
    assert_eq!(seg.status, Status::Unknown);

    // The HTML tab never produced a candidate.
    assert!(pipeline.status_for_tab(22).data.is_empty());
    assert_eq!(pipeline.tab_ids(), vec![10]);
}

#[test]
fn replay_orders_snapshot_by_observation_time() {
    let (mut pipeline, clock) = build_pipeline();
    let log: Vec<mp4watch_core::replay::Event> = parse_log(session_log()).unwrap();

    // Deliver each event one millisecond apart.
    for event in &log {
        clock.advance(1);
        replay(&mut pipeline, std::slice::from_ref(event));
    }

    let status = pipeline.status_for_tab(10);
    let urls: Vec<&str> = status.data.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://cdn.example.com/clip.mp4",
            "https://cdn.example.com/trailer.mp4",
            "https://cdn.example.com/stream.mp4",
            "https://cdn.example.com/video.mp4backup/seg1.ts",
        ],
        "trailer.mp4 was seeded first but its response refreshed last_seen"
    );
}

#[test]
fn tab_closed_mid_log_discards_only_that_tab() {
    let (mut pipeline, _clock) = build_pipeline();
    let mut events = parse_log(session_log()).unwrap();
    events.push(
        parse_log(r#"[{"type": "tab_closed", "tab_id": 10}]"#)
            .unwrap()
            .remove(0),
    );
    replay(&mut pipeline, &events);
    assert!(pipeline.status_for_tab(10).data.is_empty());
}
