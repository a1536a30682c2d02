//! Completeness inference over accumulated header observations.

use crate::classify::MP4_CONTENT_TYPE;

use super::record::{ResourceRecord, Status};

/// Decide a record's status from its current headers.
///
/// Rules, in priority order:
/// 1. The last `Content-Range` covered the entire resource
///    (`start == 0`, `end == size - 1`, size known): the server
///    explicitly served the whole span in one response.
/// 2. Content type is `video/mp4`, `Accept-Ranges` is `none` or was
///    never seen, and the total size is known: a server without partial
///    content support answers any GET with the whole file.
/// 3. Otherwise the current status is kept. Never downgrades.
///
/// Deterministic and idempotent; safe to re-run after every update.
pub fn infer_status(rec: &ResourceRecord) -> Status {
    if let Some(cr) = rec.last_content_range {
        if let Some(size) = cr.size {
            if cr.start == 0 && cr.end.checked_add(1) == Some(size) {
                return Status::Full;
            }
        }
    }

    if rec.content_type.as_deref() == Some(MP4_CONTENT_TYPE) {
        let no_partial_support = matches!(rec.accept_ranges.as_deref(), None | Some("none"));
        if no_partial_support && rec.size.is_some() {
            return Status::Full;
        }
    }

    rec.status
}
