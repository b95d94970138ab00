//! Incremental transcript capture.
//!
//! One pass per invocation: parse the session's JSONL transcript, select the
//! entries appended since the previous capture, render them into a tagged
//! turn block, and advance the session's cursor. Returns `None` whenever
//! there is nothing worth capturing; only real I/O faults are errors.

pub mod format;
pub mod parse;
pub mod select;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::path::Path;
use supermemory_core::markup;
use supermemory_settings::ToolInclusionList;
use supermemory_trackers::TrackerStore;

/// Captures shorter than this are discarded and the cursor is left alone,
/// so the same entries are retried once more context accumulates.
pub const MIN_CAPTURE_CHARS: usize = 100;

/// Everything one capture pass needs from the environment.
pub struct CaptureContext {
    pub include_tools: ToolInclusionList,
    pub trackers: TrackerStore,
}

impl CaptureContext {
    /// Resolve the inclusion policy for `cwd` and open the default tracker
    /// store under the user's home directory.
    pub fn from_cwd(cwd: &Path) -> Result<Self> {
        Ok(Self {
            include_tools: ToolInclusionList::from_cwd(cwd),
            trackers: TrackerStore::open_default()?,
        })
    }
}

/// Run one capture pass over `transcript_path` for `session_id`.
///
/// Returns the formatted turn block, or `None` when the transcript is
/// empty, nothing new has been appended, or the rendered block falls under
/// [`MIN_CAPTURE_CHARS`]. The cursor advances to the last selected entry
/// only when a block is returned.
pub fn format_new_entries(
    ctx: &CaptureContext,
    transcript_path: &Path,
    session_id: &str,
) -> Result<Option<String>> {
    let entries = parse::parse_transcript(transcript_path)?;
    if entries.is_empty() {
        return Ok(None);
    }

    let last_uuid = ctx.trackers.last_captured(session_id)?;
    let new_entries = select::entries_since_last_capture(entries, last_uuid.as_deref());
    if new_entries.is_empty() {
        tracing::debug!("No new entries for session {session_id}");
        return Ok(None);
    }

    let timestamp = new_entries[0]
        .timestamp()
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
    // The cursor advances past every selected entry, rendered or not.
    let cursor_uuid = new_entries
        .last()
        .and_then(|entry| entry.uuid())
        .map(str::to_string);

    let mut formatter = format::MessageFormatter::new(ctx.include_tools.clone());
    let mut parts = vec![markup::turn_start(&timestamp)];
    for entry in &new_entries {
        if let Some(formatted) = formatter.format_entry(entry) {
            parts.push(formatted);
        }
    }
    parts.push(markup::TURN_END.to_string());

    let block = parts.join("\n\n");
    if block.chars().count() < MIN_CAPTURE_CHARS {
        tracing::debug!("Capture for session {session_id} is below the minimum size");
        return Ok(None);
    }

    if let Some(uuid) = cursor_uuid {
        ctx.trackers.record_captured(session_id, &uuid)?;
    }

    Ok(Some(block))
}
