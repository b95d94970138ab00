//! Selection of the entries appended since the previous capture.

use supermemory_core::transcript::TranscriptEntry;

/// Conversation entries that come after the entry carrying `last_uuid`.
///
/// With no cursor, every user/assistant entry is selected. A cursor that
/// matches nothing (transcript replaced, tracker edited by hand) selects
/// nothing; clearing the tracker is the recovery path.
pub fn entries_since_last_capture(
    entries: Vec<TranscriptEntry>,
    last_uuid: Option<&str>,
) -> Vec<TranscriptEntry> {
    let Some(marker) = last_uuid else {
        return entries
            .into_iter()
            .filter(|entry| entry.is_conversation())
            .collect();
    };

    let mut found_marker = false;
    let mut selected = Vec::new();
    for entry in entries {
        if entry.uuid() == Some(marker) {
            found_marker = true;
            continue;
        }
        if found_marker && entry.is_conversation() {
            selected.push(entry);
        }
    }
    selected
}
