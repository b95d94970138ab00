//! Transcript file decoding.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;
use supermemory_core::transcript::TranscriptEntry;

/// Decode every line of the transcript at `path`, in file order.
///
/// A missing file is an empty transcript. Lines that fail to decode are
/// skipped; the session may still be appending and the last line can be
/// torn mid-write.
pub fn parse_transcript(path: &Path) -> Result<Vec<TranscriptEntry>> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to open transcript: {}", path.display()));
        }
    };
    let reader = std::io::BufReader::new(file);

    let mut entries = Vec::new();
    for line_result in reader.lines() {
        let line = match line_result {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to read transcript line: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<TranscriptEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::debug!("Skipping unparseable transcript line: {}", e);
            }
        }
    }

    Ok(entries)
}
