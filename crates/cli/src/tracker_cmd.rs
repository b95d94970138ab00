//! `supermemory-claude tracker` — cursor maintenance.
//!
//! `clear` is the recovery path for a stale cursor (transcript rotated or
//! replaced): the next capture starts from the top of the file.

use anyhow::Result;
use supermemory_trackers::TrackerStore;

pub fn show(session_id: &str) -> Result<()> {
    let store = TrackerStore::open_default()?;
    match store.last_captured(session_id)? {
        Some(uuid) => println!("{uuid}"),
        None => println!("No capture recorded for session {session_id}."),
    }
    Ok(())
}

pub fn clear(session_id: &str) -> Result<()> {
    let store = TrackerStore::open_default()?;
    if store.clear(session_id)? {
        println!("Cleared cursor for session {session_id}.");
    } else {
        println!("No cursor stored for session {session_id}.");
    }
    Ok(())
}
