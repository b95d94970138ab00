//! `supermemory-claude capture` — one incremental capture pass.
//!
//! Claude Code's Stop hook pipes a JSON payload on stdin; flags override it
//! for manual runs. Prints the formatted block to stdout, or nothing when
//! the pass found nothing new.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use supermemory_capture::{format_new_entries, CaptureContext};

/// The fields of the hook payload this command reads.
#[derive(Debug, Default, Deserialize)]
struct HookInput {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    transcript_path: Option<PathBuf>,
    #[serde(default)]
    cwd: Option<PathBuf>,
}

fn read_hook_input() -> HookInput {
    // Only read stdin when it is piped; an interactive run would block.
    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return HookInput::default();
    }
    let mut raw = String::new();
    if std::io::stdin().read_to_string(&mut raw).is_err() || raw.trim().is_empty() {
        return HookInput::default();
    }
    match serde_json::from_str(&raw) {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!("Ignoring unparseable hook payload: {}", e);
            HookInput::default()
        }
    }
}

pub fn run_capture(
    transcript: Option<PathBuf>,
    session_id: Option<String>,
    cwd: Option<PathBuf>,
) -> Result<()> {
    let hook = read_hook_input();

    let transcript = transcript
        .or(hook.transcript_path)
        .context("No transcript path: pass --transcript or pipe the hook payload")?;
    let session_id = session_id
        .or(hook.session_id)
        .context("No session id: pass --session-id or pipe the hook payload")?;
    let cwd = match cwd.or(hook.cwd) {
        Some(dir) => dir,
        None => std::env::current_dir().context("Could not determine current directory")?,
    };

    let ctx = CaptureContext::from_cwd(&cwd)?;
    if let Some(block) = format_new_entries(&ctx, &transcript, &session_id)? {
        println!("{block}");
    }
    Ok(())
}
