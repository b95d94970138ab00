//! `supermemory-claude hook` — manages the Claude Code Stop hook.
//!
//! The Stop hook fires when the assistant finishes a turn, which is the
//! natural point to capture what was appended to the transcript. Install
//! edits the `hooks.Stop` array in `~/.claude/settings.json` in place and
//! is idempotent.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const HOOK_COMMAND: &str = "supermemory-claude capture";

fn claude_settings_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".claude").join("settings.json"))
}

fn load_settings(path: &Path) -> serde_json::Value {
    if path.exists() {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_else(|| serde_json::json!({}))
    } else {
        serde_json::json!({})
    }
}

fn save_settings(path: &Path, settings: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn stop_hooks_mut(settings: &mut serde_json::Value) -> Result<&mut Vec<serde_json::Value>> {
    let hooks = settings
        .as_object_mut()
        .context("settings is not an object")?
        .entry("hooks")
        .or_insert_with(|| serde_json::json!({}));
    let stop = hooks
        .as_object_mut()
        .context("hooks is not an object")?
        .entry("Stop")
        .or_insert_with(|| serde_json::json!([]));
    stop.as_array_mut().context("Stop is not an array")
}

fn entry_runs_capture(entry: &serde_json::Value) -> bool {
    entry
        .get("hooks")
        .and_then(|h| h.as_array())
        .is_some_and(|hooks| {
            hooks
                .iter()
                .any(|h| h.get("command").and_then(|c| c.as_str()) == Some(HOOK_COMMAND))
        })
}

fn is_installed(settings: &serde_json::Value) -> bool {
    settings
        .get("hooks")
        .and_then(|h| h.get("Stop"))
        .and_then(|s| s.as_array())
        .is_some_and(|arr| arr.iter().any(entry_runs_capture))
}

fn install_at(settings_path: &Path) -> Result<bool> {
    let mut settings = load_settings(settings_path);
    let arr = stop_hooks_mut(&mut settings)?;

    if arr.iter().any(entry_runs_capture) {
        return Ok(false);
    }

    arr.push(serde_json::json!({
        "hooks": [{
            "type": "command",
            "command": HOOK_COMMAND,
            "timeout": 10
        }]
    }));
    save_settings(settings_path, &settings)?;
    Ok(true)
}

fn uninstall_at(settings_path: &Path) -> Result<bool> {
    let mut settings = load_settings(settings_path);
    if !is_installed(&settings) {
        return Ok(false);
    }
    let arr = stop_hooks_mut(&mut settings)?;
    arr.retain(|entry| !entry_runs_capture(entry));
    save_settings(settings_path, &settings)?;
    Ok(true)
}

pub fn install() -> Result<()> {
    let path = claude_settings_path()?;
    if install_at(&path)? {
        println!("Capture hook installed in {}", path.display());
    } else {
        println!("Capture hook already installed.");
    }
    Ok(())
}

pub fn uninstall() -> Result<()> {
    let path = claude_settings_path()?;
    if uninstall_at(&path)? {
        println!("Capture hook removed from {}", path.display());
    } else {
        println!("Capture hook is not installed.");
    }
    Ok(())
}

pub fn status() -> Result<()> {
    let path = claude_settings_path()?;
    if is_installed(&load_settings(&path)) {
        println!("Capture hook is installed ({}).", path.display());
    } else {
        println!("Capture hook is not installed.");
    }
    Ok(())
}
