//! Container tags: stable hashed identifiers grouping captures by project,
//! repository, and user in the memory store.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use supermemory_settings::load_project_config;

/// First 16 hex characters of the SHA-256 of `input`.
pub fn sha256_prefix(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..16].to_string()
}

/// Root of the git worktree containing `cwd`, if any.
pub fn git_root(cwd: &Path) -> Option<PathBuf> {
    let output = std::process::Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(cwd)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() {
        None
    } else {
        Some(PathBuf::from(root))
    }
}

fn base_path(cwd: &Path) -> PathBuf {
    git_root(cwd).unwrap_or_else(|| cwd.to_path_buf())
}

/// Per-person project tag; overridable via `personal_container_tag`.
pub fn container_tag(cwd: &Path) -> String {
    if let Some(tag) = load_project_config(cwd).and_then(|c| c.personal_container_tag) {
        return tag;
    }
    format!(
        "claudecode_project_{}",
        sha256_prefix(&base_path(cwd).to_string_lossy())
    )
}

/// Repo-wide tag shared by everyone working in the same checkout path;
/// overridable via `repo_container_tag`.
pub fn repo_container_tag(cwd: &Path) -> String {
    if let Some(tag) = load_project_config(cwd).and_then(|c| c.repo_container_tag) {
        return tag;
    }
    format!("repo_{}", sha256_prefix(&base_path(cwd).to_string_lossy()))
}

/// Last path component of the git root (or `cwd` outside a repo).
pub fn project_name(cwd: &Path) -> String {
    base_path(cwd)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Tag derived from the git identity, falling back to the OS username.
pub fn user_container_tag() -> String {
    let email = std::process::Command::new("git")
        .args(["config", "user.email"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|email| !email.is_empty());

    let identity = email.unwrap_or_else(|| {
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "anonymous".to_string())
    });
    format!("claudecode_user_{}", sha256_prefix(&identity))
}

pub fn run_tags(cwd: Option<PathBuf>) -> Result<()> {
    let cwd = match cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Could not determine current directory")?,
    };
    println!("project: {}", project_name(&cwd));
    println!("project tag: {}", container_tag(&cwd));
    println!("repo tag: {}", repo_container_tag(&cwd));
    println!("user tag: {}", user_container_tag());
    Ok(())
}
