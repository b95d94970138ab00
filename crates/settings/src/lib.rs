//! Capture configuration.
//!
//! Two optional TOML files feed the pipeline:
//!
//! - `<project>/.supermemory/config.toml`, found by walking up from the
//!   working directory; holds a per-project include list and container-tag
//!   overrides.
//! - `~/.supermemory-claude/config.toml`, machine-wide defaults under a
//!   `[capture]` table.
//!
//! Project settings win over global ones; without any configuration the
//! include list falls back to [`DEFAULT_INCLUDE_TOOLS`]. Unreadable config
//! files are ignored so a bad edit never blocks a capture.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory a project keeps its config in, discovered by walking up.
pub const PROJECT_CONFIG_DIR: &str = ".supermemory";
/// Config file name, shared by the project and global locations.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DATA_DIR_NAME: &str = ".supermemory-claude";

/// Tools whose invocations and results are captured in full when no
/// configuration says otherwise. Everything else collapses to a mention.
pub const DEFAULT_INCLUDE_TOOLS: &[&str] =
    &["Write", "Edit", "MultiEdit", "NotebookEdit", "Bash", "Task"];

/// Per-project configuration (`<project>/.supermemory/config.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub include_tools: Option<Vec<String>>,
    /// Overrides the derived user container tag.
    #[serde(default)]
    pub personal_container_tag: Option<String>,
    /// Overrides the derived project/repo container tags.
    #[serde(default)]
    pub repo_container_tag: Option<String>,
}

/// Machine-wide configuration (`~/.supermemory-claude/config.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub capture: CaptureSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureSettings {
    #[serde(default)]
    pub include_tools: Option<Vec<String>>,
}

/// Find `<dir>/.supermemory/config.toml`, walking up from `cwd`.
pub fn find_project_config(cwd: &Path) -> Option<PathBuf> {
    let mut dir = Some(cwd);
    while let Some(current) = dir {
        let candidate = current.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

/// Load the project config that governs `cwd`, if one exists and parses.
pub fn load_project_config(cwd: &Path) -> Option<ProjectConfig> {
    load_toml(&find_project_config(cwd)?)
}

/// Load the machine-wide config, if one exists and parses.
pub fn load_global_config() -> Option<GlobalConfig> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()?;
    load_toml(
        &PathBuf::from(home)
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&raw) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!("Ignoring unreadable config {}: {}", path.display(), e);
            None
        }
    }
}

/// The resolved set of tool names whose detail is kept in captures.
#[derive(Debug, Clone)]
pub struct ToolInclusionList(Vec<String>);

impl ToolInclusionList {
    pub fn new(tools: Vec<String>) -> Self {
        Self(tools)
    }

    /// Project list first, then the global list, then the default list.
    pub fn resolve(project: Option<&ProjectConfig>, global: Option<&GlobalConfig>) -> Self {
        let tools = project
            .and_then(|p| p.include_tools.clone())
            .or_else(|| global.and_then(|g| g.capture.include_tools.clone()))
            .unwrap_or_else(|| {
                DEFAULT_INCLUDE_TOOLS
                    .iter()
                    .map(|tool| tool.to_string())
                    .collect()
            });
        Self(tools)
    }

    /// Resolve for a working directory, reading both config files.
    pub fn from_cwd(cwd: &Path) -> Self {
        Self::resolve(
            load_project_config(cwd).as_ref(),
            load_global_config().as_ref(),
        )
    }

    /// Exact, case-sensitive membership check.
    pub fn includes(&self, tool_name: &str) -> bool {
        self.0.iter().any(|tool| tool == tool_name)
    }

    pub fn tools(&self) -> &[String] {
        &self.0
    }
}

impl Default for ToolInclusionList {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}
