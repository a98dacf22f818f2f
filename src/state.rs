//! Per-workspace persisted state under `.flowswitch/`.
//!
//! Holds the last-chosen network. A missing or unreadable state file means no network has
//! been chosen yet.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::diagnostics::SwitchError;

pub const STATE_DIR: &str = ".flowswitch";
const STATE_FILE: &str = "state.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceState {
    pub current_network: Option<String>,
    /// Seconds since the Unix epoch of the last change.
    #[serde(default)]
    pub updated_at: u64,
}

impl WorkspaceState {
    pub fn with_network(network: impl Into<String>) -> Self {
        let updated_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self { current_network: Some(network.into()), updated_at }
    }
}

pub fn state_dir(root: &Path) -> PathBuf {
    root.join(STATE_DIR)
}

fn state_path(root: &Path) -> PathBuf {
    state_dir(root).join(STATE_FILE)
}

/// Load persisted state for the workspace at `root`.
pub fn load_state(root: &Path) -> WorkspaceState {
    let path = state_path(root);
    let Ok(content) = fs::read_to_string(&path) else {
        return WorkspaceState::default();
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), "ignoring unreadable state file: {e}");
        WorkspaceState::default()
    })
}

/// Remember `network` as the current one.
pub fn save_network(root: &Path, network: &str) -> Result<(), SwitchError> {
    let dir = state_dir(root);
    fs::create_dir_all(&dir)
        .map_err(|e| SwitchError::commit(format!("failed to create state directory: {e}"), dir.clone()))?;

    let path = state_path(root);
    let json = serde_json::to_string_pretty(&WorkspaceState::with_network(network))
        .map_err(|e| SwitchError::commit(format!("failed to serialize state: {e}"), path.clone()))?;
    fs::write(&path, json).map_err(|e| SwitchError::commit(format!("failed to write state: {e}"), path))
}
