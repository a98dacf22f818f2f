use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Deserialize;

use crate::diagnostics::SwitchError;

pub const SETTINGS_FILE: &str = "flowswitch.toml";
pub const DEFAULT_FLOW_FILE: &str = "flow.json";

/// Resolved tool settings for one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub flow_file: String,
    pub find_globs: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flow_file: DEFAULT_FLOW_FILE.to_string(),
            find_globs: default_globs(),
            exclude: default_exclude(),
        }
    }
}

impl Settings {
    pub fn flow_path(&self, root: &Path) -> PathBuf {
        root.join(&self.flow_file)
    }
}

// ---- TOML deserialization types ----

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    #[serde(default = "default_flow_file")]
    flow_file: String,
    #[serde(default = "default_globs")]
    find_globs: Vec<String>,
    #[serde(default = "default_exclude")]
    exclude: Vec<String>,
}

fn default_flow_file() -> String {
    DEFAULT_FLOW_FILE.to_string()
}

fn default_globs() -> Vec<String> {
    vec!["**/*.cdc".to_string(), "**/*.cadence".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

/// Load `flowswitch.toml` from `root`. A missing file yields the defaults.
pub fn load_settings(root: &Path) -> Result<Settings, SwitchError> {
    let path = root.join(SETTINGS_FILE);
    if !path.is_file() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|e| {
        SwitchError::settings(format!("{SETTINGS_FILE}: could not read file: {e}"), path.clone())
    })?;
    parse_settings(&content, &path)
}

pub fn parse_settings(content: &str, path: &Path) -> Result<Settings, SwitchError> {
    let raw: TomlSettings = toml::from_str(content).map_err(|e| {
        SwitchError::settings(format!("{SETTINGS_FILE}: invalid syntax: {e}"), path.to_path_buf())
    })?;

    if raw.flow_file.trim().is_empty() {
        return Err(SwitchError::settings(
            format!("{SETTINGS_FILE}: 'flow_file' must not be empty"),
            path.to_path_buf(),
        ));
    }
    if raw.find_globs.is_empty() {
        return Err(SwitchError::settings(
            format!("{SETTINGS_FILE}: 'find_globs' must list at least one pattern"),
            path.to_path_buf(),
        ));
    }
    for pattern in raw.find_globs.iter().chain(&raw.exclude) {
        validate_glob(pattern).map_err(|msg| {
            SwitchError::settings(format!("{SETTINGS_FILE}: {msg}"), path.to_path_buf())
        })?;
    }

    Ok(Settings {
        flow_file: raw.flow_file,
        find_globs: raw.find_globs,
        exclude: raw.exclude,
    })
}

pub fn validate_glob(pattern: &str) -> Result<(), String> {
    Pattern::new(pattern)
        .map(|_| ())
        .map_err(|e| format!("invalid glob '{pattern}': {e}"))
}
