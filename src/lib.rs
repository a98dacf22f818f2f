pub mod address;
pub mod commit;
pub mod config;
pub mod content_hash;
pub mod diagnostics;
pub mod discover;
pub mod line_index;
pub mod preview;
pub mod rewrite;
pub mod scan;
pub mod settings;
pub mod state;
pub mod watch;

use std::path::{Path, PathBuf};

use tracing::info;

use config::{FlowMapping, NetworkMap};
use diagnostics::SwitchError;
use discover::FileMatcher;
use rewrite::Rewrite;
use settings::Settings;

pub use config::{build_mapping, build_mapping_in_order};
pub use rewrite::{rewrite_sources, rewrite_text};

/// A workspace root plus its resolved settings. Entry point for the orchestration layer.
pub struct Workspace {
    root: PathBuf,
    settings: Settings,
}

/// A computed but uncommitted switch to one network.
#[derive(Debug, Clone)]
pub struct PlannedSwitch {
    pub network: String,
    pub rewrite: Rewrite,
}

impl Workspace {
    /// Open the workspace at `root`, reading `flowswitch.toml` if present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SwitchError> {
        let root = root.into();
        let settings = settings::load_settings(&root)?;
        Ok(Self { root, settings })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn flow_path(&self) -> PathBuf {
        self.settings.flow_path(&self.root)
    }

    /// Build the mapping from the workspace configuration file.
    pub fn load_mapping(&self) -> Result<FlowMapping, SwitchError> {
        let (mapping, _text) = config::read_mapping(&self.flow_path())?;
        Ok(mapping)
    }

    /// Like `load_mapping`, but an empty network set is an error.
    pub fn load_networks(&self) -> Result<FlowMapping, SwitchError> {
        let mapping = self.load_mapping()?;
        if mapping.networks.is_empty() {
            return Err(SwitchError::NoNetworks { path: self.flow_path() });
        }
        Ok(mapping)
    }

    /// The persisted network, if one was chosen before.
    pub fn current_network(&self) -> Option<String> {
        state::load_state(&self.root).current_network
    }

    pub fn remember_network(&self, network: &str) -> Result<(), SwitchError> {
        state::save_network(&self.root, network)
    }

    /// Write the default configuration. Never overwrites an existing file.
    pub fn init_config(&self) -> Result<PathBuf, SwitchError> {
        let path = self.flow_path();
        if path.exists() {
            return Err(SwitchError::ConfigExists { path });
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SwitchError::commit(format!("failed to create {}: {e}", parent.display()), path.clone()))?;
        }
        std::fs::write(&path, config::default_config_text())
            .map_err(|e| SwitchError::commit(format!("failed to write configuration: {e}"), path.clone()))?;
        info!(path = %path.display(), "created default configuration");
        Ok(path)
    }

    /// Rewrite the workspace's candidate files against one network's map.
    pub fn plan_with(&self, network: &str, net_map: &NetworkMap) -> Result<PlannedSwitch, SwitchError> {
        let matcher = FileMatcher::new(&self.settings.find_globs, &self.settings.exclude)?;
        let sources = discover::load_sources(&self.root, &matcher)?;
        info!(network, files = sources.len(), "planning rewrite");
        Ok(PlannedSwitch {
            network: network.to_string(),
            rewrite: rewrite::rewrite_sources(net_map, sources),
        })
    }

    /// Build the mapping, select `network`, and plan the rewrite.
    pub fn plan(&self, network: &str) -> Result<PlannedSwitch, SwitchError> {
        let mapping = self.load_networks()?;
        let net_map = mapping.select(network)?;
        self.plan_with(network, net_map)
    }
}
