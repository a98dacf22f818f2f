//! Builds the per-network identifier → address mapping from a flow.json-shaped document.
//!
//! The document is read as a generic `serde_json::Value` tree. Any field whose type does
//! not match what we expect is treated as absent; only unparseable text is an error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::address::normalize_address;
use crate::diagnostics::SwitchError;

/// Identifier name → normalized address, for one network.
pub type NetworkMap = BTreeMap<String, String>;

/// Network name → its identifier map.
pub type FullMapping = BTreeMap<String, NetworkMap>;

/// `<network>://<hexaddress>.<rest>`
static SOURCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9_-]+)://([0-9a-fA-F]+)\.(.+)$").expect("source pattern is valid")
});

/// A top-level group of declared items. Both groups share one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemGroup {
    Contracts,
    Dependencies,
}

impl ItemGroup {
    pub fn key(self) -> &'static str {
        match self {
            ItemGroup::Contracts => "contracts",
            ItemGroup::Dependencies => "dependencies",
        }
    }
}

/// Groups are scanned in this order; a later write to the same network/identifier
/// pair replaces an earlier one.
pub const DEFAULT_GROUP_ORDER: [ItemGroup; 2] = [ItemGroup::Contracts, ItemGroup::Dependencies];

/// Result of one mapping build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowMapping {
    pub mapping: FullMapping,
    pub networks: BTreeSet<String>,
}

impl FlowMapping {
    /// The identifier map of `network`, if the network is known.
    pub fn network(&self, network: &str) -> Option<&NetworkMap> {
        self.mapping.get(network)
    }

    /// Pick a network, or fail with the list of known ones.
    pub fn select(&self, network: &str) -> Result<&NetworkMap, SwitchError> {
        self.network(network).ok_or_else(|| SwitchError::UnknownNetwork {
            network: network.to_string(),
            available: self.networks.iter().cloned().collect(),
        })
    }

    fn declare(&mut self, network: &str) {
        self.networks.insert(network.to_string());
        self.mapping.entry(network.to_string()).or_default();
    }

    /// Declares `network` and, if the address normalizes, records the identifier.
    fn register(&mut self, network: &str, name: &str, raw_address: &str) {
        self.declare(network);
        match normalize_address(raw_address) {
            Some(address) => {
                if let Some(map) = self.mapping.get_mut(network) {
                    map.insert(name.to_string(), address);
                }
            }
            None => debug!(network, name, raw_address, "dropping address that does not normalize"),
        }
    }
}

/// Build the mapping with the default group order (contracts, then dependencies).
pub fn build_mapping(text: &str) -> Result<FlowMapping, SwitchError> {
    build_mapping_in_order(text, &DEFAULT_GROUP_ORDER)
}

/// Build the mapping, scanning item groups in `order`.
///
/// Errors are reported against a placeholder path; `read_mapping` fills in the real one.
pub fn build_mapping_in_order(text: &str, order: &[ItemGroup]) -> Result<FlowMapping, SwitchError> {
    let root: Value = serde_json::from_str(text).map_err(|e| SwitchError::ConfigMalformed {
        msg: e.to_string(),
        path: "flow.json".into(),
        line: e.line(),
        column: e.column(),
    })?;
    Ok(mapping_from_value(&root, order))
}

/// Read and build the mapping from a configuration file on disk.
pub fn read_mapping(path: &Path) -> Result<(FlowMapping, String), SwitchError> {
    let text = std::fs::read_to_string(path).map_err(|source| SwitchError::ConfigUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    match build_mapping(&text) {
        Ok(mapping) => Ok((mapping, text)),
        Err(SwitchError::ConfigMalformed { msg, line, column, .. }) => Err(SwitchError::ConfigMalformed {
            msg,
            path: path.to_path_buf(),
            line,
            column,
        }),
        Err(other) => Err(other),
    }
}

/// Build from an already-parsed tree.
pub fn mapping_from_value(root: &Value, order: &[ItemGroup]) -> FlowMapping {
    let mut result = FlowMapping::default();

    if let Some(networks) = object_field(root, "networks") {
        for network in networks.keys() {
            result.declare(network);
        }
    }

    for group in order {
        let Some(items) = object_field(root, group.key()) else {
            continue;
        };
        for (name, item) in items {
            resolve_item(&mut result, name, item);
        }
    }

    debug!(
        networks = result.networks.len(),
        identifiers = result.mapping.values().map(BTreeMap::len).sum::<usize>(),
        "built network mapping"
    );
    result
}

fn resolve_item(result: &mut FlowMapping, name: &str, item: &Value) {
    let aliases = object_field(item, "aliases").filter(|aliases| !aliases.is_empty());

    if let Some(aliases) = aliases {
        for (network, raw) in aliases {
            match raw.as_str() {
                Some(raw) => result.register(network, name, raw),
                None => {
                    result.declare(network);
                    debug!(network, name, "dropping non-string alias address");
                }
            }
        }
        return;
    }

    let Some(source) = item.get("source").and_then(Value::as_str) else {
        return;
    };
    match SOURCE_PATTERN.captures(source) {
        Some(caps) => result.register(&caps[1], name, &caps[2]),
        None => debug!(name, source, "ignoring source string without a network address"),
    }
}

fn object_field<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    value.get(key).and_then(Value::as_object)
}

/// The configuration written by `flowswitch init`.
pub fn default_config_text() -> String {
    let sample = serde_json::json!({
        "contracts": {},
        "networks": {},
        "dependencies": {}
    });
    // A literal json! value always serializes.
    let mut text = serde_json::to_string_pretty(&sample).unwrap_or_default();
    text.push('\n');
    text
}
