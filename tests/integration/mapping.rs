mod common;

use flowswitch::build_mapping;
use flowswitch::config::{DEFAULT_GROUP_ORDER, ItemGroup, build_mapping_in_order};
use flowswitch::diagnostics::SwitchError;
use flowswitch::Workspace;

fn names(set: &std::collections::BTreeSet<String>) -> Vec<&str> {
    set.iter().map(String::as_str).collect()
}

#[test]
fn realistic_flow_json() {
    let result = build_mapping(common::FLOW_JSON).unwrap();
    assert_eq!(names(&result.networks), vec!["emulator", "mainnet", "testnet"]);

    let emulator = &result.mapping["emulator"];
    assert_eq!(emulator["FooToken"], "f8d6e0586b0a20c7");
    assert_eq!(emulator["FungibleToken"], "ee82856bf20e2aa6");

    let testnet = &result.mapping["testnet"];
    assert_eq!(testnet["FooToken"], "9a0766d93b6608b7");

    // Burner has no aliases, so its source string supplies the mainnet address.
    let mainnet = &result.mapping["mainnet"];
    assert_eq!(mainnet["Burner"], "f233dcee88fe0abe");
    assert_eq!(mainnet["FungibleToken"], "f233dcee88fe0abe");
    assert!(!mainnet.contains_key("FooToken"));
}

#[test]
fn every_referenced_network_has_an_entry() {
    let text = r#"{
        "contracts": {
            "A": {"aliases": {"previewnet": "zz"}},
            "B": {"source": "crescendo://0b.B.cdc"}
        },
        "dependencies": {"C": {"aliases": {"testnet": "0x0c"}}}
    }"#;
    let result = build_mapping(text).unwrap();
    for network in ["previewnet", "crescendo", "testnet"] {
        assert!(result.mapping.contains_key(network), "{network} missing");
        assert!(result.networks.contains(network));
    }
    assert!(result.mapping["previewnet"].is_empty());
}

#[test]
fn absent_top_level_keys_are_empty() {
    let result = build_mapping("{}").unwrap();
    assert!(result.networks.is_empty());
    assert!(result.mapping.is_empty());
}

#[test]
fn group_order_is_explicit() {
    let text = r#"{
        "contracts": {"Shared": {"aliases": {"testnet": "0xc0"}}},
        "dependencies": {"Shared": {"aliases": {"testnet": "0xd0"}}}
    }"#;
    assert_eq!(DEFAULT_GROUP_ORDER, [ItemGroup::Contracts, ItemGroup::Dependencies]);
    assert_eq!(build_mapping(text).unwrap().mapping["testnet"]["Shared"], "d0");

    let only_contracts = build_mapping_in_order(text, &[ItemGroup::Contracts]).unwrap();
    assert_eq!(only_contracts.mapping["testnet"]["Shared"], "c0");
}

#[test]
fn missing_configuration_is_unavailable() {
    let dir = common::workspace(&[]);
    let workspace = Workspace::open(dir.path()).unwrap();
    let err = workspace.load_mapping().unwrap_err();
    assert!(matches!(err, SwitchError::ConfigUnavailable { .. }));
    assert!(err.is_config_missing());
}

#[test]
fn malformed_configuration_carries_real_path() {
    let dir = common::workspace(&[("flow.json", "{\"contracts\": ")]);
    let workspace = Workspace::open(dir.path()).unwrap();
    match workspace.load_mapping().unwrap_err() {
        SwitchError::ConfigMalformed { path, line, .. } => {
            assert_eq!(path, dir.path().join("flow.json"));
            assert_eq!(line, 1);
        }
        other => panic!("expected ConfigMalformed, got {other:?}"),
    }
}

#[test]
fn no_networks_is_reported_by_load_networks() {
    let dir = common::workspace(&[("flow.json", r#"{"contracts": {"A": {"source": "./A.cdc"}}}"#)]);
    let workspace = Workspace::open(dir.path()).unwrap();
    assert!(workspace.load_mapping().unwrap().networks.is_empty());
    assert!(matches!(workspace.load_networks().unwrap_err(), SwitchError::NoNetworks { .. }));
}

#[test]
fn settings_choose_the_configuration_file() {
    let dir = common::workspace(&[
        ("flowswitch.toml", "flow_file = \"config/networks.json\"\n"),
        ("config/networks.json", r#"{"networks": {"testnet": {}}}"#),
    ]);
    let workspace = Workspace::open(dir.path()).unwrap();
    assert_eq!(names(&workspace.load_networks().unwrap().networks), vec!["testnet"]);
}

#[test]
fn init_writes_default_once() {
    let dir = common::workspace(&[]);
    let workspace = Workspace::open(dir.path()).unwrap();
    let path = workspace.init_config().unwrap();
    assert!(path.is_file());
    assert!(build_mapping(&std::fs::read_to_string(&path).unwrap()).unwrap().networks.is_empty());
    assert!(matches!(workspace.init_config().unwrap_err(), SwitchError::ConfigExists { .. }));
}
