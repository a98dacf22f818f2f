//! Snapshot tests for error message formatting.

mod common;

use insta::assert_snapshot;

use flowswitch::Workspace;
use flowswitch::build_mapping;

fn plan_error(files: &[(&str, &str)], network: &str) -> String {
    let dir = common::workspace(files);
    let workspace = Workspace::open(dir.path()).unwrap();
    let err = workspace.plan(network).unwrap_err().to_string();
    err.replace(&dir.path().display().to_string(), "<ws>")
}

#[test]
fn malformed_json_error() {
    let err = build_mapping("{\"contracts\": {\"A\": }}").unwrap_err();
    assert_snapshot!(err.to_string(), @"flow.json is not valid JSON: expected value at line 1 column 21");
}

#[test]
fn unknown_network_error() {
    let err = plan_error(&[("flow.json", r#"{"networks": {"mainnet": {}, "testnet": {}}}"#)], "emulator");
    assert_snapshot!(err, @"unknown network 'emulator'; available: mainnet, testnet");
}

#[test]
fn no_networks_error() {
    let err = plan_error(&[("flow.json", "{}")], "testnet");
    assert_snapshot!(err, @"no networks found in <ws>/flow.json");
}

#[test]
fn invalid_settings_error() {
    let dir = common::workspace(&[("flowswitch.toml", "find_globs = []\n")]);
    let err = Workspace::open(dir.path()).err().unwrap();
    assert_snapshot!(err.to_string(), @"Settings error: flowswitch.toml: 'find_globs' must list at least one pattern");
}
