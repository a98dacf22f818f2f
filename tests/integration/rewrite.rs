mod common;

use std::path::PathBuf;

use flowswitch::config::NetworkMap;
use flowswitch::rewrite::{FileChange, SourceFile};
use flowswitch::{Workspace, rewrite_sources, rewrite_text};

fn net(pairs: &[(&str, &str)]) -> NetworkMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn keeps_everything_but_the_address() {
    let result = rewrite_text(&net(&[("FooToken", "f1")]), "import FooToken from 0x01; // keep me");
    assert_eq!(result.text, "import FooToken from 0xf1; // keep me");
    assert_eq!(result.replaced(), 1);
    assert!(result.missing.is_empty());
}

#[test]
fn mixed_resolved_and_unresolved() {
    let text = "import A from 0x01\r\nimport   B   from   0xBEEF // tail\r\nimport C from 0x03\r\n";
    let result = rewrite_text(&net(&[("A", "aa"), ("B", "bb")]), text);
    assert_eq!(result.text, "import A from 0xaa\r\nimport   B   from   0xbb // tail\r\nimport C from 0x03\r\n");
    assert_eq!(result.missing.iter().collect::<Vec<_>>(), vec!["C"]);
}

#[test]
fn only_import_forms_with_hex_addresses_change() {
    let text = "import \"FooToken\"\nimport FooToken from \"./FooToken.cdc\"\n// import FooToken from 0x01\n";
    let result = rewrite_text(&net(&[("FooToken", "f1")]), text);
    // The commented line is still an import reference by surface form.
    assert_eq!(result.text, "import \"FooToken\"\nimport FooToken from \"./FooToken.cdc\"\n// import FooToken from 0xf1\n");
    assert_eq!(result.replaced(), 1);
}

#[test]
fn summary_accounts_for_every_file() {
    let files = vec![
        SourceFile::new("a.cdc", "import A from 0x01\nimport A from 0x02\n"),
        SourceFile::new("b.cdc", "import B from 0x01\n"),
        SourceFile::new("c.cdc", "access(all) contract C {}\n"),
        SourceFile::new("d.cdc", "import Nope from 0x01\n"),
    ];
    let rewrite = rewrite_sources(&net(&[("A", "0a"), ("B", "0b")]), files);

    assert_eq!(rewrite.summary.files_changed, 2);
    assert_eq!(rewrite.summary.replacements, 3);
    assert_eq!(rewrite.summary.missing, vec!["Nope"]);
    assert_eq!(
        rewrite.summary.files,
        vec![
            FileChange { path: PathBuf::from("a.cdc"), replaced: 2 },
            FileChange { path: PathBuf::from("b.cdc"), replaced: 1 },
        ]
    );
    let planned: Vec<_> = rewrite.plan.edits().iter().map(|e| e.path.clone()).collect();
    assert_eq!(planned, vec![PathBuf::from("a.cdc"), PathBuf::from("b.cdc")]);
    assert_eq!(rewrite.plan.edits()[0].new_text, "import A from 0x0a\nimport A from 0x0a\n");
}

#[test]
fn unresolved_set_is_stable_across_runs() {
    let map = net(&[("A", "0a")]);
    let files = || vec![SourceFile::new("x.cdc", "import A from 0x01\nimport Q from 0x02\nimport R from 0x03")];
    let first = rewrite_sources(&map, files());
    let second = rewrite_sources(&map, first.plan.edits().iter().map(|e| SourceFile::new(&e.path, &e.new_text)));
    assert_eq!(first.summary.missing, second.summary.missing);
    assert!(second.plan.is_empty());
}

#[test]
fn workspace_plan_uses_discovered_files() {
    let dir = common::workspace(&[
        ("flow.json", common::FLOW_JSON),
        ("cadence/scripts/main.cdc", common::MAIN_CDC),
        ("cadence/contracts/Plain.cadence", "import FooToken from 0xf8d6e0586b0a20c7\n"),
        ("node_modules/pkg/Skip.cdc", "import FooToken from 0x01\n"),
        ("README.md", "import FooToken from 0x01\n"),
    ]);
    let workspace = Workspace::open(dir.path()).unwrap();
    let planned = workspace.plan("testnet").unwrap();
    let summary = &planned.rewrite.summary;

    assert_eq!(summary.files_changed, 2);
    assert_eq!(summary.replacements, 3);
    assert_eq!(summary.missing, vec!["Unknown"]);
    let edit = planned
        .rewrite
        .plan
        .edits()
        .iter()
        .find(|e| e.path.ends_with("main.cdc"))
        .unwrap();
    assert!(edit.new_text.starts_with(
        "import FungibleToken from 0x9a0766d93b6608b7\nimport FooToken from 0x9a0766d93b6608b7\nimport Unknown from 0x01\n"
    ));
    // Planning never writes.
    assert_eq!(common::read(dir.path(), "cadence/scripts/main.cdc"), common::MAIN_CDC);
}

#[test]
fn unknown_network_is_rejected_before_scanning() {
    let dir = common::workspace(&[("flow.json", common::FLOW_JSON)]);
    let workspace = Workspace::open(dir.path()).unwrap();
    let err = workspace.plan("previewnet").unwrap_err();
    assert_eq!(err.to_string(), "unknown network 'previewnet'; available: emulator, mainnet, testnet");
}
