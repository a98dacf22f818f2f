// Property tests for the mapping normalizer and the rewrite engine:
// 1. Normalization is idempotent and yields only lowercase hex
// 2. An empty network map never changes a file and reports every referenced name
// 3. Substitution changes only the address digits of resolved references
// 4. Rewriting already rewritten text changes nothing and reports the same unresolved names

use proptest::prelude::*;

use flowswitch::address::{is_normalized, normalize_address};
use flowswitch::config::NetworkMap;
use flowswitch::rewrite::SourceFile;
use flowswitch::scan::scan_imports;
use flowswitch::{rewrite_sources, rewrite_text};

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9_]{0,8}"
}

fn arb_hex() -> impl Strategy<Value = String> {
    "[0-9a-fA-F]{1,16}"
}

// Filler text that cannot itself form or extend an import reference.
fn arb_filler() -> impl Strategy<Value = String> {
    "[ ;(){}/\n.=\"]{0,12}"
}

fn arb_source() -> impl Strategy<Value = (String, Vec<String>)> {
    prop::collection::vec((arb_filler(), arb_name(), arb_hex()), 0..8).prop_map(|parts| {
        let mut text = String::new();
        let mut names = Vec::new();
        for (filler, name, hex) in parts {
            text.push_str(&filler);
            text.push_str(&format!("\nimport {name} from 0x{hex}\n"));
            names.push(name);
        }
        (text, names)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn normalization_is_idempotent(raw in "\\PC{0,24}") {
        if let Some(once) = normalize_address(&raw) {
            prop_assert!(is_normalized(&once));
            prop_assert_eq!(normalize_address(&once), Some(once.clone()));
        }
    }

    #[test]
    fn separators_only_never_normalize(raw in "[-_:. g-zG-Z]{0,12}") {
        prop_assert_eq!(normalize_address(&raw), None);
    }

    #[test]
    fn empty_map_changes_nothing((text, names) in arb_source()) {
        let rewrite = rewrite_sources(&NetworkMap::new(), vec![SourceFile::new("f.cdc", text.clone())]);
        prop_assert!(rewrite.plan.is_empty());
        prop_assert_eq!(rewrite.summary.files_changed, 0);

        let mut expected = names.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(rewrite.summary.missing, expected);
    }

    #[test]
    fn only_address_digits_change((text, names) in arb_source(), address in "[0-9a-f]{1,16}") {
        // Resolve every other referenced name.
        let map: NetworkMap = names.iter().step_by(2).map(|n| (n.clone(), address.clone())).collect();
        let result = rewrite_text(&map, &text);

        let before: Vec<_> = scan_imports(&text).map(|r| (r.name.to_string(), r.address.clone())).collect();
        let after: Vec<_> = scan_imports(&result.text).map(|r| (r.name.to_string(), r.address_text(&result.text).to_string())).collect();
        prop_assert_eq!(before.len(), after.len());

        for ((name, old_range), (new_name, new_address)) in before.iter().zip(&after) {
            prop_assert_eq!(name, new_name);
            match map.get(name) {
                Some(target) => prop_assert_eq!(new_address, target),
                None => prop_assert_eq!(new_address.as_str(), &text[old_range.clone()]),
            }
        }

        // Removing every address leaves identical text.
        let strip = |s: &str| {
            let mut out = String::new();
            let mut last = 0;
            for r in scan_imports(s) {
                out.push_str(&s[last..r.address.start]);
                last = r.address.end;
            }
            out.push_str(&s[last..]);
            out
        };
        prop_assert_eq!(strip(&text), strip(&result.text));
    }

    #[test]
    fn second_pass_is_stable((text, names) in arb_source(), address in "[0-9a-f]{1,16}") {
        let map: NetworkMap = names.iter().step_by(2).map(|n| (n.clone(), address.clone())).collect();
        let first = rewrite_text(&map, &text);
        let second = rewrite_text(&map, &first.text);

        prop_assert_eq!(&second.text, &first.text);
        prop_assert_eq!(&second.missing, &first.missing);

        let rewrite = rewrite_sources(&map, vec![SourceFile::new("f.cdc", first.text.clone())]);
        prop_assert!(rewrite.plan.is_empty());
    }
}
