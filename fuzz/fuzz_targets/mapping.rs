#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary configuration text should never panic the builder.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(result) = flowswitch::build_mapping(s) {
            for network in &result.networks {
                assert!(result.mapping.contains_key(network));
            }
        }
    }
});
