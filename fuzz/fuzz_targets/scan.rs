#![no_main]
use libfuzzer_sys::fuzz_target;

use flowswitch::config::NetworkMap;

fuzz_target!(|data: &[u8]| {
    // Rewriting with an empty map must reproduce the input exactly.
    if let Ok(s) = std::str::from_utf8(data) {
        let result = flowswitch::rewrite_text(&NetworkMap::new(), s);
        assert_eq!(result.text, s);
    }
});
