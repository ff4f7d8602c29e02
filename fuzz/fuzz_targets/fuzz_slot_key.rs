#![no_main]

use docproxy::SlotKey;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Anything that parses must display back to something that parses
        // to the same key
        if let Ok(key) = text.parse::<SlotKey>() {
            assert_eq!(key.to_string().parse::<SlotKey>().ok(), Some(key));
        }
    }
});
