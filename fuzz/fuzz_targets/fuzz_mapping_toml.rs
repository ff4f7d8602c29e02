#![no_main]

use std::path::Path;

use docproxy::infrastructure::MappingFile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Parent chain resolution must reject cycles instead of looping
        let path = Path::new("mapping.toml");
        if let Ok(mapping) = MappingFile::parse(content, path) {
            let _ = mapping.into_metadata(path);
        }
    }
});
