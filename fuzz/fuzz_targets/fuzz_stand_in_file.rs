#![no_main]

use std::path::Path;
use std::time::SystemTime;

use docproxy::infrastructure::MemoryFs;
use docproxy::proxy::ProxyEmitter;
use docproxy::ClassDescriptor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Reading back arbitrary file content should fail cleanly, never panic
        let fs = MemoryFs::new();
        let path = Path::new("/proxies/__CG__appUser.rs");
        fs.insert(path, content, SystemTime::UNIX_EPOCH);

        let class = ClassDescriptor::builder("app::User").identifier("id").build();
        let _ = ProxyEmitter::new().read_back(&class, path, "Proxies::__CG__::app::User", &fs);
    }
});
