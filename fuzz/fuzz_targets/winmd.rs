#![no_main]

use libfuzzer_sys::fuzz_target;
use win32json::metadata::{winmd::WinMd, MetadataOracle};

fuzz_target!(|data: &[u8]| {
    if let Ok(winmd) = WinMd::from_mem(data.to_vec()) {
        for token in winmd.type_defs() {
            let _ = winmd.type_def(token);
        }
    }
});
