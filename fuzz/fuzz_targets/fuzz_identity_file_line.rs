#![no_main]

use libfuzzer_sys::fuzz_target;
use qage::Identity;

fuzz_target!(|data: &str| {
    // Parsing arbitrary file lines must never panic.
    let _ = Identity::from_file_line(data);
});
