#![no_main]

use libfuzzer_sys::fuzz_target;
use qage::Recipient;

fuzz_target!(|data: &str| {
    // Parsing arbitrary input must never panic.
    let _ = data.parse::<Recipient>();
});
