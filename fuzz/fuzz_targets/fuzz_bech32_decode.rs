#![no_main]

use libfuzzer_sys::fuzz_target;
use qage::core::bech32;

fuzz_target!(|data: &str| {
    // Decoding arbitrary input must never panic.
    if let Ok((hrp, raw)) = bech32::decode(data) {
        // Anything that decodes and re-encodes must reproduce the input.
        if let Ok(reencoded) = bech32::encode(&hrp, &raw) {
            assert_eq!(reencoded, data);
        }
    }
});
