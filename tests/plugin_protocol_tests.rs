//! Protocol-level tests for the plugin adapter, driven over in-memory
//! streams exactly as an age client would drive the process.

// Test code legitimately uses panic patterns for test failure reporting
#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

use base64::prelude::{Engine as _, BASE64_STANDARD};
use qage::plugin;
use qage::Identity;

fn exchange(input: String) -> (i32, String, String) {
    let mut output = Vec::new();
    let mut diagnostics = Vec::new();
    let code = plugin::run(input.as_bytes(), &mut output, &mut diagnostics);
    (
        code,
        String::from_utf8(output).expect("utf8 output"),
        String::from_utf8(diagnostics).expect("utf8 diagnostics"),
    )
}

#[test]
fn test_full_wrap_unwrap_exchange() {
    let identity = Identity::generate().expect("generate");
    let file_key: Vec<u8> = (0u8..32).collect();
    let file_key_b64 = BASE64_STANDARD.encode(&file_key);

    let (code, output, diagnostics) = exchange(format!(
        "recipient-v1 {}\n{file_key_b64}\n",
        identity.recipient()
    ));
    assert_eq!(code, 0, "wrap diagnostics: {diagnostics}");

    let mut lines = output.lines();
    let header = lines.next().expect("stanza header");
    assert_eq!(header, "-> qage h1");
    let body_b64 = lines.next().expect("stanza body");
    let body = BASE64_STANDARD.decode(body_b64).expect("body decodes");
    // ephemeral key + ML-KEM ciphertext + encrypted file key
    assert_eq!(body.len(), 32 + 1088 + 32);

    let (code, output, diagnostics) = exchange(format!(
        "identity-v1 {identity}\n{header}\n{body_b64}\n"
    ));
    assert_eq!(code, 0, "unwrap diagnostics: {diagnostics}");
    assert_eq!(output.trim(), file_key_b64);
}

#[test]
fn test_other_plugins_stanza_is_not_applicable() {
    let identity = Identity::generate().expect("generate");
    let (code, output, diagnostics) = exchange(format!(
        "identity-v1 {identity}\n-> other-type arg1 arg2\n"
    ));
    assert_eq!(code, 0);
    assert!(output.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_wrong_identity_stays_silent() {
    let alice = Identity::generate().expect("generate");
    let mallory = Identity::generate().expect("generate");
    let file_key_b64 = BASE64_STANDARD.encode([0x55u8; 16]);

    let (code, output, _) = exchange(format!(
        "recipient-v1 {}\n{file_key_b64}\n",
        alice.recipient()
    ));
    assert_eq!(code, 0);
    let body_b64 = output.lines().nth(1).expect("stanza body");

    // Mallory's unwrap yields a garbled key; the adapter must still print
    // it rather than fail, because the XOR layer cannot detect the
    // mismatch. Only the outer format's MAC can, and what the adapter must
    // never do is exit non-zero.
    let (code, output, diagnostics) = exchange(format!(
        "identity-v1 {mallory}\n-> qage h1\n{body_b64}\n"
    ));
    assert_eq!(code, 0, "diagnostics: {diagnostics}");
    assert_ne!(output.trim(), file_key_b64);
}

#[test]
fn test_unknown_command_fails_loudly() {
    let (code, output, diagnostics) = exchange("frobnicate\n".to_string());
    assert_ne!(code, 0);
    assert!(output.is_empty());
    assert!(!diagnostics.is_empty());
}

#[test]
fn test_truncated_exchange_fails_loudly() {
    let identity = Identity::generate().expect("generate");
    let (code, _, diagnostics) = exchange(format!("recipient-v1 {}\n", identity.recipient()));
    assert_ne!(code, 0);
    assert!(diagnostics.contains("missing file key"));
}
