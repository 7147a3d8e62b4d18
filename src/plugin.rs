//! The age plugin stdio protocol adapter.
//!
//! This module implements the line-oriented, single-round-trip protocol an
//! age client speaks to `age-plugin-qage`: one command line on stdin, a
//! fixed number of follow-up lines, one response on stdout, then exit. The
//! process is stateless and handles exactly one command.
//!
//! Two failure classes are kept strictly apart. Malformed protocol input
//! (bad command, missing line, undecodable base64, unparsable key) is
//! always fatal: a diagnostic on the error stream and a non-zero exit. A
//! well-formed stanza that simply is not for the supplied identity produces
//! no output and exits 0, because the driving client iterates identities
//! and plugins as normal operation.

use std::io::{self, BufRead, Write};

use base64::prelude::{Engine as _, BASE64_STANDARD};
use thiserror::Error;

use crate::core::error::QageError;
use crate::core::types::{Identity, Recipient, Stanza, STANZA_TAG};

/// Name used in diagnostics, matching the binary name.
pub const PLUGIN_NAME: &str = "age-plugin-qage";

/// Fatal protocol failures. Every variant terminates the process with a
/// non-zero status; "not applicable" paths are not errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Reading a line from the input stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The input stream ended before a required line.
    #[error("missing {0}")]
    MissingLine(&'static str),

    /// The first line carried no command.
    #[error("empty command")]
    EmptyCommand,

    /// The command line lacked its key argument.
    #[error("{0} missing argument")]
    MissingArgument(&'static str),

    /// The first line named a command this plugin does not implement.
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),

    /// The recipient argument failed to parse.
    #[error("invalid recipient: {0}")]
    InvalidRecipient(#[source] QageError),

    /// The identity argument failed to parse.
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[source] QageError),

    /// A base64 field failed to decode.
    #[error("invalid {field}: {source}")]
    InvalidBase64 {
        /// Which protocol field was malformed.
        field: &'static str,
        /// The underlying decode error.
        source: base64::DecodeError,
    },

    /// The stanza header line did not start with `-> `.
    #[error("invalid stanza format")]
    InvalidStanza,

    /// Wrapping the file key failed.
    #[error("wrap failed: {0}")]
    WrapFailed(#[source] QageError),
}

/// Runs one protocol exchange over the given streams and returns the
/// process exit code.
///
/// Fatal errors are reported as a single `age-plugin-qage: ...` line on
/// `diagnostics`.
pub fn run(input: impl BufRead, output: impl Write, mut diagnostics: impl Write) -> i32 {
    match serve(input, output) {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(diagnostics, "{PLUGIN_NAME}: {err}");
            1
        }
    }
}

fn serve(mut input: impl BufRead, mut output: impl Write) -> Result<(), ProtocolError> {
    let command_line = read_line(&mut input)?.ok_or(ProtocolError::MissingLine("command"))?;
    let mut words = command_line.split_whitespace();
    let command = words.next().ok_or(ProtocolError::EmptyCommand)?;

    match command {
        "recipient-v1" => {
            let arg = words.next().ok_or(ProtocolError::MissingArgument("recipient"))?;
            handle_recipient(arg, input, output)
        }
        "identity-v1" => {
            let arg = words.next().ok_or(ProtocolError::MissingArgument("identity"))?;
            handle_identity(arg, input, output)
        }
        "--version" => {
            writeln!(output, "{}", env!("CARGO_PKG_VERSION"))?;
            Ok(())
        }
        other => Err(ProtocolError::UnsupportedCommand(other.to_string())),
    }
}

/// Wraps one file key for one recipient. Every failure is fatal; this
/// command runs once per process.
fn handle_recipient(
    recipient_str: &str,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<(), ProtocolError> {
    let recipient: Recipient = recipient_str
        .parse()
        .map_err(ProtocolError::InvalidRecipient)?;

    let file_key_b64 =
        read_line(&mut input)?.ok_or(ProtocolError::MissingLine("file key"))?;
    let file_key = BASE64_STANDARD
        .decode(file_key_b64)
        .map_err(|source| ProtocolError::InvalidBase64 {
            field: "file key",
            source,
        })?;

    let stanzas = recipient.wrap(&file_key).map_err(ProtocolError::WrapFailed)?;
    let [stanza] = stanzas.as_slice() else {
        return Err(ProtocolError::WrapFailed(QageError::Crypto));
    };

    write!(output, "-> {}", stanza.tag)?;
    for arg in &stanza.args {
        write!(output, " {arg}")?;
    }
    writeln!(output)?;
    writeln!(output, "{}", BASE64_STANDARD.encode(&stanza.body))?;
    Ok(())
}

/// Tries to unwrap one stanza with one identity. Malformed input is fatal;
/// a stanza of another type or a failed unwrap is silent success so the
/// client can try its next candidate.
fn handle_identity(
    identity_str: &str,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<(), ProtocolError> {
    let identity: Identity = identity_str
        .parse()
        .map_err(ProtocolError::InvalidIdentity)?;

    let stanza_line =
        read_line(&mut input)?.ok_or(ProtocolError::MissingLine("stanza header"))?;
    let header = stanza_line
        .strip_prefix("-> ")
        .ok_or(ProtocolError::InvalidStanza)?;

    let mut fields = header.split_whitespace();
    match fields.next() {
        Some(tag) if tag == STANZA_TAG => {}
        // Another plugin's stanza type: not applicable, exit clean.
        _ => return Ok(()),
    }
    let args: Vec<String> = fields.map(str::to_string).collect();

    let body_b64 = read_line(&mut input)?.ok_or(ProtocolError::MissingLine("stanza body"))?;
    let body = BASE64_STANDARD
        .decode(body_b64)
        .map_err(|source| ProtocolError::InvalidBase64 {
            field: "stanza body",
            source,
        })?;

    let stanza = Stanza {
        tag: STANZA_TAG.to_string(),
        args,
        body,
    };
    // An unknown version argument means a future format, not ours.
    if !stanza.is_hybrid_v1() {
        return Ok(());
    }

    match identity.unwrap_stanza(&stanza) {
        Ok(file_key) => {
            writeln!(output, "{}", BASE64_STANDARD.encode(file_key))?;
            Ok(())
        }
        // Not our stanza after all, or not our key. The client will try
        // its next identity.
        Err(_) => Ok(()),
    }
}

/// Reads one line, stripping the trailing newline. Returns `None` at end
/// of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>, ProtocolError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_plugin(input: &str) -> (i32, String, String) {
        let mut output = Vec::new();
        let mut diagnostics = Vec::new();
        let code = run(input.as_bytes(), &mut output, &mut diagnostics);
        (
            code,
            String::from_utf8(output).expect("utf8 output"),
            String::from_utf8(diagnostics).expect("utf8 diagnostics"),
        )
    }

    #[test]
    fn test_version_command() {
        let (code, output, diagnostics) = run_plugin("--version\n");
        assert_eq!(code, 0);
        assert_eq!(output.trim(), env!("CARGO_PKG_VERSION"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unsupported_command_is_fatal() {
        let (code, output, diagnostics) = run_plugin("recipient-v2 something\n");
        assert_eq!(code, 1);
        assert!(output.is_empty());
        assert!(diagnostics.contains("unsupported command: recipient-v2"));
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let (code, _, diagnostics) = run_plugin("");
        assert_eq!(code, 1);
        assert!(diagnostics.contains("missing command"));
    }

    #[test]
    fn test_recipient_wrap_then_identity_unwrap() {
        let identity = Identity::generate().expect("generate");
        let recipient_str = identity.recipient().to_string();
        let file_key = [0x24u8; 16];
        let file_key_b64 = BASE64_STANDARD.encode(file_key);

        let (code, output, diagnostics) =
            run_plugin(&format!("recipient-v1 {recipient_str}\n{file_key_b64}\n"));
        assert_eq!(code, 0, "diagnostics: {diagnostics}");
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("-> qage h1"));
        let body_b64 = lines.next().expect("body line");
        assert_eq!(lines.next(), None);

        // Feed the produced stanza back through the identity command.
        let identity_str = identity.to_string();
        let (code, output, diagnostics) = run_plugin(&format!(
            "identity-v1 {identity_str}\n-> qage h1\n{body_b64}\n"
        ));
        assert_eq!(code, 0, "diagnostics: {diagnostics}");
        assert_eq!(output.trim(), file_key_b64);
    }

    #[test]
    fn test_recipient_with_invalid_key_is_fatal() {
        let (code, output, diagnostics) = run_plugin("recipient-v1 qage1notakey\nAAAA\n");
        assert_eq!(code, 1);
        assert!(output.is_empty());
        assert!(diagnostics.contains("invalid recipient"));
    }

    #[test]
    fn test_recipient_with_bad_base64_is_fatal() {
        let identity = Identity::generate().expect("generate");
        let recipient_str = identity.recipient().to_string();
        let (code, _, diagnostics) =
            run_plugin(&format!("recipient-v1 {recipient_str}\nnot-base64!\n"));
        assert_eq!(code, 1);
        assert!(diagnostics.contains("invalid file key"));
    }

    #[test]
    fn test_identity_with_foreign_stanza_type_is_silent() {
        let identity = Identity::generate().expect("generate");
        let identity_str = identity.to_string();
        let (code, output, diagnostics) =
            run_plugin(&format!("identity-v1 {identity_str}\n-> X25519 abc\n"));
        assert_eq!(code, 0);
        assert!(output.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_identity_with_short_body_is_silent() {
        let identity = Identity::generate().expect("generate");
        let identity_str = identity.to_string();
        let body_b64 = BASE64_STANDARD.encode([0u8; 8]);
        let (code, output, _) = run_plugin(&format!(
            "identity-v1 {identity_str}\n-> qage h1\n{body_b64}\n"
        ));
        assert_eq!(code, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_identity_with_bad_header_line_is_fatal() {
        let identity = Identity::generate().expect("generate");
        let identity_str = identity.to_string();
        let (code, _, diagnostics) =
            run_plugin(&format!("identity-v1 {identity_str}\nqage h1\n"));
        assert_eq!(code, 1);
        assert!(diagnostics.contains("invalid stanza format"));
    }

    #[test]
    fn test_identity_with_invalid_key_is_fatal() {
        let (code, _, diagnostics) = run_plugin("identity-v1 qagseck1bogus\n-> qage h1\n");
        assert_eq!(code, 1);
        assert!(diagnostics.contains("invalid identity"));
    }

    #[test]
    fn test_missing_argument_is_fatal() {
        let (code, _, diagnostics) = run_plugin("recipient-v1\n");
        assert_eq!(code, 1);
        assert!(diagnostics.contains("recipient missing argument"));
    }
}
