//! The wire container carrying one wrapped file key.
//!
//! A stanza is the self-describing unit the outer encryption tool stores per
//! recipient: a type tag, a list of textual arguments, and an opaque binary
//! body. Stanzas are transient: built fresh by every wrap call, consumed by
//! every unwrap call, and never persisted by this crate.

/// Stanza type tag produced and consumed by the hybrid KEM engine.
pub const STANZA_TAG: &str = "qage";

/// Stanza argument naming the hybrid wire format, version 1.
pub const STANZA_VERSION_1: &str = "h1";

/// One key-wrapping stanza.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    /// The stanza type tag.
    pub tag: String,
    /// Type-specific arguments.
    pub args: Vec<String>,
    /// Opaque binary body.
    pub body: Vec<u8>,
}

impl Stanza {
    /// Builds a hybrid v1 stanza around the given body.
    #[must_use]
    pub fn hybrid_v1(body: Vec<u8>) -> Self {
        Self {
            tag: STANZA_TAG.to_string(),
            args: vec![STANZA_VERSION_1.to_string()],
            body,
        }
    }

    /// Whether this stanza claims the hybrid v1 wire format.
    ///
    /// The argument list must be exactly `["h1"]`; extra or missing
    /// arguments mean a different (possibly future) format.
    #[must_use]
    pub fn is_hybrid_v1(&self) -> bool {
        self.tag == STANZA_TAG && self.args.len() == 1 && self.args[0] == STANZA_VERSION_1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hybrid_v1_constructor() {
        let stanza = Stanza::hybrid_v1(vec![1, 2, 3]);
        assert_eq!(stanza.tag, "qage");
        assert_eq!(stanza.args, vec!["h1".to_string()]);
        assert_eq!(stanza.body, vec![1, 2, 3]);
        assert!(stanza.is_hybrid_v1());
    }

    #[test]
    fn test_is_hybrid_v1_rejects_other_shapes() {
        let mut stanza = Stanza::hybrid_v1(Vec::new());
        stanza.tag = "X25519".to_string();
        assert!(!stanza.is_hybrid_v1());

        let mut stanza = Stanza::hybrid_v1(Vec::new());
        stanza.args.push("extra".to_string());
        assert!(!stanza.is_hybrid_v1());

        let mut stanza = Stanza::hybrid_v1(Vec::new());
        stanza.args.clear();
        assert!(!stanza.is_hybrid_v1());

        let mut stanza = Stanza::hybrid_v1(Vec::new());
        stanza.args[0] = "h2".to_string();
        assert!(!stanza.is_hybrid_v1());
    }
}
