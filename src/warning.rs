use std::fmt;

/// Non-fatal findings raised while reading tag history.
/// These are reported to the operator but never abort a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Two raw tags normalize to the same version; the first one wins
    DuplicateVersion {
        version: String,
        kept: String,
        ignored: String,
    },
    /// An allow-list entry is not a semantic version
    UnparsableKnownTag { tag: String, reason: String },
    /// HEAD already carries one or more version tags
    HeadAlreadyTagged { tags: Vec<String> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DuplicateVersion {
                version,
                kept,
                ignored,
            } => write!(
                f,
                "Tags '{}' and '{}' both resolve to version {}; using '{}'",
                kept, ignored, version, kept
            ),
            Warning::UnparsableKnownTag { tag, reason } => {
                write!(f, "Ignoring known tag '{}': {}", tag, reason)
            }
            Warning::HeadAlreadyTagged { tags } => {
                write!(f, "head already tagged with [{}]", tags.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_version_display() {
        let warning = Warning::DuplicateVersion {
            version: "1.0.0".to_string(),
            kept: "v1.0.0".to_string(),
            ignored: "1.0.0".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("v1.0.0"));
        assert!(msg.contains("using 'v1.0.0'"));
    }

    #[test]
    fn test_head_already_tagged_display() {
        let warning = Warning::HeadAlreadyTagged {
            tags: vec!["v1.0.0".to_string(), "v1.0.0-rc".to_string()],
        };
        assert_eq!(
            warning.to_string(),
            "head already tagged with [v1.0.0, v1.0.0-rc]"
        );
    }
}
