use crate::domain::Version;
use crate::error::{CiError, Result};
use std::fmt;
use std::str::FromStr;

/// Language mode, controlling tag-prefix conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Go modules require a leading `v` on version tags
    #[default]
    Go,
    Java,
}

impl Language {
    /// Tag naming pattern used by this language's ecosystem
    pub fn tag_pattern(&self) -> TagPattern {
        match self {
            Language::Go => TagPattern::new("v{version}"),
            Language::Java => TagPattern::new("{version}"),
        }
    }

    /// Format a version as a tag for this language
    pub fn format_tag(&self, version: &Version) -> String {
        self.tag_pattern().format(&version.to_string())
    }
}

impl FromStr for Language {
    type Err = CiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "go" => Ok(Language::Go),
            "java" => Ok(Language::Java),
            other => Err(CiError::config(format!(
                "Invalid language '{}'. Valid values: [go,java]",
                other
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Go => write!(f, "go"),
            Language::Java => write!(f, "java"),
        }
    }
}

/// Tag naming pattern (e.g., "v{version}", "{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        TagPattern {
            pattern: pattern.into(),
        }
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &str) -> String {
        self.pattern.replace("{version}", version)
    }
}
