use crate::error::{CiError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Ordering compares major, minor and patch numerically. For the same
/// numeric triple a release sorts above any pre-release, and two
/// pre-release labels compare as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl Version {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// Create a new pre-release version
    pub fn with_pre(major: u64, minor: u64, patch: u64, pre: impl Into<String>) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Some(pre.into()),
        }
    }

    /// The `0.0.0` version used when no tag history exists
    pub fn zero() -> Self {
        Version::new(0, 0, 0)
    }

    /// Parse version from a tag string (e.g., "v1.2.3-beta" -> Version(1,2,3,"beta"))
    ///
    /// A single leading `v` or `V` is accepted. Build metadata is accepted
    /// and discarded.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let clean_tag = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let parsed = semver::Version::parse(clean_tag).map_err(|e| {
            CiError::version(format!("Invalid version format: '{}' - {}", tag, e))
        })?;

        let pre = if parsed.pre.is_empty() {
            None
        } else {
            Some(parsed.pre.as_str().to_string())
        };

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// Next patch release: patch + 1 with any pre-release label dropped
    pub fn bump_patch(&self) -> Result<Self> {
        let patch = self.patch.checked_add(1).ok_or_else(|| {
            CiError::version(format!("cannot bump patch of {}: patch number overflows", self))
        })?;
        Ok(Version::new(self.major, self.minor, patch))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = CiError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
        assert_eq!(v.pre, None);
    }

    #[test]
    fn test_version_parse_without_v() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_uppercase_v() {
        let v = Version::parse("V1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_prerelease() {
        let v = Version::parse("v1.3.0-beta").unwrap();
        assert_eq!(v, Version::with_pre(1, 3, 0, "beta"));
        assert!(v.is_prerelease());
    }

    #[test]
    fn test_version_parse_drops_build_metadata() {
        let v = Version::parse("1.0.0+20240101").unwrap();
        assert_eq!(v, Version::new(1, 0, 0));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("v1.2.3.4").is_err());
        assert!(Version::parse("release-1.2.3").is_err());
        assert!(Version::parse("vv1.2.3").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_release_greater_than_prerelease() {
        assert!(Version::new(1, 3, 0) > Version::with_pre(1, 3, 0, "beta"));
        assert!(Version::with_pre(1, 3, 0, "beta") > Version::new(1, 2, 9));
    }

    #[test]
    fn test_prerelease_labels_compare_lexicographically() {
        let alpha = Version::with_pre(1, 0, 0, "alpha");
        let beta = Version::with_pre(1, 0, 0, "beta");
        let rc10 = Version::with_pre(1, 0, 0, "rc.10");
        let rc2 = Version::with_pre(1, 0, 0, "rc.2");
        assert!(alpha < beta);
        assert!(beta < rc10);
        // plain string comparison, not numeric identifiers
        assert!(rc10 < rc2);
    }

    #[test]
    fn test_ordering_is_total_and_transitive() {
        let mut versions = vec![
            Version::new(2, 0, 0),
            Version::with_pre(1, 0, 0, "rc"),
            Version::new(1, 10, 0),
            Version::new(1, 2, 3),
            Version::new(1, 0, 0),
            Version::with_pre(1, 0, 0, "alpha"),
        ];
        versions.sort();

        for pair in versions.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[1] > pair[0]);
        }
        for a in &versions {
            for b in &versions {
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
            }
        }
    }

    #[test]
    fn test_bump_patch_drops_prerelease() {
        assert_eq!(Version::new(1, 2, 3).bump_patch().unwrap(), Version::new(1, 2, 4));
        assert_eq!(
            Version::with_pre(1, 3, 0, "beta").bump_patch().unwrap(),
            Version::new(1, 3, 1)
        );
    }

    #[test]
    fn test_bump_patch_overflow_is_error() {
        let v = Version::parse("v1.0.18446744073709551615").unwrap();
        assert_eq!(v.patch, u64::MAX);
        assert!(matches!(v.bump_patch(), Err(CiError::Version(_))));
    }

    #[test]
    fn test_version_display_round_trip() {
        for raw in ["0.0.0", "1.2.3", "10.20.30-rc.1", "1.0.0-beta"] {
            let v = Version::parse(raw).unwrap();
            assert_eq!(v.to_string(), raw);
            assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
        }
    }
}
