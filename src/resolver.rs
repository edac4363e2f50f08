//! Version resolution from tag history
//!
//! Computes the current released version and the next version to release
//! from an unordered set of raw tag strings. Resolution is a pure function
//! of its inputs; reading tags and formatting them as tag names is left to
//! callers.

use std::collections::{BTreeMap, HashSet};

use crate::domain::Version;
use crate::error::{CiError, Result};
use crate::warning::Warning;

/// Flags that steer version resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveOptions {
    /// Operator-supplied floor for version computation
    pub base_version: Option<Version>,
    /// Consider `-beta`, `-rc` etc. tags when picking the current version
    pub include_prerelease: bool,
    /// Treat the current tag as the release (no bump)
    pub use_current_tag: bool,
}

/// Result of a resolution: the current and next versions
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVersion {
    pub current: Version,
    pub next: Version,
    /// Raw tag that produced `current`, if it came from tag history
    pub current_tag: Option<String>,
    pub warnings: Vec<Warning>,
}

/// Parses a base version string, mapping failures to `InvalidBaseVersion`
pub fn parse_base_version(raw: &str) -> Result<Version> {
    Version::parse(raw).map_err(|e| CiError::InvalidBaseVersion(format!("'{}': {}", raw, e)))
}

/// Resolves current and next versions from tag history
pub struct VersionResolver {
    options: ResolveOptions,
}

impl VersionResolver {
    pub fn new(options: ResolveOptions) -> Self {
        VersionResolver { options }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Computes `(current, next)` from the given tags.
    ///
    /// Tags that are not semantic versions are skipped. When two raw tags
    /// normalize to the same version the first one encountered is kept and
    /// a [`Warning::DuplicateVersion`] is recorded. Fails only when the
    /// next version cannot be represented.
    pub fn resolve<S: AsRef<str>>(&self, tags: &[S]) -> Result<ResolvedVersion> {
        let (versions, warnings) = collect_versions(tags, self.options.include_prerelease);

        let (current, current_tag) = match versions.last_key_value() {
            Some((version, raw)) => (version.clone(), Some(raw.clone())),
            None => (
                self.options
                    .base_version
                    .clone()
                    .unwrap_or_else(Version::zero),
                None,
            ),
        };

        let next = if self.options.use_current_tag {
            current.clone()
        } else {
            match &self.options.base_version {
                Some(base) if *base > current => base.clone(),
                _ => current.bump_patch()?,
            }
        };

        tracing::debug!(
            current = %current,
            next = %next,
            candidates = versions.len(),
            "resolved versions"
        );

        Ok(ResolvedVersion {
            current,
            next,
            current_tag,
            warnings,
        })
    }
}

/// Outcome of reconciling observed tags against an allow-list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Observed tags absent from the allow-list, highest version first
    pub extra: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// Returns observed tags whose version is not in the allow-list.
///
/// Comparison is by normalized version, so `1.0.0` and `v1.0.0` match.
/// Observed tags that do not parse are not reported.
pub fn extra_tags<A, O>(allow_list: &[A], observed: &[O]) -> Reconciliation
where
    A: AsRef<str>,
    O: AsRef<str>,
{
    let mut warnings = Vec::new();
    let mut known = HashSet::new();

    for tag in allow_list {
        let tag = tag.as_ref();
        match Version::parse(tag) {
            Ok(version) => {
                known.insert(version);
            }
            Err(e) => warnings.push(Warning::UnparsableKnownTag {
                tag: tag.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    let mut extra: Vec<(Version, String)> = observed
        .iter()
        .filter_map(|raw| {
            let raw = raw.as_ref();
            Version::parse(raw).ok().map(|v| (v, raw.to_string()))
        })
        .filter(|(version, _)| !known.contains(version))
        .collect();

    extra.sort_by(|(va, ra), (vb, rb)| vb.cmp(va).then_with(|| ra.cmp(rb)));

    Reconciliation {
        extra: extra.into_iter().map(|(_, raw)| raw).collect(),
        warnings,
    }
}

fn collect_versions<S: AsRef<str>>(
    tags: &[S],
    include_prerelease: bool,
) -> (BTreeMap<Version, String>, Vec<Warning>) {
    let mut versions: BTreeMap<Version, String> = BTreeMap::new();
    let mut warnings = Vec::new();

    for raw in tags {
        let raw = raw.as_ref();
        let version = match Version::parse(raw) {
            Ok(v) => v,
            Err(_) => {
                tracing::debug!(tag = raw, "skipping non-version tag");
                continue;
            }
        };

        if version.is_prerelease() && !include_prerelease {
            continue;
        }

        match versions.get(&version) {
            Some(kept) if kept != raw => warnings.push(Warning::DuplicateVersion {
                version: version.to_string(),
                kept: kept.clone(),
                ignored: raw.to_string(),
            }),
            Some(_) => {}
            None => {
                versions.insert(version, raw.to_string());
            }
        }
    }

    (versions, warnings)
}
