//! Shared state for command handlers
//!
//! Mirrors the global CLI flags in a form handlers can use without clap,
//! plus the loaded configuration.

use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::domain::{Language, Version};
use crate::error::Result;
use crate::git::GitRepository;
use crate::resolver::{self, ResolveOptions, ResolvedVersion, VersionResolver};
use crate::ui;
use crate::warning::Warning;

/// Global flags, decoupled from clap
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalOptions {
    pub language: Language,
    pub dry_run: bool,
    pub use_current_tag: bool,
    pub include_prerelease: bool,
    /// Explicit base version; wins over the file
    pub base_version: Option<String>,
    /// File holding a base version; ignored when absent
    pub base_version_file: Option<PathBuf>,
}

pub struct CommandContext {
    pub options: GlobalOptions,
    pub config: Config,
    resolve_options: ResolveOptions,
}

impl CommandContext {
    /// Builds the context, reading the base version once up front
    pub fn new(options: GlobalOptions, config: Config) -> Result<Self> {
        let base_version = load_base_version(&options)?;
        if let Some(base) = &base_version {
            tracing::debug!(%base, "using base version");
        }

        let resolve_options = ResolveOptions {
            base_version,
            include_prerelease: options.include_prerelease || options.use_current_tag,
            use_current_tag: options.use_current_tag,
        };

        Ok(CommandContext {
            options,
            config,
            resolve_options,
        })
    }

    pub fn resolve_options(&self) -> &ResolveOptions {
        &self.resolve_options
    }

    /// Resolves current and next versions from the repository's tags,
    /// reporting any warnings on stderr
    pub fn resolve<R: GitRepository + ?Sized>(&self, repo: &R) -> Result<ResolvedVersion> {
        let tags = repo.list_tags()?;
        tracing::debug!(count = tags.len(), "read tags");

        let resolved = VersionResolver::new(self.resolve_options.clone()).resolve(&tags)?;
        for warning in &resolved.warnings {
            ui::display_warning(warning);
        }
        Ok(resolved)
    }

    /// Version tags pointing at HEAD
    pub fn version_tags_at_head<R: GitRepository + ?Sized>(&self, repo: &R) -> Result<Vec<String>> {
        Ok(repo
            .tags_at_head()?
            .into_iter()
            .filter(|tag| Version::parse(tag).is_ok())
            .collect())
    }

    /// Warns and returns true when HEAD already carries a version tag
    pub fn warn_if_head_tagged<R: GitRepository + ?Sized>(&self, repo: &R) -> Result<bool> {
        let tags = self.version_tags_at_head(repo)?;
        if tags.is_empty() {
            return Ok(false);
        }
        ui::display_warning(&Warning::HeadAlreadyTagged { tags });
        Ok(true)
    }

    pub fn format_tag(&self, version: &Version) -> String {
        self.options.language.format_tag(version)
    }

    /// Branch name, falling back to CI variables on a detached HEAD
    pub fn branch_name<R: GitRepository + ?Sized>(&self, repo: &R) -> Result<String> {
        if let Some(branch) = repo.current_branch()? {
            return Ok(branch);
        }

        let from_env = ["GITHUB_HEAD_REF", "GITHUB_REF_NAME", "TRAVIS_BRANCH"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty());

        Ok(from_env.unwrap_or_else(|| "HEAD".to_string()))
    }

    /// Runs `action` unless this is a dry run, in which case it is only logged
    pub fn perform<F>(&self, description: &str, action: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        if self.options.dry_run {
            tracing::info!("{}", ui::format_dry_run(description));
            return Ok(());
        }
        tracing::debug!("{}", description);
        action()
    }
}

fn load_base_version(options: &GlobalOptions) -> Result<Option<Version>> {
    if let Some(raw) = &options.base_version {
        return resolver::parse_base_version(raw).map(Some);
    }

    let Some(path) = &options.base_version_file else {
        return Ok(None);
    };
    if !path.is_file() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let raw = contents.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    tracing::debug!(path = %path.display(), "reading base version file");
    resolver::parse_base_version(raw).map(Some)
}
