//! Build-info source generation and Go linker flags

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, SecondsFormat, Utc};

use crate::cli::context::CommandContext;
use crate::domain::Language;
use crate::error::{CiError, Result};
use crate::git::GitRepository;
use crate::manifest::GoModule;
use crate::templates::{self, BuildInfo};

/// Length of abbreviated commit ids in generated output
const REVISION_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfoArgs {
    pub output_file: PathBuf,
    pub package: String,
    /// Keep the language's tag prefix on the version
    pub use_v: bool,
    /// Commit the generated file
    pub commit: bool,
}

/// Writes a build-info source file for the next version and commits it
pub fn generate_build_info<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    args: &BuildInfoArgs,
) -> Result<()> {
    let resolved = ctx.resolve(repo)?;
    let version = if args.use_v {
        ctx.format_tag(&resolved.next)
    } else {
        resolved.next.to_string()
    };

    let info = BuildInfo {
        package_name: args.package.clone(),
        version: version.clone(),
        revision: repo.short_revision("HEAD", REVISION_LEN)?,
        branch: ctx.branch_name(repo)?,
        build_user: build_user(),
        build_date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    let source = info.render(ctx.options.language)?;

    let output = &args.output_file;
    ctx.perform(&format!("write {}", output.display()), || {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, &source)?;
        tracing::info!("wrote build info for {} to {}", version, output.display());
        Ok(())
    })?;

    if !args.commit {
        tracing::info!("--no-commit specified, not committing {}", output.display());
        return Ok(());
    }

    let git = &ctx.config.git;
    ctx.perform(&format!("set user.name to {}", git.username), || {
        repo.set_config("user.name", &git.username)
    })?;
    ctx.perform(&format!("set user.email to {}", git.email), || {
        repo.set_config("user.email", &git.email)
    })?;

    let message = format!("Release {}", version);
    ctx.perform(&format!("commit {}", output.display()), || {
        repo.commit_file(output, &message)
    })?;
    Ok(())
}

/// Prints `-ldflags` values injecting version, revision and build date
pub fn go_build_flags<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    out: &mut dyn Write,
    next_version: bool,
) -> Result<()> {
    let resolved = ctx.resolve(repo)?;
    let version = if next_version {
        &resolved.next
    } else {
        &resolved.current
    };

    let manifest_path = &ctx.config.release_notes.manifest;
    let text = fs::read_to_string(manifest_path).map_err(|e| {
        CiError::manifest(format!("cannot read '{}': {}", manifest_path.display(), e))
    })?;
    let module = GoModule::parse(&text)?;

    let flags = templates::go_build_flags(
        &module.module_path,
        &ctx.config.build_info.go_version_package,
        &Language::Go.format_tag(version),
        &repo.short_revision("HEAD", REVISION_LEN)?,
        &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    write!(out, "{}", flags)?;
    Ok(())
}

fn build_user() -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
