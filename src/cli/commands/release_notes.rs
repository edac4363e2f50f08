//! Release notes from the manifest diff since the current release

use std::fs;
use std::io::Write;

use crate::cli::context::CommandContext;
use crate::error::{CiError, Result};
use crate::git::GitRepository;
use crate::manifest::GoModule;
use crate::release_notes::ReleaseNotes;

pub fn build_release_notes<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    out: &mut dyn Write,
    show_unchanged: bool,
) -> Result<()> {
    let resolved = ctx.resolve(repo)?;
    let current_tag = resolved
        .current_tag
        .clone()
        .ok_or_else(|| CiError::version("no release tag found to compare against"))?;

    let manifest_path = &ctx.config.release_notes.manifest;
    let current_text = fs::read_to_string(manifest_path).map_err(|e| {
        CiError::manifest(format!("cannot read '{}': {}", manifest_path.display(), e))
    })?;

    let previous_bytes = repo
        .show_file_at_revision(&current_tag, manifest_path)?
        .ok_or_else(|| {
            CiError::manifest(format!(
                "'{}' does not exist at {}",
                manifest_path.display(),
                current_tag
            ))
        })?;
    let previous_text = String::from_utf8(previous_bytes).map_err(|e| {
        CiError::manifest(format!(
            "'{}' at {} is not UTF-8: {}",
            manifest_path.display(),
            current_tag,
            e
        ))
    })?;

    let previous = GoModule::parse(&previous_text)?;
    let current = GoModule::parse(&current_text)?;
    tracing::debug!(
        previous = previous.requires.len(),
        current = current.requires.len(),
        "parsed manifests"
    );

    let notes = ReleaseNotes::build(
        &previous,
        &current,
        resolved.next.clone(),
        current_tag,
        ctx.format_tag(&resolved.next),
    )
    .with_github_org(ctx.config.release_notes.github_org.clone())
    .with_show_unchanged(show_unchanged);

    write!(out, "{}", notes)?;
    Ok(())
}
