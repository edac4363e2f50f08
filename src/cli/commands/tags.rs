//! Tag creation and allow-list cleanup

use std::io::Write;
use std::path::Path;

use crate::cli::context::CommandContext;
use crate::config;
use crate::error::{CiError, Result};
use crate::git::GitRepository;
use crate::resolver;
use crate::ui;

/// Tags HEAD with the next version and pushes the tag.
///
/// Does nothing when HEAD already carries a version tag.
pub fn tag_release<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    out: &mut dyn Write,
) -> Result<()> {
    let resolved = ctx.resolve(repo)?;

    if ctx.warn_if_head_tagged(repo)? {
        tracing::info!("not tagging");
        return Ok(());
    }

    let tag = ctx.format_tag(&resolved.next);
    let remote = ctx.config.git.remote.as_str();

    ctx.perform(&format!("create tag {}", tag), || repo.create_tag(&tag))?;
    ctx.perform(&format!("push tag {} to {}", tag, remote), || {
        repo.push_tag(remote, &tag)?;
        tracing::info!("tagged {}", tag);
        Ok(())
    })?;

    writeln!(out, "{}", tag)?;
    Ok(())
}

/// Lists tags absent from the allow-list; with `fix`, deletes them from
/// the remote and then locally.
pub fn tidy_tags<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    out: &mut dyn Write,
    fix: bool,
    known_tags_file: Option<&Path>,
) -> Result<()> {
    let known = match known_tags_file {
        Some(path) => config::load_known_tags(path)?,
        None => ctx.config.tags.known.clone(),
    };
    if known.is_empty() {
        return Err(CiError::config(
            "no known tags configured; set [tags] known or pass --known-tags-file",
        ));
    }

    let observed = repo.list_tags()?;
    let reconciliation = resolver::extra_tags(&known, &observed);
    for warning in &reconciliation.warnings {
        ui::display_warning(warning);
    }

    write!(out, "{}", ui::format_tag_lines(&reconciliation.extra))?;

    if !fix {
        return Ok(());
    }

    let remote = ctx.config.git.remote.as_str();
    for tag in &reconciliation.extra {
        ctx.perform(&format!("delete tag {} from {}", tag, remote), || {
            repo.delete_remote_tag(remote, tag)
        })?;
        ctx.perform(&format!("delete local tag {}", tag), || {
            repo.delete_tag(tag)?;
            tracing::info!("removed tag {}", tag);
            Ok(())
        })?;
    }
    Ok(())
}
