//! Version queries and checks

use std::io::Write;

use crate::cli::context::CommandContext;
use crate::error::{CiError, Result};
use crate::git::GitRepository;

/// Prints the current version as a tag
pub fn get_current_version<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    out: &mut dyn Write,
) -> Result<()> {
    let resolved = ctx.resolve(repo)?;
    write!(out, "{}", ctx.format_tag(&resolved.current))?;
    Ok(())
}

/// Prints the next version as a tag.
///
/// Prints nothing when HEAD is already tagged, unless `use_current_tag`
/// is set.
pub fn get_next_version<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    out: &mut dyn Write,
) -> Result<()> {
    let resolved = ctx.resolve(repo)?;

    if !ctx.options.use_current_tag && ctx.warn_if_head_tagged(repo)? {
        return Ok(());
    }

    write!(out, "{}", ctx.format_tag(&resolved.next))?;
    Ok(())
}

/// Fails with [CiError::Mismatch] unless `supplied` equals the next tag
pub fn verify_version<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    supplied: &str,
) -> Result<()> {
    let resolved = ctx.resolve(repo)?;
    check(ctx.format_tag(&resolved.next), supplied)
}

/// Fails with [CiError::Mismatch] unless `supplied` equals the current tag
pub fn verify_current_version<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    supplied: &str,
) -> Result<()> {
    let resolved = ctx.resolve(repo)?;
    check(ctx.format_tag(&resolved.current), supplied)
}

/// `computed` is what the tags say; `supplied` is what the caller claims
fn check(computed: String, supplied: &str) -> Result<()> {
    if computed != supplied {
        return Err(CiError::mismatch(computed, supplied));
    }
    tracing::info!("version {} verified", computed);
    Ok(())
}

/// Prints the branch being built
pub fn get_branch<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "{}", ctx.branch_name(repo)?)?;
    Ok(())
}

/// Prints this tool's own version and build stamps.
///
/// Stamps come from `RELEASE_CI_*` variables set when the binary is built.
pub fn tool_version(out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "release-ci version: {}, revision: {}, branch: {}, build-by: {}, built-on: {}",
        env!("CARGO_PKG_VERSION"),
        option_env!("RELEASE_CI_REVISION").unwrap_or("unknown"),
        option_env!("RELEASE_CI_BRANCH").unwrap_or("unknown"),
        option_env!("RELEASE_CI_BUILD_USER").unwrap_or("unknown"),
        option_env!("RELEASE_CI_BUILD_DATE").unwrap_or("unknown"),
    )?;
    Ok(())
}
