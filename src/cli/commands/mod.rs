//! Subcommand handlers
//!
//! Each handler takes the [super::context::CommandContext], a
//! [crate::git::GitRepository] and, when it prints a result, the stdout
//! writer. Diagnostics go through `tracing` and [crate::ui] on stderr.

pub mod build_info;
pub mod configure_git;
pub mod release_notes;
pub mod tags;
pub mod trigger;
pub mod version;
