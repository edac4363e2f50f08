//! User interface module - terminal formatting.
//!
//! release-ci runs unattended in CI pipelines, so there are no prompts;
//! `formatter` holds the styling for errors, warnings and dry-run notes.

pub mod formatter;

pub use formatter::{
    display_error, display_warning, format_dry_run, format_error, format_tag_lines, format_warning,
};
