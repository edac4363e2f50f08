//! Pure formatting functions for terminal output.
//!
//! Everything here writes to stderr; stdout is reserved for command results
//! (versions, flags, release notes) so they can be captured by shell scripts.

use console::style;

use crate::warning::Warning;

/// Format an error message behind a red marker.
pub fn format_error(message: &str) -> String {
    format!("{} {}", style("error:").red().bold().for_stderr(), message)
}

/// Print an error message to stderr.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Format a warning behind a yellow marker.
pub fn format_warning(warning: &Warning) -> String {
    format!("{} {}", style("warning:").yellow().bold().for_stderr(), warning)
}

/// Display a warning to the user.
pub fn display_warning(warning: &Warning) {
    eprintln!("{}", format_warning(warning));
}

/// Describe an action skipped because of `--dry-run`.
pub fn format_dry_run(action: &str) -> String {
    format!("dry run: would {}", action)
}

/// One line per tag, as printed by tidy-tags
pub fn format_tag_lines(tags: &[String]) -> String {
    tags.iter().map(|tag| format!("tag {}\n", tag)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dry_run() {
        assert_eq!(format_dry_run("create tag v1.0.0"), "dry run: would create tag v1.0.0");
    }

    #[test]
    fn test_format_tag_lines() {
        let tags = vec!["v0.9.9".to_string(), "v0.9.8".to_string()];
        assert_eq!(format_tag_lines(&tags), "tag v0.9.9\ntag v0.9.8\n");
        assert_eq!(format_tag_lines(&[]), "");
    }

    #[test]
    fn test_format_error() {
        let line = format_error("tag v1.0.0 already exists");
        assert_eq!(
            console::strip_ansi_codes(&line),
            "error: tag v1.0.0 already exists"
        );
    }

    #[test]
    fn test_format_warning() {
        let warning = Warning::HeadAlreadyTagged {
            tags: vec!["v1.2.4".to_string()],
        };
        assert_eq!(
            console::strip_ansi_codes(&format_warning(&warning)),
            "warning: head already tagged with [v1.2.4]"
        );
    }
}
