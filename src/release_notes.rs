//! Release notes built from the dependency diff between two manifests

use std::fmt;

use crate::domain::Version;
use crate::manifest::{self, ChangeKind, DependencyChange, GoModule};

/// Release notes for one release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseNotes {
    pub next_version: Version,
    pub module_path: String,
    /// Tag of the previous release, e.g. `v1.2.4`
    pub current_tag: String,
    /// Tag the release will get, e.g. `v1.2.5`
    pub next_tag: String,
    pub changes: Vec<DependencyChange>,
    pub github_org: Option<String>,
    pub show_unchanged: bool,
}

impl ReleaseNotes {
    pub fn build(
        previous: &GoModule,
        current: &GoModule,
        next_version: Version,
        current_tag: impl Into<String>,
        next_tag: impl Into<String>,
    ) -> Self {
        ReleaseNotes {
            next_version,
            module_path: current.module_path.clone(),
            current_tag: current_tag.into(),
            next_tag: next_tag.into(),
            changes: manifest::diff(previous, current),
            github_org: None,
            show_unchanged: false,
        }
    }

    pub fn with_github_org(mut self, org: Option<String>) -> Self {
        self.github_org = org;
        self
    }

    pub fn with_show_unchanged(mut self, show_unchanged: bool) -> Self {
        self.show_unchanged = show_unchanged;
        self
    }

    /// Repository name for modules hosted under the configured organization
    fn org_project(&self, module_path: &str) -> Option<(&str, String)> {
        let org = self.github_org.as_deref()?;
        let prefix = format!("github.com/{}/", org);
        let rest = module_path.strip_prefix(&prefix)?;
        let project = rest.split('/').next().filter(|p| !p.is_empty())?;
        Some((org, project.to_string()))
    }

    fn version_range(&self, module_path: &str, from: &str, to: &str) -> String {
        match self.org_project(module_path) {
            Some((org, project)) => format!(
                "[{from} -> {to}](https://github.com/{org}/{project}/compare/{from}...{to})"
            ),
            None => format!("{} -> {}", from, to),
        }
    }
}

impl fmt::Display for ReleaseNotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Release notes {}", self.next_version)?;
        writeln!(f)?;
        writeln!(f, "## Issues Fixed and Dependency Updates")?;
        writeln!(f)?;

        writeln!(
            f,
            "* {}: {}",
            self.module_path,
            self.version_range(&self.module_path, &self.current_tag, &self.next_tag)
        )?;

        for change in &self.changes {
            match &change.kind {
                ChangeKind::Added { version } => {
                    writeln!(f, "* {}: {} (new)", change.path, version)?;
                }
                ChangeKind::Updated { from, to } => {
                    writeln!(
                        f,
                        "* {}: {}",
                        change.path,
                        self.version_range(&change.path, from, to)
                    )?;
                }
                ChangeKind::Unchanged { version } if self.show_unchanged => {
                    writeln!(f, "* {}: {} (unchanged)", change.path, version)?;
                }
                ChangeKind::Unchanged { .. } => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modules() -> (GoModule, GoModule) {
        let old = GoModule::parse(
            "module github.com/acme/app\nrequire (\n github.com/acme/lib v0.1.0\n github.com/other/dep v1.0.0\n golang.org/x/sys v0.1.0\n)\n",
        )
        .unwrap();
        let new = GoModule::parse(
            "module github.com/acme/app\nrequire (\n github.com/acme/lib v0.2.0\n github.com/other/dep v1.1.0\n golang.org/x/sys v0.1.0\n github.com/new/dep v0.0.1\n)\n",
        )
        .unwrap();
        (old, new)
    }

    #[test]
    fn test_render_with_org_links() {
        let (old, new) = modules();
        let notes = ReleaseNotes::build(&old, &new, Version::new(1, 2, 5), "v1.2.4", "v1.2.5")
            .with_github_org(Some("acme".to_string()));

        let text = notes.to_string();
        let expected = "\
# Release notes 1.2.5

## Issues Fixed and Dependency Updates

* github.com/acme/app: [v1.2.4 -> v1.2.5](https://github.com/acme/app/compare/v1.2.4...v1.2.5)
* github.com/acme/lib: [v0.1.0 -> v0.2.0](https://github.com/acme/lib/compare/v0.1.0...v0.2.0)
* github.com/other/dep: v1.0.0 -> v1.1.0
* github.com/new/dep: v0.0.1 (new)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_without_org_and_with_unchanged() {
        let (old, new) = modules();
        let notes = ReleaseNotes::build(&old, &new, Version::new(1, 2, 5), "v1.2.4", "v1.2.5")
            .with_show_unchanged(true);

        let text = notes.to_string();
        assert!(text.contains("* github.com/acme/app: v1.2.4 -> v1.2.5\n"));
        assert!(text.contains("* golang.org/x/sys: v0.1.0 (unchanged)\n"));
    }
}
