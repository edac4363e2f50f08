//! Build-info source templates and Go linker flags

use regex::{Captures, Regex};

use crate::domain::Language;
use crate::error::{CiError, Result};

const GO_BUILD_INFO_TEMPLATE: &str = r#"// Code generated by release-ci. DO NOT EDIT.

package {package_name}

const (
	Version   = "{version}"
	Revision  = "{revision}"
	Branch    = "{branch}"
	BuildUser = "{build_user}"
	BuildDate = "{build_date}"
)
"#;

const JAVA_BUILD_INFO_TEMPLATE: &str = r#"// Code generated by release-ci. DO NOT EDIT.

package {package_name};

public final class BuildInfo {
    public static final String VERSION = "{version}";
    public static final String REVISION = "{revision}";
    public static final String BRANCH = "{branch}";
    public static final String BUILD_USER = "{build_user}";
    public static final String BUILD_DATE = "{build_date}";

    private BuildInfo() {
    }
}
"#;

/// Values written into a generated build-info source file
#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfo {
    pub package_name: String,
    pub version: String,
    pub revision: String,
    pub branch: String,
    pub build_user: String,
    pub build_date: String,
}

impl BuildInfo {
    /// Render the fixed template for `language`
    pub fn render(&self, language: Language) -> Result<String> {
        let (template, package_pattern) = match language {
            Language::Go => (GO_BUILD_INFO_TEMPLATE, r"^[A-Za-z_][A-Za-z0-9_]*$"),
            Language::Java => (
                JAVA_BUILD_INFO_TEMPLATE,
                r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$",
            ),
        };

        let re = Regex::new(package_pattern).map_err(|e| CiError::template(e.to_string()))?;
        if !re.is_match(&self.package_name) {
            return Err(CiError::template(format!(
                "'{}' is not a valid {} package name",
                self.package_name, language
            )));
        }

        // Single pass, so values are never re-scanned for placeholders
        let placeholder =
            Regex::new(r"\{([a-z_]+)\}").map_err(|e| CiError::template(e.to_string()))?;
        let rendered = placeholder.replace_all(template, |caps: &Captures<'_>| {
            match &caps[1] {
                "package_name" => self.package_name.clone(),
                "version" => escape_literal(&self.version),
                "revision" => escape_literal(&self.revision),
                "branch" => escape_literal(&self.branch),
                "build_user" => escape_literal(&self.build_user),
                "build_date" => escape_literal(&self.build_date),
                _ => caps[0].to_string(),
            }
        });
        Ok(rendered.into_owned())
    }
}

/// Escape a value for use inside a double-quoted Go or Java string literal
fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Linker flags injecting version info into `<module>/<package>`
pub fn go_build_flags(
    module_path: &str,
    version_package: &str,
    version: &str,
    revision: &str,
    build_date: &str,
) -> String {
    let target = format!("{}/{}", module_path, version_package.trim_matches('/'));
    format!(
        "-X '{0}.Version={1}' -X '{0}.Revision={2}' -X '{0}.BuildDate={3}'",
        target, version, revision, build_date
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_info(package_name: &str) -> BuildInfo {
        BuildInfo {
            package_name: package_name.to_string(),
            version: "v1.2.5".to_string(),
            revision: "0123456789ab".to_string(),
            branch: "main".to_string(),
            build_user: "ci".to_string(),
            build_date: "2024-01-02 03:04:05".to_string(),
        }
    }

    #[test]
    fn test_render_go() {
        let source = build_info("version").render(Language::Go).unwrap();
        assert!(source.starts_with("// Code generated by release-ci. DO NOT EDIT."));
        assert!(source.contains("package version\n"));
        assert!(source.contains("\tVersion   = \"v1.2.5\"\n"));
        assert!(source.contains("\tRevision  = \"0123456789ab\"\n"));
        assert!(source.contains("\tBuildDate = \"2024-01-02 03:04:05\"\n"));
        assert!(!source.contains('{'));
    }

    #[test]
    fn test_render_java() {
        let source = build_info("org.example.build").render(Language::Java).unwrap();
        assert!(source.contains("package org.example.build;"));
        assert!(source.contains("public static final String VERSION = \"v1.2.5\";"));
    }

    #[test]
    fn test_render_rejects_bad_package() {
        assert!(build_info("my-pkg").render(Language::Go).is_err());
        assert!(build_info("org.example").render(Language::Go).is_err());
        assert!(build_info("org..example").render(Language::Java).is_err());
    }

    #[test]
    fn test_render_escapes_values() {
        let mut info = build_info("version");
        info.branch = r#"feat/"quoted"\x"#.to_string();
        let source = info.render(Language::Go).unwrap();
        assert!(source.contains(r#"Branch    = "feat/\"quoted\"\\x""#));
    }

    #[test]
    fn test_render_does_not_expand_placeholders_in_values() {
        let mut info = build_info("version");
        info.branch = "feat/{build_date}".to_string();
        info.build_user = "{version}".to_string();
        let source = info.render(Language::Go).unwrap();
        assert!(source.contains("Branch    = \"feat/{build_date}\""));
        assert!(source.contains("BuildUser = \"{version}\""));
        assert!(source.contains("BuildDate = \"2024-01-02 03:04:05\""));
    }

    #[test]
    fn test_go_build_flags() {
        let flags = go_build_flags(
            "github.com/openziti/ziti",
            "common/version",
            "v1.2.5",
            "0123456789ab",
            "2024-01-02T03:04:05Z",
        );
        assert_eq!(
            flags,
            "-X 'github.com/openziti/ziti/common/version.Version=v1.2.5' \
             -X 'github.com/openziti/ziti/common/version.Revision=0123456789ab' \
             -X 'github.com/openziti/ziti/common/version.BuildDate=2024-01-02T03:04:05Z'"
        );
    }
}
