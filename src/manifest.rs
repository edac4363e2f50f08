//! Go module manifest (`go.mod`) parsing and dependency diffing

use crate::error::{CiError, Result};

/// A single `require` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
    pub indirect: bool,
}

/// The parts of a `go.mod` file release-ci cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub module_path: String,
    pub requires: Vec<Requirement>,
}

#[derive(Clone, Copy, PartialEq)]
enum Block {
    None,
    Require,
    /// replace, exclude, retract, tool, godebug: contents ignored
    Other,
}

impl GoModule {
    /// Parse the text of a `go.mod` file
    pub fn parse(text: &str) -> Result<Self> {
        let mut module_path = None;
        let mut requires = Vec::new();
        let mut block = Block::None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let (code, comment) = match raw_line.find("//") {
                Some(pos) => (&raw_line[..pos], &raw_line[pos + 2..]),
                None => (raw_line, ""),
            };
            let line = code.trim();
            if line.is_empty() {
                continue;
            }

            if block != Block::None {
                if line == ")" {
                    block = Block::None;
                } else if block == Block::Require {
                    requires.push(parse_requirement(line, comment, line_no)?);
                }
                continue;
            }

            let (keyword, rest) = match line.split_once(char::is_whitespace) {
                Some((keyword, rest)) => (keyword, rest.trim()),
                None => (line, ""),
            };

            match (keyword, rest) {
                ("module", path) if !path.is_empty() => {
                    module_path = Some(path.trim_matches('"').to_string());
                }
                ("require", "(") => block = Block::Require,
                ("require", entry) => requires.push(parse_requirement(entry, comment, line_no)?),
                (_, "(") => block = Block::Other,
                _ => {}
            }
        }

        if block != Block::None {
            return Err(CiError::manifest("unterminated block at end of go.mod"));
        }

        let module_path =
            module_path.ok_or_else(|| CiError::manifest("go.mod has no module directive"))?;

        Ok(GoModule {
            module_path,
            requires,
        })
    }

    /// Version required for `path`, if any
    pub fn version_of(&self, path: &str) -> Option<&str> {
        self.requires
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.version.as_str())
    }
}

fn parse_requirement(entry: &str, comment: &str, line_no: usize) -> Result<Requirement> {
    let malformed =
        || CiError::manifest(format!("line {}: malformed require '{}'", line_no, entry));

    let mut fields = entry.split_whitespace();
    let (path, version) = match (fields.next(), fields.next(), fields.next()) {
        (Some(path), Some(version), None) if version.starts_with('v') => (path, version),
        _ => return Err(malformed()),
    };

    Ok(Requirement {
        path: path.trim_matches('"').to_string(),
        version: version.to_string(),
        indirect: comment.trim() == "indirect",
    })
}

/// Predecessor path under semantic import versioning.
///
/// `example.com/m/v3` -> `example.com/m/v2`, `example.com/m/v2` -> `example.com/m`,
/// anything without a major suffix has no predecessor.
pub fn previous_module_path(path: &str) -> Option<String> {
    let (base, suffix) = path.rsplit_once('/')?;
    let major: u64 = suffix.strip_prefix('v')?.parse().ok()?;
    match major {
        0 | 1 => None,
        2 => Some(base.to_string()),
        n => Some(format!("{}/v{}", base, n - 1)),
    }
}

/// How a dependency moved between two manifests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Added { version: String },
    Updated { from: String, to: String },
    Unchanged { version: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// Compare the requirements of `old` and `new`, in `new`'s order.
///
/// A module missing from `old` is looked up under its predecessor paths
/// (`/v3` -> `/v2` -> unsuffixed) so a major-version bump reads as an update.
pub fn diff(old: &GoModule, new: &GoModule) -> Vec<DependencyChange> {
    new.requires
        .iter()
        .map(|req| {
            let mut previous = old.version_of(&req.path);
            let mut candidate = previous_module_path(&req.path);
            while previous.is_none() {
                let Some(path) = candidate else { break };
                previous = old.version_of(&path);
                candidate = previous_module_path(&path);
            }

            let kind = match previous {
                None => ChangeKind::Added {
                    version: req.version.clone(),
                },
                Some(from) if from != req.version => ChangeKind::Updated {
                    from: from.to_string(),
                    to: req.version.clone(),
                },
                Some(_) => ChangeKind::Unchanged {
                    version: req.version.clone(),
                },
            };

            DependencyChange {
                path: req.path.clone(),
                kind,
            }
        })
        .collect()
}
