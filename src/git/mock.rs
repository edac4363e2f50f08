use crate::error::{CiError, Result};
use crate::git::GitRepository;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A side-effecting call recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitAction {
    CreateTag(String),
    DeleteTag(String),
    PushTag { remote: String, name: String },
    DeleteRemoteTag { remote: String, name: String },
    SetConfig { key: String, value: String },
    SetRemoteUrl { remote: String, url: String },
    CommitFile { path: PathBuf, message: String },
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    tags: RefCell<Vec<String>>,
    head_tags: RefCell<Vec<String>>,
    branch: Option<String>,
    head_revision: String,
    files: HashMap<(String, PathBuf), Vec<u8>>,
    actions: RefCell<Vec<GitAction>>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new() -> Self {
        MockRepository {
            tags: RefCell::new(Vec::new()),
            head_tags: RefCell::new(Vec::new()),
            branch: Some("main".to_string()),
            head_revision: "0123456789abcdef0123456789abcdef01234567".to_string(),
            files: HashMap::new(),
            actions: RefCell::new(Vec::new()),
        }
    }

    /// Seed the repository with tags (not pointing at HEAD)
    pub fn with_tags<S: AsRef<str>>(self, tags: &[S]) -> Self {
        self.tags
            .borrow_mut()
            .extend(tags.iter().map(|t| t.as_ref().to_string()));
        self
    }

    /// Add a tag pointing at HEAD
    pub fn with_head_tag(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.tags.borrow_mut().push(name.clone());
        self.head_tags.borrow_mut().push(name);
        self
    }

    /// Set the checked-out branch (`None` for a detached HEAD)
    pub fn with_branch(mut self, branch: Option<&str>) -> Self {
        self.branch = branch.map(str::to_string);
        self
    }

    /// Record a file's contents at a revision
    pub fn with_file(
        mut self,
        rev: impl Into<String>,
        path: impl AsRef<Path>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.files
            .insert((rev.into(), path.as_ref().to_path_buf()), contents.into());
        self
    }

    /// Side effects performed so far, in call order
    pub fn actions(&self) -> Vec<GitAction> {
        self.actions.borrow().clone()
    }

    fn record(&self, action: GitAction) {
        self.actions.borrow_mut().push(action);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl GitRepository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.borrow().clone())
    }

    fn tags_at_head(&self) -> Result<Vec<String>> {
        Ok(self.head_tags.borrow().clone())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.branch.clone())
    }

    fn short_revision(&self, _rev: &str, len: usize) -> Result<String> {
        Ok(self.head_revision.chars().take(len).collect())
    }

    fn show_file_at_revision(&self, rev: &str, path: &Path) -> Result<Option<Vec<u8>>> {
        let has_rev = rev == "HEAD"
            || self.tags.borrow().iter().any(|t| t == rev)
            || self.files.keys().any(|(r, _)| r == rev);
        if !has_rev {
            return Err(CiError::Git(git2::Error::from_str(&format!(
                "revspec '{}' not found",
                rev
            ))));
        }
        Ok(self
            .files
            .get(&(rev.to_string(), path.to_path_buf()))
            .cloned())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        if self.tags.borrow().iter().any(|t| t == name) {
            return Err(CiError::Git(git2::Error::from_str(&format!(
                "tag '{}' already exists",
                name
            ))));
        }
        self.tags.borrow_mut().push(name.to_string());
        self.head_tags.borrow_mut().push(name.to_string());
        self.record(GitAction::CreateTag(name.to_string()));
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.tags.borrow_mut().retain(|t| t != name);
        self.head_tags.borrow_mut().retain(|t| t != name);
        self.record(GitAction::DeleteTag(name.to_string()));
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        self.record(GitAction::PushTag {
            remote: remote.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn delete_remote_tag(&self, remote: &str, name: &str) -> Result<()> {
        self.record(GitAction::DeleteRemoteTag {
            remote: remote.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.record(GitAction::SetConfig {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        self.record(GitAction::SetRemoteUrl {
            remote: remote.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }

    fn commit_file(&self, path: &Path, message: &str) -> Result<()> {
        self.record(GitAction::CommitFile {
            path: path.to_path_buf(),
            message: message.to_string(),
        });
        Ok(())
    }
}
