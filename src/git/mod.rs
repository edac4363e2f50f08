//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of git
//! verbs release-ci needs, so version resolution and the command handlers
//! can be exercised without a real repository.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! Most code should depend on the [GitRepository] trait rather than a
//! concrete implementation.
//!
//! ```rust
//! # use release_ci::git::GitRepository;
//! # fn example<R: GitRepository>(repo: &R) -> release_ci::Result<()> {
//! let tags = repo.list_tags()?;
//! let branch = repo.current_branch()?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::Path;

/// Common git operation trait for abstraction
///
/// Implementations are used from a single thread; no `Send`/`Sync` bound.
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to [crate::error::CiError].
pub trait GitRepository {
    /// All tag names in the repository, in no particular order
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Tags whose target (peeled to a commit) is the HEAD commit
    fn tags_at_head(&self) -> Result<Vec<String>>;

    /// Name of the checked-out branch, or `None` on a detached HEAD
    fn current_branch(&self) -> Result<Option<String>>;

    /// Abbreviated commit id of `rev` (e.g. "HEAD"), `len` hex characters long
    fn short_revision(&self, rev: &str, len: usize) -> Result<String>;

    /// Contents of `path` as recorded at `rev`
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` - The blob contents
    /// * `Ok(None)` - If `rev` exists but has no such file
    /// * `Err` - If `rev` cannot be resolved
    fn show_file_at_revision(&self, rev: &str, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Create a lightweight tag pointing at HEAD
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Push a tag to a remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;

    /// Delete a tag on a remote
    fn delete_remote_tag(&self, remote: &str, name: &str) -> Result<()>;

    /// Set a key in the repository-local git config
    fn set_config(&self, key: &str, value: &str) -> Result<()>;

    /// Point a remote at a new URL
    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()>;

    /// Stage a single file and commit it on HEAD
    fn commit_file(&self, path: &Path, message: &str) -> Result<()>;
}
