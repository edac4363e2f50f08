use crate::error::{CiError, Result};
use crate::git::GitRepository;
use git2::{ConfigLevel, ErrorCode, Oid, Repository as Git2Repo};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_commit_oid(&self) -> Result<Oid> {
        Ok(self.repo.head()?.peel_to_commit()?.id())
    }

    /// Resolve `path` to a path relative to the working tree root
    fn workdir_relative(&self, path: &Path) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| CiError::config("Cannot commit in a bare repository"))?;

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let workdir = workdir.canonicalize()?;
        let absolute = absolute.canonicalize()?;

        absolute
            .strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                CiError::config(format!(
                    "'{}' is outside the repository at '{}'",
                    absolute.display(),
                    workdir.display()
                ))
            })
    }

    /// Push refspecs to a remote, authenticating over SSH or a credential helper
    fn push_refspecs(&self, remote_name: &str, refspecs: &[&str]) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            CiError::config(format!("No remote named '{}' found", remote_name))
        })?;

        let config = self.repo.config()?;
        let ssh_command = config.get_string("core.sshCommand").ok();

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                // Key configured by configure-git takes priority
                if let Some(key) = ssh_command.as_deref().and_then(identity_file) {
                    if let Ok(cred) = git2::Cred::ssh_key(username, None, Path::new(key), None) {
                        return Ok(cred);
                    }
                }

                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                for key_name in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = Path::new(&home).join(".ssh").join(key_name);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }

            if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                return git2::Cred::credential_helper(&config, url, username_from_url);
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(refspecs, Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    CiError::Git(git2::Error::from_str(&format!(
                        "Network error during push to '{}': {}",
                        remote_name, e
                    )))
                } else {
                    CiError::Git(e)
                }
            })
    }
}

/// Extracts the key path from an ssh command such as `ssh -i deploy_key`
fn identity_file(ssh_command: &str) -> Option<&str> {
    let mut parts = ssh_command.split_whitespace();
    while let Some(part) = parts.next() {
        if part == "-i" {
            return parts.next();
        }
    }
    None
}

impl GitRepository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn tags_at_head(&self) -> Result<Vec<String>> {
        let head = match self.head_commit_oid() {
            Ok(oid) => oid,
            // No commits yet, so nothing can be tagged
            Err(CiError::Git(e)) if e.code() == ErrorCode::UnbornBranch => return Ok(vec![]),
            Err(e) => return Err(e),
        };

        let mut tags = Vec::new();
        for name in self.list_tags()? {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            if let Ok(commit) = reference.peel_to_commit() {
                if commit.id() == head {
                    tags.push(name);
                }
            }
        }
        Ok(tags)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) => {
                if self.repo.head_detached()? {
                    return Ok(None);
                }
                Ok(head.shorthand().map(str::to_string))
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                Ok(head
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(str::to_string))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn short_revision(&self, rev: &str, len: usize) -> Result<String> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        let full = commit.id().to_string();
        Ok(full.chars().take(len).collect())
    }

    fn show_file_at_revision(&self, rev: &str, path: &Path) -> Result<Option<Vec<u8>>> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        let tree = commit.tree()?;

        let entry = match tree.get_path(path) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let blob = entry.to_object(&self.repo)?.peel_to_blob()?;
        Ok(Some(blob.content().to_vec()))
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.tag_lightweight(name, head.as_object(), false)?;
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo.tag_delete(name)?;
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        let refspec = format!("refs/tags/{0}:refs/tags/{0}", name);
        self.push_refspecs(remote, &[refspec.as_str()])
    }

    fn delete_remote_tag(&self, remote: &str, name: &str) -> Result<()> {
        let refspec = format!(":refs/tags/{}", name);
        self.push_refspecs(remote, &[refspec.as_str()])
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repo.config()?.open_level(ConfigLevel::Local)?;
        config.set_str(key, value)?;
        Ok(())
    }

    fn set_remote_url(&self, remote: &str, url: &str) -> Result<()> {
        self.repo.remote_set_url(remote, url)?;
        Ok(())
    }

    fn commit_file(&self, path: &Path, message: &str) -> Result<()> {
        let relative = self.workdir_relative(path)?;

        let mut index = self.repo.index()?;
        index.add_path(&relative)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        Ok(())
    }
}
