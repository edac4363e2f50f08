//! Prepares a CI checkout for pushing: identity, deploy key, SSH remote

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::cli::context::CommandContext;
use crate::error::{CiError, Result};
use crate::git::GitRepository;

/// Overrides for the `[git]` config section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigureGitArgs {
    pub git_username: Option<String>,
    pub git_email: Option<String>,
    pub ssh_key_env_var: Option<String>,
    pub ssh_key_file: Option<PathBuf>,
}

pub fn configure_git<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    args: &ConfigureGitArgs,
) -> Result<()> {
    let git = &ctx.config.git;
    let username = args.git_username.as_deref().unwrap_or(&git.username);
    let email = args.git_email.as_deref().unwrap_or(&git.email);
    let key_var = args.ssh_key_env_var.as_deref().unwrap_or(&git.ssh_key_env_var);
    let key_file = args
        .ssh_key_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&git.ssh_key_file));

    let key = decode_ssh_key(key_var)?;
    let key_file = absolute(&key_file)?;

    ctx.perform(&format!("write ssh key to {}", key_file.display()), || {
        write_private_file(&key_file, &key)
    })?;
    ctx.perform("ignore the ssh key file", || {
        if ensure_gitignore_entry(&key_file)? {
            tracing::info!("added {} to .gitignore", key_file.display());
        }
        Ok(())
    })?;

    let ssh_command = format!("ssh -i {}", key_file.display());
    for (name, value) in [
        ("user.name", username),
        ("user.email", email),
        ("core.sshCommand", ssh_command.as_str()),
    ] {
        ctx.perform(&format!("set {} to {}", name, value), || {
            repo.set_config(name, value)
        })?;
    }

    if let Some(slug) = repository_slug() {
        let url = format!("git@github.com:{}.git", slug);
        let remote = git.remote.as_str();
        ctx.perform(&format!("set {} url to {}", remote, url), || {
            repo.set_remote_url(remote, &url)
        })?;
    }

    tracing::info!("git configured for {}", username);
    Ok(())
}

fn decode_ssh_key(var: &str) -> Result<Vec<u8>> {
    let encoded = std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            CiError::config(format!("unable to read ssh key from env var {}", var))
        })?;

    STANDARD
        .decode(encoded.trim())
        .map_err(|e| CiError::config(format!("unable to decode ssh key from {}: {}", var, e)))
}

/// `owner/repo` of the repository being built, from CI variables
fn repository_slug() -> Option<String> {
    ["GITHUB_REPOSITORY", "TRAVIS_REPO_SLUG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

/// Writes `contents` readable by the owner only
fn write_private_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Adds the key file's name to the `.gitignore` beside it.
/// Returns false when the entry is already present.
pub fn ensure_gitignore_entry(key_file: &Path) -> Result<bool> {
    let name = key_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CiError::config(format!("'{}' is not a file path", key_file.display()))
        })?;
    let gitignore = key_file
        .parent()
        .map(|dir| dir.join(".gitignore"))
        .unwrap_or_else(|| PathBuf::from(".gitignore"));

    let existing = match fs::read_to_string(&gitignore) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if existing.lines().any(|line| line.trim() == name) {
        return Ok(false);
    }

    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&gitignore)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{}", name)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_gitignore_entry_added_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "target").unwrap();
        let key = dir.path().join("github_deploy_key");

        assert!(ensure_gitignore_entry(&key).unwrap());
        assert!(!ensure_gitignore_entry(&key).unwrap());

        let text = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(text, "target\ngithub_deploy_key\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_private_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let key = dir.path().join("key");
        write_private_file(&key, b"secret").unwrap();

        let mode = fs::metadata(&key).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read(&key).unwrap(), b"secret");
    }
}
