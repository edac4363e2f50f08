use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CiError, Result};

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "release-ci.toml";

/// Represents the complete configuration for release-ci.
///
/// Every section is optional; missing values fall back to defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub build_info: BuildInfoConfig,

    #[serde(default)]
    pub release_notes: ReleaseNotesConfig,

    #[serde(default)]
    pub ci: CiConfig,
}

fn default_git_username() -> String {
    "release-ci".to_string()
}

fn default_git_email() -> String {
    "release-ci@users.noreply.github.com".to_string()
}

fn default_ssh_key_env_var() -> String {
    "GH_CI_KEY".to_string()
}

fn default_ssh_key_file() -> String {
    "github_deploy_key".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Identity and credentials used when release-ci writes to git.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_git_username")]
    pub username: String,

    #[serde(default = "default_git_email")]
    pub email: String,

    /// Environment variable holding the base64-encoded deploy key
    #[serde(default = "default_ssh_key_env_var")]
    pub ssh_key_env_var: String,

    #[serde(default = "default_ssh_key_file")]
    pub ssh_key_file: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            username: default_git_username(),
            email: default_git_email(),
            ssh_key_env_var: default_ssh_key_env_var(),
            ssh_key_file: default_ssh_key_file(),
            remote: default_remote(),
        }
    }
}

/// Allow-list of published tags, used by tidy-tags.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct TagsConfig {
    #[serde(default)]
    pub known: Vec<String>,
}

fn default_go_version_package() -> String {
    "common/version".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildInfoConfig {
    /// Package (relative to the module path) holding Version/Revision/BuildDate
    #[serde(default = "default_go_version_package")]
    pub go_version_package: String,
}

impl Default for BuildInfoConfig {
    fn default() -> Self {
        BuildInfoConfig {
            go_version_package: default_go_version_package(),
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("go.mod")
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseNotesConfig {
    /// Path of the module manifest, relative to the repository root
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// GitHub organization whose modules get compare links
    #[serde(default)]
    pub github_org: Option<String>,
}

impl Default for ReleaseNotesConfig {
    fn default() -> Self {
        ReleaseNotesConfig {
            manifest: default_manifest(),
            github_org: None,
        }
    }
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_token_env_var() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_jenkins_user_env_var() -> String {
    "JENKINS_USER".to_string()
}

fn default_jenkins_token_env_var() -> String {
    "JENKINS_TOKEN".to_string()
}

/// Endpoints and credential variable names for downstream CI triggers.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CiConfig {
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    #[serde(default = "default_github_token_env_var")]
    pub github_token_env_var: String,

    #[serde(default)]
    pub jenkins_url: Option<String>,

    #[serde(default = "default_jenkins_user_env_var")]
    pub jenkins_user_env_var: String,

    #[serde(default = "default_jenkins_token_env_var")]
    pub jenkins_token_env_var: String,
}

impl Default for CiConfig {
    fn default() -> Self {
        CiConfig {
            github_api_url: default_github_api_url(),
            github_token_env_var: default_github_token_env_var(),
            jenkins_url: None,
            jenkins_user_env_var: default_jenkins_user_env_var(),
            jenkins_token_env_var: default_jenkins_token_env_var(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-ci.toml` in current directory
/// 3. `release-ci.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or an
///   explicitly requested file is missing
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(),
    };

    let Some(path) = path else {
        tracing::debug!("no config file found, using defaults");
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        CiError::config(format!("cannot read '{}': {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&config_str)
        .map_err(|e| CiError::config(format!("invalid '{}': {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn discover_config() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Reads a newline-separated list of tags, skipping blanks and `#` comments
pub fn load_known_tags(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CiError::config(format!("cannot read known tags '{}': {}", path.display(), e))
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
