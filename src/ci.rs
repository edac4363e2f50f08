//! Downstream CI build triggers (GitHub Actions, Jenkins)

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use crate::error::{CiError, Result};

/// A `repository_dispatch` event for GitHub Actions
#[derive(Debug, Clone, PartialEq)]
pub struct GithubDispatch {
    /// `owner/repo`
    pub repo: String,
    pub event_type: String,
    pub git_ref: Option<String>,
    pub version: Option<String>,
}

impl GithubDispatch {
    pub fn url(&self, api_base: &str) -> String {
        format!(
            "{}/repos/{}/dispatches",
            api_base.trim_end_matches('/'),
            self.repo
        )
    }

    pub fn body(&self) -> serde_json::Value {
        let mut payload = serde_json::Map::new();
        if let Some(git_ref) = &self.git_ref {
            payload.insert("ref".to_string(), json!(git_ref));
        }
        if let Some(version) = &self.version {
            payload.insert("version".to_string(), json!(version));
        }
        json!({
            "event_type": self.event_type,
            "client_payload": payload,
        })
    }
}

/// A parameterized Jenkins job build
#[derive(Debug, Clone, PartialEq)]
pub struct JenkinsBuild {
    /// Job name; `folder/job` addresses jobs inside folders
    pub job: String,
    pub params: Vec<(String, String)>,
}

impl JenkinsBuild {
    pub fn url(&self, jenkins_url: &str) -> String {
        let job_path = self
            .job
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| format!("job/{}", segment))
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/buildWithParameters",
            jenkins_url.trim_end_matches('/'),
            job_path
        )
    }
}

/// Parses a `KEY=VALUE` build parameter
pub fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

/// Reads a credential from the environment
pub fn secret_from_env(var: &str) -> Result<SecretString> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(CiError::config(format!(
            "environment variable {} is not set",
            var
        ))),
    }
}

/// Blocking HTTP client for CI trigger calls
pub struct CiClient {
    http: reqwest::blocking::Client,
}

impl CiClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("release-ci/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(CiClient { http })
    }

    pub fn trigger_github(
        &self,
        api_base: &str,
        token: &SecretString,
        dispatch: &GithubDispatch,
    ) -> Result<()> {
        let url = dispatch.url(api_base);
        tracing::debug!(%url, event_type = %dispatch.event_type, "sending repository_dispatch");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            .json(&dispatch.body())
            .send()?;

        check_status(&url, response)
    }

    pub fn trigger_jenkins(
        &self,
        jenkins_url: &str,
        user: &str,
        token: &SecretString,
        build: &JenkinsBuild,
    ) -> Result<()> {
        let url = build.url(jenkins_url);
        tracing::debug!(%url, "triggering jenkins build");

        let response = self
            .http
            .post(&url)
            .basic_auth(user, Some(token.expose_secret()))
            .query(&build.params)
            .send()?;

        check_status(&url, response)
    }
}

fn check_status(url: &str, response: reqwest::blocking::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().unwrap_or_default();
    Err(CiError::http(format!(
        "POST {} returned {}: {}",
        url,
        status,
        body.trim()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_dispatch_request() {
        let dispatch = GithubDispatch {
            repo: "acme/app".to_string(),
            event_type: "release".to_string(),
            git_ref: Some("main".to_string()),
            version: Some("v1.2.5".to_string()),
        };
        assert_eq!(
            dispatch.url("https://api.github.com/"),
            "https://api.github.com/repos/acme/app/dispatches"
        );
        assert_eq!(
            dispatch.body(),
            json!({
                "event_type": "release",
                "client_payload": { "ref": "main", "version": "v1.2.5" }
            })
        );
    }

    #[test]
    fn test_github_dispatch_empty_payload() {
        let dispatch = GithubDispatch {
            repo: "acme/app".to_string(),
            event_type: "build".to_string(),
            git_ref: None,
            version: None,
        };
        assert_eq!(dispatch.body()["client_payload"], json!({}));
    }

    #[test]
    fn test_jenkins_url_with_folders() {
        let build = JenkinsBuild {
            job: "releases/app".to_string(),
            params: vec![],
        };
        assert_eq!(
            build.url("https://jenkins.example.com/"),
            "https://jenkins.example.com/job/releases/job/app/buildWithParameters"
        );
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("VERSION=v1.2.5").unwrap(),
            ("VERSION".to_string(), "v1.2.5".to_string())
        );
        assert_eq!(
            parse_param("EMPTY=").unwrap(),
            ("EMPTY".to_string(), String::new())
        );
        assert!(parse_param("=x").is_err());
        assert!(parse_param("novalue").is_err());
    }
}
