//! Downstream build triggers

use crate::ci::{self, CiClient, GithubDispatch, JenkinsBuild};
use crate::cli::context::CommandContext;
use crate::error::{CiError, Result};
use crate::git::GitRepository;

/// Sends a `repository_dispatch` event carrying the current version
pub fn trigger_github_build<R: GitRepository + ?Sized>(
    ctx: &CommandContext,
    repo: &R,
    repository: &str,
    event_type: &str,
    branch: Option<String>,
) -> Result<()> {
    let valid = matches!(
        repository.split_once('/'),
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
    );
    if !valid {
        return Err(CiError::config(format!(
            "expected repository as owner/repo, got '{}'",
            repository
        )));
    }

    let resolved = ctx.resolve(repo)?;
    let git_ref = match branch {
        Some(branch) => branch,
        None => ctx.branch_name(repo)?,
    };

    let dispatch = GithubDispatch {
        repo: repository.to_string(),
        event_type: event_type.to_string(),
        git_ref: Some(git_ref),
        version: Some(ctx.format_tag(&resolved.current)),
    };
    let settings = &ctx.config.ci;

    ctx.perform(
        &format!("send {} event to {}", event_type, repository),
        || {
            let token = ci::secret_from_env(&settings.github_token_env_var)?;
            CiClient::new()?.trigger_github(&settings.github_api_url, &token, &dispatch)?;
            tracing::info!("triggered {} build of {}", event_type, repository);
            Ok(())
        },
    )
}

/// Starts a parameterized Jenkins job
pub fn trigger_jenkins_build(
    ctx: &CommandContext,
    job: &str,
    params: Vec<(String, String)>,
) -> Result<()> {
    let settings = &ctx.config.ci;
    let jenkins_url = settings
        .jenkins_url
        .as_deref()
        .ok_or_else(|| CiError::config("ci.jenkins_url is not configured"))?;

    let build = JenkinsBuild {
        job: job.to_string(),
        params,
    };

    ctx.perform(&format!("start jenkins job {}", job), || {
        let user = std::env::var(&settings.jenkins_user_env_var).map_err(|_| {
            CiError::config(format!(
                "environment variable {} is not set",
                settings.jenkins_user_env_var
            ))
        })?;
        let token = ci::secret_from_env(&settings.jenkins_token_env_var)?;
        CiClient::new()?.trigger_jenkins(jenkins_url, &user, &token, &build)?;
        tracing::info!("triggered jenkins job {}", job);
        Ok(())
    })
}
