//! Command-line surface
//!
//! `Cli` is the clap argument tree. Handlers in [commands] receive a
//! [context::CommandContext] instead of clap types, so they can be driven
//! programmatically (and from tests) without parsing arguments.

pub mod commands;
pub mod context;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Language;
use crate::error::Result;
use crate::git::GitRepository;
use context::{CommandContext, GlobalOptions};

#[derive(Parser, Debug)]
#[command(
    name = "release-ci",
    version,
    about = "Compute release versions from git tags and automate CI release chores"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        short = 't',
        long,
        global = true,
        help = "Treat the current tag as the release: next version equals current, pre-release tags included"
    )]
    pub use_current_tag: bool,

    #[arg(long, global = true, help = "Consider -alpha, -beta, -rc etc. tags")]
    pub include_prerelease: bool,

    #[arg(short, long, global = true, help = "Disable informational output")]
    pub quiet: bool,

    #[arg(short, long, global = true, help = "Log side effects instead of performing them")]
    pub dry_run: bool,

    #[arg(
        short,
        long,
        global = true,
        default_value = "go",
        help = "Enable language specific settings. Valid values: [go,java]"
    )]
    pub language: Language,

    #[arg(short, long, global = true, help = "Set base version")]
    pub base_version: Option<String>,

    #[arg(
        short = 'f',
        long,
        global = true,
        default_value = "version",
        help = "Set base version file location"
    )]
    pub base_version_file: PathBuf,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn to_options(&self) -> GlobalOptions {
        GlobalOptions {
            language: self.language,
            dry_run: self.dry_run,
            use_current_tag: self.use_current_tag,
            include_prerelease: self.include_prerelease || self.use_current_tag,
            base_version: self.base_version.clone(),
            base_version_file: Some(self.base_version_file.clone()),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the most recently released version
    GetCurrentVersion,

    /// Print the next version that would be tagged
    GetNextVersion,

    /// Verify that the version passed in matches the next version
    VerifyVersion { version: String },

    /// Verify that the version passed in matches the current version
    VerifyCurrentVersion { version: String },

    /// Tag HEAD with the next version and push the tag
    Tag,

    /// List tags missing from the known-tags allow-list
    TidyTags {
        #[arg(long, help = "Delete the listed tags locally and on the remote")]
        fix: bool,

        #[arg(long, help = "Newline-separated allow-list, overriding [tags] known")]
        known_tags_file: Option<PathBuf>,
    },

    /// Generate a build info source file and commit it
    GenerateBuildInfo {
        output_file: PathBuf,
        package: String,

        #[arg(long, help = "Omit the language tag prefix from the version")]
        no_v: bool,

        #[arg(long, help = "Do not add nor commit the generated file")]
        no_commit: bool,
    },

    /// Print go build -ldflags setting version info
    GoBuildFlags {
        #[arg(short, long, help = "Use the next version instead of the current version")]
        next_version: bool,
    },

    /// Configure git identity and SSH deploy key for CI
    ConfigureGit {
        #[arg(long, help = "Override the configured git username")]
        git_username: Option<String>,

        #[arg(long, help = "Override the configured git email")]
        git_email: Option<String>,

        #[arg(long, help = "Environment variable holding the base64 SSH key")]
        ssh_key_env_var: Option<String>,

        #[arg(long, help = "Where to write the SSH key")]
        ssh_key_file: Option<PathBuf>,
    },

    /// Print release notes from the dependency diff since the current version
    BuildReleaseNotes {
        #[arg(short = 'u', long, help = "Show dependencies even if unchanged")]
        show_unchanged: bool,
    },

    /// Send a repository_dispatch event to a GitHub repository
    TriggerGithubBuild {
        /// Target repository as owner/repo
        repository: String,

        #[arg(long, default_value = "release")]
        event_type: String,

        #[arg(long, help = "Ref to pass in the payload; defaults to the current branch")]
        branch: Option<String>,
    },

    /// Start a parameterized Jenkins job
    TriggerJenkinsBuild {
        job: String,

        #[arg(short, long = "param", value_parser = crate::ci::parse_param)]
        params: Vec<(String, String)>,
    },

    /// Print the current branch
    GetBranch,

    /// Show build information
    Version,
}

/// Runs `command`, opening the repository only for commands that use one
pub fn execute<R, F>(
    command: Command,
    ctx: &CommandContext,
    open_repository: F,
    out: &mut dyn Write,
) -> Result<()>
where
    R: GitRepository,
    F: FnOnce() -> Result<R>,
{
    match command {
        Command::GetCurrentVersion => {
            commands::version::get_current_version(ctx, &open_repository()?, out)
        }
        Command::GetNextVersion => {
            commands::version::get_next_version(ctx, &open_repository()?, out)
        }
        Command::VerifyVersion { version } => {
            commands::version::verify_version(ctx, &open_repository()?, &version)
        }
        Command::VerifyCurrentVersion { version } => {
            commands::version::verify_current_version(ctx, &open_repository()?, &version)
        }
        Command::Tag => commands::tags::tag_release(ctx, &open_repository()?, out),
        Command::TidyTags {
            fix,
            known_tags_file,
        } => commands::tags::tidy_tags(
            ctx,
            &open_repository()?,
            out,
            fix,
            known_tags_file.as_deref(),
        ),
        Command::GenerateBuildInfo {
            output_file,
            package,
            no_v,
            no_commit,
        } => commands::build_info::generate_build_info(
            ctx,
            &open_repository()?,
            &commands::build_info::BuildInfoArgs {
                output_file,
                package,
                use_v: !no_v,
                commit: !no_commit,
            },
        ),
        Command::GoBuildFlags { next_version } => {
            commands::build_info::go_build_flags(ctx, &open_repository()?, out, next_version)
        }
        Command::ConfigureGit {
            git_username,
            git_email,
            ssh_key_env_var,
            ssh_key_file,
        } => commands::configure_git::configure_git(
            ctx,
            &open_repository()?,
            &commands::configure_git::ConfigureGitArgs {
                git_username,
                git_email,
                ssh_key_env_var,
                ssh_key_file,
            },
        ),
        Command::BuildReleaseNotes { show_unchanged } => {
            commands::release_notes::build_release_notes(
                ctx,
                &open_repository()?,
                out,
                show_unchanged,
            )
        }
        Command::TriggerGithubBuild {
            repository,
            event_type,
            branch,
        } => commands::trigger::trigger_github_build(
            ctx,
            &open_repository()?,
            &repository,
            &event_type,
            branch,
        ),
        Command::TriggerJenkinsBuild { job, params } => {
            commands::trigger::trigger_jenkins_build(ctx, &job, params)
        }
        Command::GetBranch => commands::version::get_branch(ctx, &open_repository()?, out),
        Command::Version => commands::version::tool_version(out),
    }
}
