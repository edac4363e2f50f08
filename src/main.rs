use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_ci::cli::context::CommandContext;
use release_ci::cli::{self, Cli, GlobalArgs};
use release_ci::config;
use release_ci::git::Git2Repository;
use release_ci::ui;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.global);

    if let Err(e) = run(cli) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing(global: &GlobalArgs) {
    let filter = if global.verbose {
        EnvFilter::new("release_ci=debug")
    } else if global.quiet {
        EnvFilter::new("release_ci=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("release_ci=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(std::env::var("NO_COLOR").is_err())
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.global.config.as_deref())
        .context("Error loading config")?;
    let ctx = CommandContext::new(cli.global.to_options(), config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    cli::execute(cli.command, &ctx, || Git2Repository::open("."), &mut out)?;

    out.flush()?;
    Ok(())
}
