//! Bangumi Episode CLI
//!
//! A command-line tool for matching anime episode files to Bangumi episodes.

use bangumi_episode::cli::{
    args::{Cli, Commands},
    commands::{inspect, resolve},
};
use bangumi_episode::models::config::{self, Config};
use bangumi_episode::preflight;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let mut config = match cli.config.as_deref() {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config(),
    };

    // Run the appropriate command
    match cli.command {
        Commands::Resolve {
            path,
            series_id,
            episode_id,
            index,
            always_replace,
            trust_id,
            anitomy,
            json,
        } => {
            config.resolver.always_replace_episode_number |= always_replace;
            config.resolver.trust_existed_bangumi_id |= trust_id;
            config.resolver.always_get_episode_by_anitomy_sharp |= anitomy;

            // Run preflight checks unless skipped
            if !cli.skip_preflight {
                run_preflight_checks(&config).await?;
            }

            let options = resolve::ResolveOptions {
                series_id,
                episode_id,
                index,
                json,
            };
            resolve::resolve(&path, &options, &config).await?;
        }

        Commands::Inspect {
            file_names,
            anitomy,
        } => {
            inspect::inspect(&file_names, anitomy)?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("bangumi_episode=debug")
    } else {
        EnvFilter::new("bangumi_episode=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(config: &Config) -> anyhow::Result<()> {
    use colored::Colorize;

    eprintln!("{}", "Running preflight checks...".bold());
    eprintln!();

    let results = preflight::run_preflight_checks(config).await;
    let passed = preflight::report(&results);

    eprintln!();

    if !passed {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
