//! Resolve command implementation.
//!
//! Matches one file, or every video file under a directory, to Bangumi
//! episodes and prints where each one belongs.

use crate::core::resolver::EpisodeResolver;
use crate::models::config::Config;
use crate::models::resolution::{ResolutionInput, ResolvedEpisode};
use crate::services::bangumi::BangumiClient;
use crate::services::library::{self, FsLibrary};
use crate::utils::fs;
use crate::Result;
use colored::Colorize;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Per-invocation options from the command line.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub series_id: Option<String>,
    pub episode_id: Option<String>,
    pub index: Option<i32>,
    pub json: bool,
}

/// Resolution outcome for one file.
#[derive(Debug, Serialize)]
struct FileReport {
    path: PathBuf,
    resolved: Option<ResolvedEpisode>,
}

/// Resolve the file or directory at `path`.
pub async fn resolve(path: &Path, options: &ResolveOptions, config: &Config) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }

    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        fs::collect_video_files(path)?
    };

    if files.is_empty() {
        println!("No video files found.");
        return Ok(());
    }

    if files.len() > 1 && (options.episode_id.is_some() || options.index.is_some()) {
        tracing::warn!("--episode-id and --index only apply to single files, ignoring them");
    }
    let single = files.len() == 1;

    let inputs: Vec<ResolutionInput> = files
        .into_iter()
        .map(|file| {
            let series_id = options
                .series_id
                .clone()
                .or_else(|| library::series_id_from_path(&file));
            ResolutionInput {
                series_id,
                episode_id: options.episode_id.clone().filter(|_| single),
                index_number: options.index.filter(|_| single),
                path: file,
            }
        })
        .collect();

    let catalog = Arc::new(BangumiClient::new(config.bangumi.clone())?);
    let resolver = EpisodeResolver::new(catalog, Arc::new(FsLibrary::new()), config.resolver);

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling resolution");
                cancel.cancel();
            }
        }
    });

    if !options.json {
        println!(
            "{}",
            format!("🔍 Resolving {} file(s)...", inputs.len()).bold().cyan()
        );
        println!();
    }

    let outcomes: Vec<(PathBuf, Result<Option<ResolvedEpisode>>)> = stream::iter(inputs)
        .map(|input| {
            let resolver = &resolver;
            let cancel = &cancel;
            async move {
                let outcome = resolver.resolve(&input, cancel).await;
                (input.path, outcome)
            }
        })
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    ctrl_c.abort();

    let mut reports = Vec::with_capacity(outcomes.len());
    for (path, outcome) in outcomes {
        reports.push(FileReport {
            path,
            resolved: outcome?,
        });
    }
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports);
    }

    Ok(())
}

fn print_reports(reports: &[FileReport]) {
    let mut resolved_count = 0;

    for report in reports {
        let name = report
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| report.path.display().to_string());

        match &report.resolved {
            Some(resolved) => {
                resolved_count += 1;
                let episode = &resolved.episode;
                let placement = &resolved.placement;

                println!("  {} {}", "✓".green(), name.bold());
                println!(
                    "      S{:02}E{:02} {} [{} #{}] {}",
                    placement.season_number,
                    placement.episode_number,
                    episode.display_name(),
                    episode.kind,
                    episode.id,
                    episode.air_date.as_deref().unwrap_or("")
                );
                if let Some(season) = placement.airs_before_season {
                    println!("      airs before season {}", season);
                }
                if let Some(season) = placement.airs_after_season {
                    println!("      airs after season {}", season);
                }
            }
            None => {
                println!("  {} {} {}", "✗".red(), name.bold(), "(no match)".dimmed());
            }
        }
    }

    println!();
    println!("{}", "📊 Summary".bold().green());
    println!("  {} {}", "Resolved:".bold(), resolved_count);
    println!("  {} {}", "Unresolved:".bold(), reports.len() - resolved_count);
}
