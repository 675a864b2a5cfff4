//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bangumi Episode - Match anime episode files to Bangumi episodes
#[derive(Parser, Debug)]
#[command(name = "bangumi-episode")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    /// Config file (default: <config dir>/bangumi_episode/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a file (or every video file in a directory) to Bangumi episodes
    Resolve {
        /// File or directory to resolve
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Bangumi subject ID of the series (default: [bgm=ID] tag in a parent folder)
        #[arg(long)]
        series_id: Option<String>,

        /// Bangumi episode ID already attached to the file
        #[arg(long)]
        episode_id: Option<String>,

        /// Episode number already known for the file
        #[arg(long)]
        index: Option<i32>,

        /// Always take the episode number from the file name
        #[arg(long)]
        always_replace: bool,

        /// Accept --episode-id without checking it
        #[arg(long)]
        trust_id: bool,

        /// Use the token-based extractor for episode numbers
        #[arg(long)]
        anitomy: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what is extracted from file names (no network)
    Inspect {
        /// File names to inspect
        #[arg(value_name = "FILE_NAME", required = true)]
        file_names: Vec<String>,

        /// Use the token-based extractor for episode numbers
        #[arg(long)]
        anitomy: bool,
    },
}
