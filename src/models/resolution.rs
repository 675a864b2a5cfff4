//! Resolution input and output models.

use super::episode::EpisodeRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything known about a file before resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionInput {
    /// Full path to the media file.
    pub path: PathBuf,
    /// Catalog series ID known at the series level.
    pub series_id: Option<String>,
    /// Catalog episode ID already attached to the file.
    pub episode_id: Option<String>,
    /// Episode index supplied by the host library.
    pub index_number: Option<i32>,
}

impl ResolutionInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_series_id(mut self, id: impl Into<String>) -> Self {
        self.series_id = Some(id.into());
        self
    }

    pub fn with_episode_id(mut self, id: impl Into<String>) -> Self {
        self.episode_id = Some(id.into());
        self
    }

    pub fn with_index_number(mut self, index: i32) -> Self {
        self.index_number = Some(index);
        self
    }

    /// File name component of the path.
    pub fn file_name(&self) -> Option<&str> {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
    }

    /// Directory that holds the file.
    pub fn directory(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// Where a resolved episode sits within its series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonPlacement {
    /// Season number. Zero marks a special/bonus entry.
    pub season_number: i32,
    /// Episode number within the season (truncated `order`).
    pub episode_number: i32,
    /// Season container the episode is linked to.
    pub season: Option<PathBuf>,
    /// Special airs before this season.
    pub airs_before_season: Option<i32>,
    /// Special airs after this season.
    pub airs_after_season: Option<i32>,
}

/// A fully resolved episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEpisode {
    pub episode: EpisodeRecord,
    pub placement: SeasonPlacement,
}
