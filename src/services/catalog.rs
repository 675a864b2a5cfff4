//! Episode catalog abstraction.

use crate::models::episode::{EpisodeRecord, EpisodeType, SeriesRecord};
use crate::Result;
use async_trait::async_trait;

/// Remote catalog holding series and episode records.
///
/// `Ok(None)` means the record does not exist. `Err(_)` means the catalog
/// could not be asked; callers in the resolution pipeline treat both the
/// same way.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch a single episode by ID.
    async fn fetch_episode(&self, id: &str) -> Result<Option<EpisodeRecord>>;

    /// Fetch the episode list of a series.
    ///
    /// `type_hint` filters by episode type (`None` returns every type).
    /// `index_hint` is the largest episode number that may be looked for;
    /// implementations may stop loading once the list covers it. A
    /// non-positive hint names no episode.
    async fn fetch_episode_catalog(
        &self,
        series_id: &str,
        type_hint: Option<EpisodeType>,
        index_hint: f64,
    ) -> Result<Option<Vec<EpisodeRecord>>>;

    /// Fetch a series by ID.
    async fn fetch_series(&self, series_id: &str) -> Result<Option<SeriesRecord>>;
}
