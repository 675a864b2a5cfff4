//! Episode identity resolution.
//!
//! Decides which catalog episode a file is, in two steps tried in order:
//!
//! 1. **Direct ID**: an episode ID already attached to the file is fetched
//!    and kept if it still looks right.
//! 2. **Catalog list**: the series' episode list is fetched and the entry
//!    whose `order` equals the reconciled episode number is picked.
//!
//! A failed lookup never aborts resolution; it only moves on to the next
//! step. Cancellation is the one outcome that stops everything.

use super::filename::{self, FilenameSignal};
use super::placement;
use super::reconciler::reconcile_signal;
use crate::models::config::ResolverConfig;
use crate::models::episode::{EpisodeRecord, ParentContainer};
use crate::models::resolution::{ResolutionInput, ResolvedEpisode};
use crate::services::anitomy::{NumberExtractor, TokenExtractor};
use crate::services::catalog::Catalog;
use crate::services::library::LibraryLookup;
use crate::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Largest `order` distance at which an attached episode ID is still trusted.
pub const ORDER_TOLERANCE: f64 = 0.1;

/// Lookup strategies, tried in order until one finds an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LookupStep {
    DirectId,
    CatalogList,
}

const LOOKUP_STEPS: [LookupStep; 2] = [LookupStep::DirectId, LookupStep::CatalogList];

/// Per-call state shared by the lookup steps.
struct Attempt<'a> {
    file_name: &'a str,
    episode_id: Option<&'a str>,
    signal: FilenameSignal,
    series_id: String,
    starting_index: f64,
}

/// Resolves media files to catalog episodes.
pub struct EpisodeResolver {
    catalog: Arc<dyn Catalog>,
    library: Arc<dyn LibraryLookup>,
    extractor: Option<Arc<dyn NumberExtractor>>,
    config: ResolverConfig,
}

impl EpisodeResolver {
    /// Create a resolver. The token extractor is enabled when the
    /// configuration asks for it.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        library: Arc<dyn LibraryLookup>,
        config: ResolverConfig,
    ) -> Self {
        let extractor: Option<Arc<dyn NumberExtractor>> =
            if config.always_get_episode_by_anitomy_sharp {
                Some(Arc::new(TokenExtractor::new()))
            } else {
                None
            };

        Self {
            catalog,
            library,
            extractor,
            config,
        }
    }

    /// Replace the external number extractor.
    ///
    /// Only consulted when `always_get_episode_by_anitomy_sharp` is set.
    pub fn with_extractor(mut self, extractor: Arc<dyn NumberExtractor>) -> Self {
        if self.config.always_get_episode_by_anitomy_sharp {
            self.extractor = Some(extractor);
        }
        self
    }

    /// Resolve a file to an episode and its season placement.
    ///
    /// `Ok(None)` means no metadata could be found. The only error returned
    /// is [`Error::Cancelled`].
    pub async fn resolve(
        &self,
        input: &ResolutionInput,
        cancel: &CancellationToken,
    ) -> Result<Option<ResolvedEpisode>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let Some(file_name) = input.file_name() else {
            tracing::debug!("No file name in {}", input.path.display());
            return Ok(None);
        };

        let parent = input
            .directory()
            .and_then(|dir| self.library.find_parent_container(dir));

        let episode = self.identify(input, parent.as_ref(), cancel).await?;
        tracing::info!(
            "metadata for {}: {}",
            file_name,
            episode
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "none".to_string())
        );

        let Some(episode) = episode else {
            return Ok(None);
        };

        let series = if episode.kind.is_normal() {
            None
        } else {
            soft_lookup(
                cancel,
                "series",
                &episode.series_id,
                self.catalog.fetch_series(&episode.series_id),
            )
            .await?
        };

        let placement = placement::place(&episode, parent.as_ref(), series.as_ref());
        Ok(Some(ResolvedEpisode { episode, placement }))
    }

    /// Identify the catalog episode for a file without placing it.
    pub async fn identify(
        &self,
        input: &ResolutionInput,
        parent: Option<&ParentContainer>,
        cancel: &CancellationToken,
    ) -> Result<Option<EpisodeRecord>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let Some(file_name) = input.file_name() else {
            return Ok(None);
        };

        let signal = FilenameSignal::extract(file_name, self.extractor.as_deref());
        tracing::debug!("Filename signal for {}: {:?}", file_name, signal);

        let series_id = parent
            .and_then(ParentContainer::series_id_override)
            .or(input.series_id.as_deref())
            .filter(|id| !id.is_empty());

        let Some(series_id) = series_id else {
            tracing::debug!("No series id for {}", file_name);
            return Ok(None);
        };

        let attempt = Attempt {
            file_name,
            episode_id: input.episode_id.as_deref().filter(|id| !id.is_empty()),
            starting_index: self.starting_index(file_name, input.index_number, &signal),
            series_id: series_id.to_string(),
            signal,
        };

        for step in LOOKUP_STEPS {
            let found = match step {
                LookupStep::DirectId => self.lookup_direct_id(&attempt, cancel).await?,
                LookupStep::CatalogList => self.lookup_catalog_list(&attempt, cancel).await?,
            };

            if let Some(episode) = found {
                tracing::debug!("{} resolved by {:?}", file_name, step);
                return Ok(Some(episode));
            }
        }

        Ok(None)
    }

    /// Episode number to start from: the host index, unless it is missing,
    /// zero, or overridden by configuration.
    fn starting_index(&self, file_name: &str, host_index: Option<i32>, signal: &FilenameSignal) -> f64 {
        let always_replace = self.config.always_replace_episode_number;

        match host_index {
            Some(index) if index != 0 && !always_replace => f64::from(index),
            _ => {
                reconcile_signal(
                    file_name,
                    host_index.map(f64::from),
                    signal,
                    None,
                    always_replace,
                )
                .value
            }
        }
    }

    async fn lookup_direct_id(
        &self,
        attempt: &Attempt<'_>,
        cancel: &CancellationToken,
    ) -> Result<Option<EpisodeRecord>> {
        let Some(episode_id) = attempt.episode_id else {
            return Ok(None);
        };

        let fetched = soft_lookup(
            cancel,
            "episode",
            episode_id,
            self.catalog.fetch_episode(episode_id),
        )
        .await?;

        let Some(episode) = fetched else {
            tracing::debug!("Episode {} not found, falling back to catalog", episode_id);
            return Ok(None);
        };

        if self.config.trust_existed_bangumi_id {
            return Ok(Some(episode));
        }

        // non-normal numbering is independent of anything in the file name
        if !episode.kind.is_normal() || filename::has_special_marker(attempt.file_name) {
            return Ok(Some(episode));
        }

        if episode.series_id == attempt.series_id
            && (episode.order - attempt.starting_index).abs() < ORDER_TOLERANCE
        {
            return Ok(Some(episode));
        }

        tracing::info!(
            "Ignoring episode id {} for {}: series {} order {} does not match series {} index {}",
            episode_id,
            attempt.file_name,
            episode.series_id,
            episode.order,
            attempt.series_id,
            attempt.starting_index
        );
        Ok(None)
    }

    async fn lookup_catalog_list(
        &self,
        attempt: &Attempt<'_>,
        cancel: &CancellationToken,
    ) -> Result<Option<EpisodeRecord>> {
        let type_hint = attempt.signal.guessed_type;

        // the reconciled index is either the starting index or the filename guess
        let index_hint = attempt
            .signal
            .guessed_number
            .map_or(attempt.starting_index, |n| n.max(attempt.starting_index));

        let fetched = soft_lookup(
            cancel,
            "episode list",
            &attempt.series_id,
            self.catalog
                .fetch_episode_catalog(&attempt.series_id, type_hint, index_hint),
        )
        .await?;

        let Some(mut episodes) = fetched else {
            return Ok(None);
        };

        let mut index = attempt.starting_index;

        // only the normal sequence shares a bound with the catalog list
        if type_hint.map_or(true, |t| t.is_normal()) {
            let max_bound = episodes
                .iter()
                .map(|e| e.order)
                .fold(f64::NEG_INFINITY, f64::max);

            index = reconcile_signal(
                attempt.file_name,
                Some(index),
                &attempt.signal,
                Some(max_bound),
                self.config.always_replace_episode_number,
            )
            .value;
        }

        // stable sort: normal entries win ties on `order`
        episodes.sort_by_key(|e| e.kind);

        let episode = episodes.into_iter().find(|e| e.order == index);
        if episode.is_none() {
            tracing::debug!(
                "No episode with order {} in series {} for {}",
                index,
                attempt.series_id,
                attempt.file_name
            );
        }
        Ok(episode)
    }
}

/// Run a collaborator call, racing it against cancellation.
///
/// Lookup failures are logged and reported as "not found".
async fn soft_lookup<T, F>(
    cancel: &CancellationToken,
    what: &str,
    id: &str,
    lookup: F,
) -> Result<Option<T>>
where
    F: Future<Output = Result<Option<T>>>,
{
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        outcome = lookup => outcome,
    };

    match outcome {
        Ok(found) => Ok(found),
        Err(Error::Cancelled) => Err(Error::Cancelled),
        Err(e) => {
            tracing::warn!("Failed to fetch {} {}: {}", what, id, e);
            Ok(None)
        }
    }
}
