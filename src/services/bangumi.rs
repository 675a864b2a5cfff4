//! Bangumi API client.

use crate::models::config::BangumiConfig;
use crate::models::episode::{EpisodeRecord, EpisodeType, SeriesRecord};
use crate::services::catalog::Catalog;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Subject used to probe reachability when no access token is configured.
const PROBE_SUBJECT_ID: u64 = 8;

/// Bangumi API client.
pub struct BangumiClient {
    config: BangumiConfig,
    client: reqwest::Client,
}

/// Episode as returned by `/v0/episodes`.
#[derive(Debug, Deserialize)]
pub struct EpisodeItem {
    pub id: u64,
    /// 0 本篇, 1 SP, 2 OP, 3 ED, 4 预告, 5 MAD, 6 其他
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_cn: String,
    pub sort: f64,
    pub ep: Option<f64>,
    #[serde(default)]
    pub airdate: String,
    #[serde(default)]
    pub desc: String,
    /// Only present on single-episode responses.
    pub subject_id: Option<u64>,
}

/// Paged episode list.
#[derive(Debug, Deserialize)]
pub struct PagedEpisodes {
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
    pub data: Vec<EpisodeItem>,
}

/// Subject (series) details.
#[derive(Debug, Deserialize)]
pub struct SubjectItem {
    pub id: u64,
    pub date: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_cn: String,
}

impl EpisodeItem {
    /// Convert into a catalog record.
    ///
    /// Returns `None` for episode kinds outside [`EpisodeType`] (MAD, other).
    pub fn into_record(self, fallback_series_id: Option<&str>) -> Option<EpisodeRecord> {
        let Some(kind) = EpisodeType::from_code(self.kind) else {
            tracing::debug!("Skipping episode {} with type code {}", self.id, self.kind);
            return None;
        };

        let series_id = match (self.subject_id, fallback_series_id) {
            (Some(id), _) => id.to_string(),
            (None, Some(id)) => id.to_string(),
            (None, None) => String::new(),
        };

        Some(EpisodeRecord {
            id: self.id.to_string(),
            series_id,
            kind,
            order: self.sort,
            air_date: Some(self.airdate),
            name: self.name,
            name_cn: non_empty(self.name_cn),
            description: non_empty(self.desc),
        })
    }
}

impl From<SubjectItem> for SeriesRecord {
    fn from(item: SubjectItem) -> Self {
        SeriesRecord {
            id: item.id.to_string(),
            air_date: item.date,
            name: item.name,
            name_cn: non_empty(item.name_cn),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

impl BangumiClient {
    /// Create a new Bangumi client.
    pub fn new(config: BangumiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { config, client })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match self.config.access_token.as_deref() {
            Some(token) if !token.is_empty() => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            _ => request,
        }
    }

    /// Send a GET request, mapping 404 to `None`.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        tracing::debug!("GET {}", url);
        let response = self.build_request(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(crate::Error::BangumiAccessTokenInvalid);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(crate::Error::BangumiApi {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Verify the API is reachable and the access token (if any) is valid.
    pub async fn verify(&self) -> Result<bool> {
        let url = if self.config.access_token.is_some() {
            self.url("/v0/me")
        } else {
            self.url(&format!("/v0/subjects/{}", PROBE_SUBJECT_ID))
        };

        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Get episode details.
    /// GET /v0/episodes/{episode_id}
    pub async fn get_episode(&self, episode_id: &str) -> Result<Option<EpisodeItem>> {
        self.get_json(&self.url(&format!("/v0/episodes/{}", episode_id)))
            .await
    }

    /// Get subject details.
    /// GET /v0/subjects/{subject_id}
    pub async fn get_subject(&self, subject_id: &str) -> Result<Option<SubjectItem>> {
        self.get_json(&self.url(&format!("/v0/subjects/{}", subject_id)))
            .await
    }

    /// Get one page of a subject's episodes.
    /// GET /v0/episodes?subject_id={subject_id}&type={type}&limit={limit}&offset={offset}
    pub async fn get_episode_page(
        &self,
        subject_id: &str,
        kind: Option<EpisodeType>,
        offset: u32,
    ) -> Result<Option<PagedEpisodes>> {
        let type_param = kind.map(|k| format!("&type={}", k.code())).unwrap_or_default();
        let url = self.url(&format!(
            "/v0/episodes?subject_id={}{}&limit={}&offset={}",
            subject_id, type_param, self.config.page_size, offset
        ));
        self.get_json(&url).await
    }
}

#[async_trait]
impl Catalog for BangumiClient {
    async fn fetch_episode(&self, id: &str) -> Result<Option<EpisodeRecord>> {
        Ok(self
            .get_episode(id)
            .await?
            .and_then(|item| item.into_record(None)))
    }

    async fn fetch_episode_catalog(
        &self,
        series_id: &str,
        type_hint: Option<EpisodeType>,
        index_hint: f64,
    ) -> Result<Option<Vec<EpisodeRecord>>> {
        let mut episodes: Vec<EpisodeRecord> = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let Some(page) = self.get_episode_page(series_id, type_hint, offset).await? else {
                break;
            };

            let count = page.data.len() as u32;
            episodes.extend(
                page.data
                    .into_iter()
                    .filter_map(|item| item.into_record(Some(series_id))),
            );
            offset += count;

            let loaded_max = episodes
                .iter()
                .map(|e| e.order)
                .fold(f64::NEG_INFINITY, f64::max);

            // a non-positive hint names no episode, so load everything
            let covered = index_hint > 0.0 && loaded_max >= index_hint;
            if count == 0 || offset >= page.total || covered {
                break;
            }
        }

        tracing::debug!(
            "Loaded {} episodes for subject {} (type {:?})",
            episodes.len(),
            series_id,
            type_hint
        );

        if episodes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(episodes))
        }
    }

    async fn fetch_series(&self, series_id: &str) -> Result<Option<SeriesRecord>> {
        Ok(self.get_subject(series_id).await?.map(SeriesRecord::from))
    }
}
