//! Season placement of a resolved episode.

use crate::models::episode::{EpisodeRecord, ParentContainer, SeriesRecord};
use crate::models::resolution::SeasonPlacement;

/// Season number used when the file is not inside a season container.
pub const DEFAULT_SEASON_NUMBER: i32 = 1;

/// Compute where `episode` sits given the container it was found in.
///
/// `series` is only consulted for non-normal episodes; pass `None` when it
/// could not be fetched and only the special-season marker is set.
pub fn place(
    episode: &EpisodeRecord,
    parent: Option<&ParentContainer>,
    series: Option<&SeriesRecord>,
) -> SeasonPlacement {
    let season_index = parent
        .and_then(ParentContainer::season_index)
        .unwrap_or(DEFAULT_SEASON_NUMBER);

    let season = match parent {
        Some(ParentContainer::Season { path, .. }) => Some(path.clone()),
        _ => None,
    };

    let mut placement = SeasonPlacement {
        season_number: season_index,
        episode_number: episode.order as i32,
        season,
        airs_before_season: None,
        airs_after_season: None,
    };

    if episode.kind.is_normal() {
        return placement;
    }

    // specials live in season 0
    placement.season_number = 0;

    let Some(series) = series else {
        return placement;
    };

    // ISO dates compare correctly as strings; a missing date sorts first
    if episode.air_date < series.air_date {
        placement.airs_before_season = Some(season_index);
    } else {
        placement.airs_after_season = Some(season_index);
    }

    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::episode::EpisodeType;
    use std::path::PathBuf;

    fn episode(kind: EpisodeType, order: f64, air_date: Option<&str>) -> EpisodeRecord {
        EpisodeRecord {
            id: "10".to_string(),
            series_id: "1".to_string(),
            kind,
            order,
            air_date: air_date.map(str::to_string),
            name: "ep".to_string(),
            name_cn: None,
            description: None,
        }
    }

    fn series(air_date: Option<&str>) -> SeriesRecord {
        SeriesRecord {
            id: "1".to_string(),
            air_date: air_date.map(str::to_string),
            name: "show".to_string(),
            name_cn: None,
        }
    }

    fn season(index: i32) -> ParentContainer {
        ParentContainer::Season {
            path: PathBuf::from(format!("/anime/Show/Season {}", index)),
            index,
            series_id: None,
        }
    }

    #[test]
    fn test_normal_without_season() {
        let placement = place(&episode(EpisodeType::Normal, 7.0, None), None, None);
        assert_eq!(placement.season_number, 1);
        assert_eq!(placement.episode_number, 7);
        assert!(placement.season.is_none());
        assert!(placement.airs_before_season.is_none());
        assert!(placement.airs_after_season.is_none());
    }

    #[test]
    fn test_normal_in_season_truncates_order() {
        let parent = season(2);
        let placement = place(&episode(EpisodeType::Normal, 12.5, None), Some(&parent), None);
        assert_eq!(placement.season_number, 2);
        assert_eq!(placement.episode_number, 12);
        assert_eq!(placement.season, Some(PathBuf::from("/anime/Show/Season 2")));
    }

    #[test]
    fn test_special_before_series() {
        let parent = season(2);
        let placement = place(
            &episode(EpisodeType::Special, 1.0, Some("2019-12-20")),
            Some(&parent),
            Some(&series(Some("2020-01-10"))),
        );
        assert_eq!(placement.season_number, 0);
        assert_eq!(placement.airs_before_season, Some(2));
        assert!(placement.airs_after_season.is_none());
    }

    #[test]
    fn test_special_after_or_same_day() {
        let placement = place(
            &episode(EpisodeType::Opening, 1.0, Some("2020-01-10")),
            None,
            Some(&series(Some("2020-01-10"))),
        );
        assert_eq!(placement.season_number, 0);
        assert!(placement.airs_before_season.is_none());
        assert_eq!(placement.airs_after_season, Some(1));
    }

    #[test]
    fn test_special_without_series() {
        let placement = place(&episode(EpisodeType::Ending, 2.0, Some("2020-01-10")), None, None);
        assert_eq!(placement.season_number, 0);
        assert!(placement.airs_before_season.is_none());
        assert!(placement.airs_after_season.is_none());
    }
}
