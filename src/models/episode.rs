//! Catalog-side episode and series models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Episode numbering sequence.
///
/// Declaration order matters: candidates sharing the same `order` are
/// tie-broken by sorting on this type, so `Normal` must stay first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeType {
    Normal,
    Special,
    Opening,
    Ending,
    Preview,
}

impl EpisodeType {
    /// All variants in tie-break order.
    pub const ALL: [EpisodeType; 5] = [
        EpisodeType::Normal,
        EpisodeType::Special,
        EpisodeType::Opening,
        EpisodeType::Ending,
        EpisodeType::Preview,
    ];

    /// Numeric code used by the Bangumi API (`type` field).
    pub fn code(self) -> u8 {
        match self {
            EpisodeType::Normal => 0,
            EpisodeType::Special => 1,
            EpisodeType::Opening => 2,
            EpisodeType::Ending => 3,
            EpisodeType::Preview => 4,
        }
    }

    /// Look up a type by its Bangumi API code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn is_normal(self) -> bool {
        self == EpisodeType::Normal
    }
}

impl std::fmt::Display for EpisodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeType::Normal => write!(f, "normal"),
            EpisodeType::Special => write!(f, "special"),
            EpisodeType::Opening => write!(f, "opening"),
            EpisodeType::Ending => write!(f, "ending"),
            EpisodeType::Preview => write!(f, "preview"),
        }
    }
}

/// Episode record owned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Catalog episode ID.
    pub id: String,
    /// Catalog ID of the parent series (subject).
    pub series_id: String,
    /// Numbering sequence this episode belongs to.
    #[serde(rename = "type")]
    pub kind: EpisodeType,
    /// Position within its sequence. Fractional values mark split episodes.
    pub order: f64,
    /// Air date (YYYY-MM-DD, possibly partial or empty).
    pub air_date: Option<String>,
    /// Original name.
    pub name: String,
    /// Localized (Chinese) name.
    pub name_cn: Option<String>,
    /// Episode description.
    pub description: Option<String>,
}

impl EpisodeRecord {
    /// Localized name when present, otherwise the original name.
    pub fn display_name(&self) -> &str {
        match self.name_cn.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.name,
        }
    }
}

impl std::fmt::Display for EpisodeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {} \"{}\" (series {})",
            self.id,
            self.kind,
            self.order,
            self.display_name(),
            self.series_id
        )
    }
}

/// Series record owned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// Catalog series (subject) ID.
    pub id: String,
    /// First air date (YYYY-MM-DD).
    pub air_date: Option<String>,
    /// Original name.
    pub name: String,
    /// Localized (Chinese) name.
    pub name_cn: Option<String>,
}

/// Host-side container a file lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParentContainer {
    /// A season folder.
    Season {
        /// Location of the season container.
        path: PathBuf,
        /// Season number.
        index: i32,
        /// Catalog series ID overriding the top-level series ID.
        series_id: Option<String>,
    },
    /// A bare series folder.
    Series {
        /// Location of the series container.
        path: PathBuf,
    },
}

impl ParentContainer {
    /// Catalog series-id override carried by a season container.
    pub fn series_id_override(&self) -> Option<&str> {
        match self {
            ParentContainer::Season { series_id, .. } => {
                series_id.as_deref().filter(|id| !id.is_empty())
            }
            ParentContainer::Series { .. } => None,
        }
    }

    /// Season number when this is a season container.
    pub fn season_index(&self) -> Option<i32> {
        match self {
            ParentContainer::Season { index, .. } => Some(*index),
            ParentContainer::Series { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_order_puts_normal_first() {
        let mut types = vec![
            EpisodeType::Preview,
            EpisodeType::Special,
            EpisodeType::Normal,
            EpisodeType::Ending,
        ];
        types.sort();
        assert_eq!(types[0], EpisodeType::Normal);
        assert!(EpisodeType::Normal < EpisodeType::Special);
    }

    #[test]
    fn test_type_codes() {
        for t in EpisodeType::ALL {
            assert_eq!(EpisodeType::from_code(t.code()), Some(t));
        }
        assert_eq!(EpisodeType::from_code(6), None);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut episode = EpisodeRecord {
            id: "1".to_string(),
            series_id: "2".to_string(),
            kind: EpisodeType::Normal,
            order: 1.0,
            air_date: None,
            name: "始まり".to_string(),
            name_cn: Some(" ".to_string()),
            description: None,
        };
        assert_eq!(episode.display_name(), "始まり");

        episode.name_cn = Some("开始".to_string());
        assert_eq!(episode.display_name(), "开始");
    }

    #[test]
    fn test_series_id_override() {
        let season = ParentContainer::Season {
            path: PathBuf::from("/anime/Show/Season 2"),
            index: 2,
            series_id: Some("400".to_string()),
        };
        assert_eq!(season.series_id_override(), Some("400"));
        assert_eq!(season.season_index(), Some(2));

        let empty = ParentContainer::Season {
            path: PathBuf::from("/anime/Show/Season 1"),
            index: 1,
            series_id: Some(String::new()),
        };
        assert_eq!(empty.series_id_override(), None);

        let series = ParentContainer::Series {
            path: PathBuf::from("/anime/Show"),
        };
        assert_eq!(series.series_id_override(), None);
        assert_eq!(series.season_index(), None);
    }
}
