//! Host library lookup.
//!
//! Works out which container (season or series) a file lives in. The
//! filesystem implementation reads it from directory names:
//! - `Season 2`, `S02`, `第2季`, `第二季` and `Specials` are seasons
//! - anything else is a series
//!
//! A `[bangumi-123]` / `[bgm=123]` tag in a directory name carries a
//! Bangumi subject ID for that container.

use crate::models::episode::ParentContainer;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static ID_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[(?:bangumi|bgm)[-=](\d+)\]").unwrap());

static SEASON_CN_ARABIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第(\d{1,2})季").unwrap());

static SEASON_EN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^season\s*(\d{1,2})$").unwrap());

static SEASON_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^s(\d{1,2})$").unwrap());

/// Looks up the container a directory represents.
pub trait LibraryLookup: Send + Sync {
    /// Find the container for `directory`, if the library knows it.
    fn find_parent_container(&self, directory: &Path) -> Option<ParentContainer>;
}

/// Library lookup based on directory names.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLibrary;

impl FsLibrary {
    pub fn new() -> Self {
        Self
    }
}

impl LibraryLookup for FsLibrary {
    fn find_parent_container(&self, directory: &Path) -> Option<ParentContainer> {
        let name = directory.file_name()?.to_str()?;

        match season_number(name) {
            Some(index) => Some(ParentContainer::Season {
                path: directory.to_path_buf(),
                index,
                series_id: id_tag(name),
            }),
            None => Some(ParentContainer::Series {
                path: directory.to_path_buf(),
            }),
        }
    }
}

/// Extract a Bangumi subject ID tag from a directory name.
pub fn id_tag(name: &str) -> Option<String> {
    ID_TAG
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Find the series-level subject ID for a file by walking up its directories.
///
/// Season directories are skipped; their tags override the series ID
/// during resolution instead.
pub fn series_id_from_path(path: &Path) -> Option<String> {
    path.ancestors()
        .skip(1)
        .filter_map(|dir| dir.file_name().and_then(|n| n.to_str()))
        .filter(|name| season_number(name).is_none())
        .find_map(id_tag)
}

/// Season number encoded in a directory name.
pub fn season_number(dirname: &str) -> Option<i32> {
    let without_tag = ID_TAG.replace_all(dirname, "");
    let name = without_tag.trim();

    if name.eq_ignore_ascii_case("specials") {
        return Some(0);
    }

    let chinese_nums = [
        ("一", 1),
        ("二", 2),
        ("三", 3),
        ("四", 4),
        ("五", 5),
        ("六", 6),
        ("七", 7),
        ("八", 8),
        ("九", 9),
        ("十", 10),
        ("十一", 11),
        ("十二", 12),
        ("十三", 13),
        ("十四", 14),
        ("十五", 15),
    ];

    for (cn, num) in &chinese_nums {
        if name.contains(&format!("第{}季", cn)) {
            return Some(*num);
        }
    }

    [&*SEASON_CN_ARABIC, &*SEASON_EN, &*SEASON_SHORT]
        .into_iter()
        .find_map(|re| {
            re.captures(name)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
}
