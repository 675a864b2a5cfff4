//! Filename signal extraction.
//!
//! Turns a raw file name into the hints used for episode matching:
//! - A cleaned name with technical noise (CRC tags, resolutions, codecs) removed
//! - A guessed episode type (opening, ending, special, preview)
//! - A guessed episode number
//!
//! Every step is an ordered list of regex rules, first match wins.

use crate::models::episode::EpisodeType;
use crate::services::anitomy::NumberExtractor;
use regex::Regex;
use std::sync::LazyLock;

/// Technical tokens that must never be read as episode numbers.
/// Applied in order; each pattern sees the output of the previous one.
static NON_EPISODE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // [ABCDEF12] / (ABCDEF12) release CRC
        Regex::new(r"(?i)[\[\(][0-9A-F]{8}[\]\)]").unwrap(),
        // S01, S02
        Regex::new(r"(?i)S\d{2,}").unwrap(),
        // yuv420p10
        Regex::new(r"(?i)yuv[4|2|0]{3}p(10|8)?").unwrap(),
        // 1080p, 720p
        Regex::new(r"(?i)\d{3,4}p").unwrap(),
        // 1920x1080
        Regex::new(r"(?i)\d{3,4}x\d{3,4}").unwrap(),
        // Hi10p
        Regex::new(r"(?i)(Hi)?10p").unwrap(),
        // 8bit, 10bit
        Regex::new(r"(?i)(8|10)bit").unwrap(),
        // x264, h265
        Regex::new(r"(?i)(x|h)(264|265)").unwrap(),
    ]
});

/// Episode type markers, highest priority first.
static TYPE_PATTERNS: LazyLock<Vec<(Regex, EpisodeType)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"(NC)?OP\d").unwrap(), EpisodeType::Opening),
        (Regex::new(r"(NC)?ED\d").unwrap(), EpisodeType::Ending),
        (
            Regex::new(r"[^\w](SP|OVA|OAD)\d*[^\w]").unwrap(),
            EpisodeType::Special,
        ),
        (Regex::new(r"[^\w]PV\d*[^\w]").unwrap(), EpisodeType::Preview),
    ]
});

/// Episode number patterns, highest priority first. Group 1 holds the number.
static EPISODE_NUMBER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // [12] / [12.5]
        Regex::new(r"\[([\d\.]{2,})\]").unwrap(),
        // - 12
        Regex::new(r"- ?([\d\.]{2,})").unwrap(),
        // E12 / EP12
        Regex::new(r"(?i)EP?([\d\.]{2,})").unwrap(),
        // [12
        Regex::new(r"\[([\d\.]{2,})").unwrap(),
        // #12
        Regex::new(r"#([\d\.]{2,})").unwrap(),
        // bare 12
        Regex::new(r"(\d{2,})").unwrap(),
    ]
});

/// Hints derived purely from a file name.
#[derive(Debug, Clone, PartialEq)]
pub struct FilenameSignal {
    /// File name with technical noise removed.
    pub stripped_name: String,
    /// Episode type, when a type marker was found.
    pub guessed_type: Option<EpisodeType>,
    /// Episode number, when one could be extracted.
    pub guessed_number: Option<f64>,
    /// Whether `guessed_number` came from the external extractor.
    pub external: bool,
}

impl FilenameSignal {
    /// Extract signals using the built-in patterns only.
    pub fn from_file_name(file_name: &str) -> Self {
        Self::extract(file_name, None)
    }

    /// Extract signals, asking `extractor` for the number first when given.
    pub fn extract(file_name: &str, extractor: Option<&dyn NumberExtractor>) -> Self {
        let stripped_name = strip_noise(file_name);
        let guessed_type = guess_episode_type(&stripped_name);

        let external = extractor.and_then(|e| {
            let raw = e.extract_episode_number(file_name)?;
            let number = parse_number(&raw);
            if number.is_none() {
                tracing::debug!(
                    "Ignoring unparsable external episode number {:?} for {}",
                    raw,
                    file_name
                );
            }
            number
        });

        let guessed_number = external.or_else(|| guess_episode_number(&stripped_name));

        Self {
            stripped_name,
            guessed_type,
            guessed_number,
            external: external.is_some(),
        }
    }

    /// Type to use downstream: unknown counts as normal.
    pub fn effective_type(&self) -> EpisodeType {
        self.guessed_type.unwrap_or(EpisodeType::Normal)
    }
}

/// Remove technical noise from a file name.
///
/// Passes over the pattern list repeat until nothing changes, so the
/// result is a fixed point and stripping it again is a no-op.
pub fn strip_noise(file_name: &str) -> String {
    let mut name = file_name.to_string();

    loop {
        let before = name.len();
        for regex in NON_EPISODE_PATTERNS.iter() {
            if regex.is_match(&name) {
                name = regex.replace_all(&name, "").into_owned();
            }
        }
        if name.len() == before {
            return name;
        }
    }
}

/// Guess the episode type from an already stripped name.
pub fn guess_episode_type(stripped_name: &str) -> Option<EpisodeType> {
    TYPE_PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(stripped_name))
        .map(|(_, kind)| *kind)
}

/// Guess the episode number from an already stripped name.
///
/// A pattern whose capture does not parse as a number does not win;
/// the next pattern is tried instead.
pub fn guess_episode_number(stripped_name: &str) -> Option<f64> {
    EPISODE_NUMBER_PATTERNS.iter().find_map(|regex| {
        let caps = regex.captures(stripped_name)?;
        parse_number(caps.get(1)?.as_str())
    })
}

/// Whether a raw name carries any opening/ending/special/preview marker.
pub fn has_special_marker(name: &str) -> bool {
    TYPE_PATTERNS.iter().any(|(regex, _)| regex.is_match(name))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
