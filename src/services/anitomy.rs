//! Token-based episode number extraction.
//!
//! An alternative to the regex ladder in [`crate::core::filename`], in the
//! spirit of anitomy: the name is split into tokens, technical keywords are
//! dropped, and the episode number is picked from what remains.

use regex::Regex;
use std::sync::LazyLock;

/// Extracts an episode number from a file name.
pub trait NumberExtractor: Send + Sync {
    /// The episode number as written in the name (e.g. `"05"`, `"12.5"`).
    fn extract_episode_number(&self, file_name: &str) -> Option<String>;
}

/// Keywords that never hold an episode number (compared lowercase).
const KEYWORDS: &[&str] = &[
    "480p", "540p", "576p", "720p", "1080p", "1080i", "2160p", "4k", "x264", "x265", "h264",
    "h265", "h.264", "h.265", "hevc", "avc", "av1", "8bit", "10bit", "hi10p", "hi10", "aac",
    "flac", "ac3", "dts", "opus", "mp3", "bd", "bdrip", "bdremux", "bluray", "dvd", "dvdrip",
    "web", "webrip", "web-dl", "webdl", "tv", "tvrip", "hdtv", "chs", "cht", "gb", "big5",
];

static CHINESE_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第(\d+(?:\.\d+)?)[话話集]").unwrap());

static PREFIXED_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:e|ep|episode)(\d+(?:\.\d+)?)(?:v\d+)?$").unwrap()
});

static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,4}(?:\.\d+)?)(?:v\d+)?$").unwrap());

static VERSIONED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,4})v\d+$").unwrap());

static CRC32: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{8}$").unwrap());

static RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d{3,4}x\d{3,4}$").unwrap());

/// A word in the file name.
#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    enclosed: bool,
}

/// Anitomy-style episode number extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenExtractor;

impl TokenExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl NumberExtractor for TokenExtractor {
    fn extract_episode_number(&self, file_name: &str) -> Option<String> {
        let name = strip_extension(file_name);

        if let Some(caps) = CHINESE_EPISODE.captures(name) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }

        let tokens: Vec<Token> = tokenize(name)
            .into_iter()
            .filter(|t| !is_noise(t))
            .collect();

        // E07 / EP07 / Episode07, or "EP 07"
        for (i, token) in tokens.iter().enumerate() {
            if let Some(caps) = PREFIXED_EPISODE.captures(&token.text) {
                return caps.get(1).map(|m| m.as_str().to_string());
            }
            let lower = token.text.to_lowercase();
            if lower == "ep" || lower == "episode" {
                if let Some(number) = tokens.get(i + 1).and_then(|t| number_of(&t.text)) {
                    return Some(number);
                }
            }
        }

        // "Title - 07"
        for pair in tokens.windows(2) {
            if pair[0].text == "-" {
                if let Some(number) = number_of(&pair[1].text) {
                    return Some(number);
                }
            }
        }

        // 07v2
        if let Some(caps) = tokens
            .iter()
            .find_map(|t| VERSIONED_NUMBER.captures(&t.text))
        {
            return caps.get(1).map(|m| m.as_str().to_string());
        }

        // last isolated number that does not look like a year
        tokens
            .iter()
            .rev()
            .filter_map(|t| number_of(&t.text))
            .find(|n| !looks_like_year(n))
    }
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if (2..=4).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic()) =>
        {
            stem
        }
        _ => file_name,
    }
}

fn is_open_bracket(c: char) -> bool {
    matches!(c, '[' | '(' | '{' | '【' | '「' | '（')
}

fn is_close_bracket(c: char) -> bool {
    matches!(c, ']' | ')' | '}' | '】' | '」' | '）')
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ' ' | '_' | '.' | ',' | '&' | '+' | '|' | '\u{3000}')
}

/// Split a name into tokens, remembering which ones sat inside brackets.
/// A dot between two digits is kept so `12.5` stays one token.
fn tokenize(name: &str) -> Vec<Token> {
    let chars: Vec<char> = name.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for (i, &c) in chars.iter().enumerate() {
        if is_open_bracket(c) {
            flush(&mut current, depth > 0, &mut tokens);
            depth += 1;
        } else if is_close_bracket(c) {
            flush(&mut current, depth > 0, &mut tokens);
            depth = depth.saturating_sub(1);
        } else if is_delimiter(c) {
            let decimal_point = c == '.'
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if decimal_point {
                current.push(c);
            } else {
                flush(&mut current, depth > 0, &mut tokens);
            }
        } else {
            current.push(c);
        }
    }
    flush(&mut current, depth > 0, &mut tokens);

    tokens
}

fn flush(current: &mut String, enclosed: bool, tokens: &mut Vec<Token>) {
    if !current.is_empty() {
        tokens.push(Token {
            text: std::mem::take(current),
            enclosed,
        });
    }
}

fn is_noise(token: &Token) -> bool {
    let lower = token.text.to_lowercase();
    let crc = token.enclosed
        && CRC32.is_match(&token.text)
        && !token.text.chars().all(|c| c.is_ascii_digit());

    crc || KEYWORDS.contains(&lower.as_str()) || RESOLUTION.is_match(&token.text)
}

fn number_of(text: &str) -> Option<String> {
    NUMBER_TOKEN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn looks_like_year(number: &str) -> bool {
    number.len() == 4
        && number
            .parse::<u16>()
            .map(|y| (1900..=2099).contains(&y))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(name: &str) -> Option<String> {
        TokenExtractor::new().extract_episode_number(name)
    }

    #[test]
    fn test_dash_separated() {
        assert_eq!(
            extract("[SubsPlease] Jujutsu Kaisen - 24 (1080p) [A1B2C3D4].mkv"),
            Some("24".to_string())
        );
        assert_eq!(
            extract("[Group] Show S2 - 05v2 [1080p].mkv"),
            Some("05".to_string())
        );
    }

    #[test]
    fn test_prefixed() {
        assert_eq!(extract("Show.E07.1080p.WEB-DL.mkv"), Some("07".to_string()));
        assert_eq!(extract("Show EP 11 [720p].mp4"), Some("11".to_string()));
    }

    #[test]
    fn test_chinese() {
        assert_eq!(extract("[字幕组] 某动画 第12话 [GB].mp4"), Some("12".to_string()));
    }

    #[test]
    fn test_bracketed_and_fractional() {
        assert_eq!(extract("[Group] Show [12][1080p].mkv"), Some("12".to_string()));
        assert_eq!(extract("[Group] Show [12.5][1080p].mkv"), Some("12.5".to_string()));
    }

    #[test]
    fn test_no_number() {
        assert_eq!(extract("Show 2019.mkv"), None);
        assert_eq!(extract("Show.mkv"), None);
    }

    #[test]
    fn test_tokenize_marks_enclosed() {
        let tokens = tokenize("[Group] Show - 01");
        assert_eq!(
            tokens,
            vec![
                Token { text: "Group".to_string(), enclosed: true },
                Token { text: "Show".to_string(), enclosed: false },
                Token { text: "-".to_string(), enclosed: false },
                Token { text: "01".to_string(), enclosed: false },
            ]
        );
    }
}
