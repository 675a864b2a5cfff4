//! File system utilities.

use crate::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check if a file is a video file based on extension.
pub fn is_video_file(path: &Path) -> bool {
    const VIDEO_EXTENSIONS: &[&str] = &[
        "mkv", "mp4", "avi", "mov", "wmv", "m4v", "ts", "m2ts", "flv", "webm", "mpg", "mpeg",
        "rmvb",
    ];

    get_extension(path)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check if a path contains "sample" (case insensitive).
pub fn is_sample(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().contains("sample")
}

/// Collect video files below `root`, skipping samples. Sorted by path.
pub fn collect_video_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(crate::Error::PathNotFound(root.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_file() && is_video_file(path) && !is_sample(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
