use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::config::Config;
use crate::media;

/// A source video found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceVideo {
    pub filename: String,
    pub path: PathBuf,
}

/// Create the video and GIF directories if they are missing.
pub fn ensure_dirs(config: &Config) -> anyhow::Result<()> {
    for dir in [config.video_path(), config.gif_path()] {
        if !dir.exists() {
            info!("Creating {}...", dir.display());
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }
    Ok(())
}

/// List video files in `dir`, sorted by name. A missing directory yields an empty list.
pub fn scan_videos(dir: &Path, extensions: &[String]) -> anyhow::Result<Vec<SourceVideo>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut videos = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if media::is_video(filename, extensions) {
            videos.push(SourceVideo {
                filename: filename.to_string(),
                path: path.clone(),
            });
        }
    }

    videos.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(videos)
}
