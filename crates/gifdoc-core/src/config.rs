use std::path::{Path, PathBuf};

/// Fixed encoder parameters passed to ffmpeg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Executable name or path
    pub program: String,
    /// Output frame rate
    pub fps: u32,
    /// Output width in pixels (height keeps the aspect ratio)
    pub width: u32,
    /// Resampling algorithm for the scale filter
    pub scaler: String,
    /// Output video codec
    pub codec: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            fps: 10,
            width: 640,
            scaler: "lanczos".to_string(),
            codec: "gif".to_string(),
        }
    }
}

impl EncoderSettings {
    /// The `-vf` filter expression, e.g. `fps=10,scale=640:-1:flags=lanczos`
    pub fn filter(&self) -> String {
        format!("fps={},scale={}:-1:flags={}", self.fps, self.width, self.scaler)
    }
}

/// Directory layout and encoder settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory that the relative paths below resolve against
    pub root: PathBuf,
    /// Source videos, relative to `root`
    pub video_dir: PathBuf,
    /// Generated GIFs, relative to `root`
    pub gif_dir: PathBuf,
    /// Documentation file, relative to `root`
    pub readme: PathBuf,
    /// Accepted source extensions (lowercase, without the dot)
    pub extensions: Vec<String>,
    /// Content used to create the documentation file when it is missing
    pub default_document: String,
    pub encoder: EncoderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            video_dir: PathBuf::from("media/videos"),
            gif_dir: PathBuf::from("media/gifs"),
            readme: PathBuf::from("README.md"),
            extensions: ["mp4", "mov", "avi", "mkv"].iter().map(|s| s.to_string()).collect(),
            default_document: "# Project Documentation\n\n".to_string(),
            encoder: EncoderSettings::default(),
        }
    }
}

impl Config {
    /// Default layout rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn video_path(&self) -> PathBuf {
        self.root.join(&self.video_dir)
    }

    pub fn gif_path(&self) -> PathBuf {
        self.root.join(&self.gif_dir)
    }

    pub fn readme_path(&self) -> PathBuf {
        self.root.join(&self.readme)
    }

    /// GIF directory as written inside document links (always `/`-separated).
    pub fn link_dir(&self) -> String {
        to_link_path(&self.gif_dir)
    }
}

fn to_link_path(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    s.trim_end_matches('/').to_string()
}
