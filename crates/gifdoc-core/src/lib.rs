pub mod config;
pub mod encoder;
pub mod media;
pub mod readme;
pub mod scan;
pub mod writer;

use tracing::{info, warn};

pub use config::{Config, EncoderSettings};
pub use encoder::{artifact_exists, ArtifactProducer, FfmpegProducer, ProduceError};
pub use media::MediaArtifact;
pub use readme::{InsertionPlan, ReadmeUpdater, UpdateReport};

/// Counters for one scan-convert-update run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub videos_found: u64,
    pub converted: u64,
    pub already_present: u64,
    pub failed: u64,
    pub references_added: u64,
    pub references_skipped: u64,
    pub document_written: bool,
}

/// Type alias for progress callback (`current` is 0-based, always `< total`)
pub type ProgressCallback<'a> = dyn Fn(&str, u64, u64, &str) + 'a;

/// Convert every video without a GIF, then reference all GIFs from the README.
///
/// Only a missing encoder (`ProduceError::ToolNotFound`) aborts the run; a
/// failed conversion skips that video.
pub fn process(
    config: &Config,
    producer: &dyn ArtifactProducer,
    progress_callback: &ProgressCallback<'_>,
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();

    scan::ensure_dirs(config)?;

    let video_dir = config.video_path();
    let videos = scan::scan_videos(&video_dir, &config.extensions)?;
    summary.videos_found = videos.len() as u64;

    if videos.is_empty() {
        info!("No videos found in {}. Please add some video files.", video_dir.display());
        return Ok(summary);
    }

    // Stage 1: Convert
    let gif_dir = config.gif_path();
    let total = videos.len() as u64;
    let mut artifacts: Vec<MediaArtifact> = Vec::with_capacity(videos.len());

    for (i, video) in videos.iter().enumerate() {
        progress_callback("convert", i as u64, total, &video.filename);

        let artifact = MediaArtifact::for_video(&video.filename);
        let gif_path = gif_dir.join(&artifact.name);

        if artifact_exists(&gif_path) {
            info!("GIF already exists: {}", artifact.name);
            summary.already_present += 1;
            artifacts.push(artifact);
            continue;
        }

        match producer.produce(&video.path, &gif_path) {
            Ok(()) => {
                summary.converted += 1;
                artifacts.push(artifact);
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!("Skipping {}: {}", video.filename, e);
                encoder::discard_partial(&gif_path);
                summary.failed += 1;
            }
        }
    }

    if artifacts.is_empty() {
        info!("No GIFs to document");
        return Ok(summary);
    }

    // Stage 2: Update README
    let readme_path = config.readme_path();
    let text = writer::load_or_create_document(&readme_path, &config.default_document)?;

    let report = ReadmeUpdater::new(config.link_dir()).update(&text, &artifacts);
    summary.references_added = report.placements.len() as u64;
    summary.references_skipped = report.skipped.len() as u64;

    if report.changed() {
        writer::write_document(&readme_path, &report.text)?;
        summary.document_written = true;
        progress_callback("document", 0, 1, "README updated");
    } else {
        progress_callback("document", 0, 1, "README already up to date");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    /// Writes a placeholder GIF, or fails for sources listed in `fail`.
    /// Failing sources still leave a truncated GIF behind when `leave_partial` is set.
    struct FakeProducer {
        fail: Vec<&'static str>,
        leave_partial: bool,
        missing_tool: bool,
        calls: RefCell<Vec<PathBuf>>,
    }

    impl FakeProducer {
        fn new() -> Self {
            Self {
                fail: Vec::new(),
                leave_partial: false,
                missing_tool: false,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ArtifactProducer for FakeProducer {
        fn produce(&self, source: &Path, target: &Path) -> Result<(), ProduceError> {
            self.calls.borrow_mut().push(source.to_path_buf());
            if self.missing_tool {
                return Err(ProduceError::ToolNotFound {
                    program: "ffmpeg".to_string(),
                });
            }
            let name = source.file_name().unwrap().to_str().unwrap();
            if self.fail.iter().any(|f| *f == name) {
                if self.leave_partial {
                    fs::write(target, b"GIF89a-partial")?;
                }
                return Err(ProduceError::Io(std::io::Error::other("boom")));
            }
            fs::write(target, b"GIF89a")?;
            Ok(())
        }
    }

    fn setup(videos: &[&str]) -> (tempfile::TempDir, Config) {
        let dir = tempdir().unwrap();
        let config = Config::with_root(dir.path());
        scan::ensure_dirs(&config).unwrap();
        for v in videos {
            fs::write(config.video_path().join(v), b"video").unwrap();
        }
        (dir, config)
    }

    fn no_progress(_: &str, _: u64, _: u64, _: &str) {}

    #[test]
    fn test_no_videos_ends_early() {
        let dir = tempdir().unwrap();
        let config = Config::with_root(dir.path());
        let producer = FakeProducer::new();

        let summary = process(&config, &producer, &no_progress).unwrap();
        assert_eq!(summary, RunSummary::default());
        assert!(config.video_path().is_dir());
        assert!(config.gif_path().is_dir());
        assert!(!config.readme_path().exists());
    }

    #[test]
    fn test_full_run_creates_readme() {
        let (_dir, config) = setup(&["login_flow.mp4", "signup.mov"]);
        let producer = FakeProducer::new();

        let summary = process(&config, &producer, &no_progress).unwrap();
        assert_eq!(summary.videos_found, 2);
        assert_eq!(summary.converted, 2);
        assert_eq!(summary.references_added, 2);
        assert!(summary.document_written);
        assert!(config.gif_path().join("login_flow.gif").exists());

        let readme = fs::read_to_string(config.readme_path()).unwrap();
        assert!(readme.starts_with("# Project Documentation\n"));
        assert!(readme.contains("### Login Flow\n\n![Login Flow](media/gifs/login_flow.gif)"));
        assert!(readme.contains("### Signup\n\n![Signup](media/gifs/signup.gif)"));
    }

    #[test]
    fn test_existing_gif_is_documented_without_conversion() {
        let (_dir, config) = setup(&["demo.mp4"]);
        fs::write(config.gif_path().join("demo.gif"), b"GIF89a").unwrap();
        fs::write(config.readme_path(), "# Demo\n\nText.\n").unwrap();
        let producer = FakeProducer::new();

        let summary = process(&config, &producer, &no_progress).unwrap();
        assert!(producer.calls.borrow().is_empty());
        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.references_added, 1);

        let readme = fs::read_to_string(config.readme_path()).unwrap();
        assert_eq!(readme, "# Demo\n\n\n![Demo](media/gifs/demo.gif)\n\nText.\n");
    }

    #[test]
    fn test_failed_conversion_is_skipped() {
        let (_dir, config) = setup(&["bad.mp4", "good.mp4"]);
        let mut producer = FakeProducer::new();
        producer.fail = vec!["bad.mp4"];

        let summary = process(&config, &producer, &no_progress).unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.converted, 1);

        let readme = fs::read_to_string(config.readme_path()).unwrap();
        assert!(readme.contains("(media/gifs/good.gif)"));
        assert!(!readme.contains("bad.gif"));
    }

    #[test]
    fn test_missing_tool_aborts_run() {
        let (_dir, config) = setup(&["a.mp4", "b.mp4"]);
        let mut producer = FakeProducer::new();
        producer.missing_tool = true;

        let err = process(&config, &producer, &no_progress).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProduceError>(),
            Some(ProduceError::ToolNotFound { .. })
        ));
        assert_eq!(producer.calls.borrow().len(), 1);
        assert!(!config.readme_path().exists());
    }

    #[test]
    fn test_second_run_leaves_readme_untouched() {
        let (_dir, config) = setup(&["intro.mp4"]);
        let producer = FakeProducer::new();

        process(&config, &producer, &no_progress).unwrap();
        let first = fs::read_to_string(config.readme_path()).unwrap();

        let summary = process(&config, &producer, &no_progress).unwrap();
        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.references_skipped, 1);
        assert!(!summary.document_written);
        assert_eq!(fs::read_to_string(config.readme_path()).unwrap(), first);
    }

    #[test]
    fn test_progress_reports_each_video() {
        let (_dir, config) = setup(&["one.mp4", "two.mp4"]);
        let producer = FakeProducer::new();
        let seen = RefCell::new(Vec::new());

        process(&config, &producer, &|stage: &str, current: u64, total: u64, message: &str| {
            seen.borrow_mut()
                .push(format!("{} {}/{} {}", stage, current, total, message));
        })
        .unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen[0], "convert 0/2 one.mp4");
        assert_eq!(seen[1], "convert 1/2 two.mp4");
        assert_eq!(seen.last().unwrap(), "document 0/1 README updated");
        assert!(seen.iter().all(|line| {
            let counts = line.split(' ').nth(1).unwrap();
            let (current, total) = counts.split_once('/').unwrap();
            current.parse::<u64>().unwrap() < total.parse::<u64>().unwrap()
        }));
    }

    #[test]
    fn test_partial_output_of_failed_conversion_is_not_documented() {
        let (_dir, config) = setup(&["broken.mp4"]);
        let mut producer = FakeProducer::new();
        producer.fail = vec!["broken.mp4"];
        producer.leave_partial = true;

        let first = process(&config, &producer, &no_progress).unwrap();
        assert_eq!(first.failed, 1);
        assert!(!config.gif_path().join("broken.gif").exists());

        let second = process(&config, &producer, &no_progress).unwrap();
        assert_eq!(second.already_present, 0);
        assert_eq!(second.failed, 1);
        assert!(!config.readme_path().exists());
    }
}
