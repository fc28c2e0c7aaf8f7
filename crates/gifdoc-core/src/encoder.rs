use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EncoderSettings;

#[derive(Debug, Error)]
pub enum ProduceError {
    /// The encoder executable could not be located; the run cannot continue.
    #[error("{program} not found. Please ensure {program} is installed and in your PATH.")]
    ToolNotFound { program: String },
    /// The encoder ran but exited unsuccessfully.
    #[error("Error converting video ({status}): {stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error("Failed to run encoder: {0}")]
    Io(#[from] io::Error),
}

impl ProduceError {
    /// Whether this error should abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProduceError::ToolNotFound { .. })
    }
}

/// Turns a source video into a GIF at `target`.
pub trait ArtifactProducer {
    fn produce(&self, source: &Path, target: &Path) -> Result<(), ProduceError>;
}

/// Shells out to ffmpeg with a fixed filter chain.
#[derive(Debug, Clone, Default)]
pub struct FfmpegProducer {
    settings: EncoderSettings,
}

impl FfmpegProducer {
    pub fn new(settings: EncoderSettings) -> Self {
        Self { settings }
    }

    /// `-y -i <source> -vf fps=..,scale=..:-1:flags=.. -c:v <codec> <target>`
    pub fn args(&self, source: &Path, target: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            source.as_os_str().to_owned(),
            "-vf".into(),
            self.settings.filter().into(),
            "-c:v".into(),
            self.settings.codec.clone().into(),
            target.as_os_str().to_owned(),
        ]
    }
}

impl ArtifactProducer for FfmpegProducer {
    fn produce(&self, source: &Path, target: &Path) -> Result<(), ProduceError> {
        info!("Converting {} to {}...", source.display(), target.display());
        let args = self.args(source, target);
        debug!("{} {:?}", self.settings.program, args);

        // Output is captured so the console only shows encoder noise on failure
        let output = Command::new(&self.settings.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ProduceError::ToolNotFound {
                    program: self.settings.program.clone(),
                },
                _ => ProduceError::Io(e),
            })?;

        if !output.status.success() {
            discard_partial(target);
            return Err(ProduceError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Conversion successful.");
        Ok(())
    }
}

/// On-disk predicate: the GIF for this video has already been generated.
pub fn artifact_exists(path: &Path) -> bool {
    path.is_file()
}

/// Remove whatever a failed conversion left at `target`.
pub fn discard_partial(target: &Path) {
    match fs::remove_file(target) {
        Ok(()) => debug!("Removed partial output {}", target.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial output {}: {}", target.display(), e),
    }
}
