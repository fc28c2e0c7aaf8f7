use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

/// Read the documentation file, creating it with `default` first if it does not exist.
pub fn load_or_create_document(path: &Path, default: &str) -> anyhow::Result<String> {
    if !path.exists() {
        info!("{} not found. Creating a basic one.", path.display());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, default)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Replace the document's content in a single step.
pub fn write_document(path: &Path, text: &str) -> anyhow::Result<()> {
    let temp_path = temp_path_for(path);

    // Write to temp file first, then rename for atomicity
    fs::write(&temp_path, text)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    info!("Updated {}.", path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
