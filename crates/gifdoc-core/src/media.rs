use std::path::Path;

/// A generated GIF that should be referenced from the documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaArtifact {
    /// File name inside the GIF directory (unique within it)
    pub name: String,
    /// Human-readable label derived from the source filename
    pub title: String,
}

impl MediaArtifact {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }

    /// Build the artifact for a source video file name.
    pub fn for_video(video_filename: &str) -> Self {
        Self::new(gif_name_for(video_filename), title_from_filename(video_filename))
    }

    /// Path used inside the document, e.g. `media/gifs/demo.gif`
    pub fn link_path(&self, link_dir: &str) -> String {
        if link_dir.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", link_dir, self.name)
        }
    }
}

/// `clip.final.mp4` -> `clip.final.gif`
pub fn gif_name_for(video_filename: &str) -> String {
    let stem = Path::new(video_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(video_filename);
    format!("{}.gif", stem)
}

/// Turn a snake_case / kebab-case filename into a Title Case label.
///
/// Letters are uppercased when they follow a non-letter and lowercased
/// otherwise, so `login_flow-demo.mp4` becomes `Login Flow Demo`.
pub fn title_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let mut title = String::with_capacity(stem.len());
    let mut prev_is_letter = false;
    for c in stem.chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            title.push(c);
            prev_is_letter = false;
        }
    }
    title
}

/// Case-insensitive extension check against the allow-list.
pub fn is_video(filename: &str, extensions: &[String]) -> bool {
    let lower = filename.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext.to_lowercase())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        ["mp4", "mov", "avi", "mkv"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_title_from_filename() {
        assert_eq!(title_from_filename("login_flow-demo.mp4"), "Login Flow Demo");
        assert_eq!(title_from_filename("SIGNUP.mov"), "Signup");
        assert_eq!(title_from_filename("step2finish.mkv"), "Step2Finish");
        assert_eq!(title_from_filename("plain"), "Plain");
    }

    #[test]
    fn test_gif_name_for() {
        assert_eq!(gif_name_for("demo.mp4"), "demo.gif");
        assert_eq!(gif_name_for("clip.final.MOV"), "clip.final.gif");
    }

    #[test]
    fn test_is_video() {
        assert!(is_video("demo.mp4", &exts()));
        assert!(is_video("DEMO.MKV", &exts()));
        assert!(is_video("a.b.avi", &exts()));
        assert!(!is_video("notes.txt", &exts()));
        assert!(!is_video("mp4", &exts()));
    }

    #[test]
    fn test_link_path() {
        let artifact = MediaArtifact::for_video("login_flow.mp4");
        assert_eq!(artifact.name, "login_flow.gif");
        assert_eq!(artifact.title, "Login Flow");
        assert_eq!(artifact.link_path("media/gifs"), "media/gifs/login_flow.gif");
        assert_eq!(artifact.link_path(""), "login_flow.gif");
    }
}
