use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::media::MediaArtifact;

/// A line starting with one or more `#` after optional indentation.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#+(.*)$").unwrap());

/// Best-scoring header for one artifact title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch {
    /// Line index of the header in the working copy
    pub line: usize,
    /// Number of title terms found in the header text
    pub score: usize,
}

/// Where a reference ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionPlan {
    /// Inserted at line `at`, inside the section of the header at line `header`
    AfterHeader { header: usize, at: usize },
    /// Appended as a new `###` section at the end of the document
    AppendSection,
}

/// One inserted reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Artifact file name
    pub artifact: String,
    pub plan: InsertionPlan,
}

/// Outcome of one update call.
#[derive(Debug, Clone)]
pub struct UpdateReport {
    /// Full document text after all insertions
    pub text: String,
    /// One entry per inserted reference, in processing order
    pub placements: Vec<Placement>,
    /// Artifacts whose reference was already present
    pub skipped: Vec<String>,
}

impl UpdateReport {
    /// Whether at least one reference was inserted.
    pub fn changed(&self) -> bool {
        !self.placements.is_empty()
    }
}

/// Inserts `![title](dir/name)` references under the best matching headers.
#[derive(Debug, Clone)]
pub struct ReadmeUpdater {
    link_dir: String,
}

impl ReadmeUpdater {
    /// `link_dir` is the GIF directory as it appears in document links.
    pub fn new(link_dir: impl Into<String>) -> Self {
        Self {
            link_dir: link_dir.into(),
        }
    }

    /// Canonical reference substring, e.g. `(media/gifs/demo.gif)`
    pub fn reference_for(&self, artifact: &MediaArtifact) -> String {
        format!("({})", artifact.link_path(&self.link_dir))
    }

    /// Markdown image line for an artifact.
    pub fn image_line(&self, artifact: &MediaArtifact) -> String {
        format!("![{}]({})", artifact.title, artifact.link_path(&self.link_dir))
    }

    /// Add a reference for every artifact not yet mentioned in `text`.
    pub fn update(&self, text: &str, artifacts: &[MediaArtifact]) -> UpdateReport {
        if artifacts.is_empty() {
            debug!("No artifacts to document");
            return UpdateReport {
                text: text.to_string(),
                placements: Vec::new(),
                skipped: Vec::new(),
            };
        }

        let mut doc = WorkingCopy::parse(text);
        let mut placements = Vec::new();
        let mut skipped = Vec::new();

        for artifact in artifacts {
            // Checked against the working copy so repeats within one call are caught
            let reference = self.reference_for(artifact);
            if doc.contains(&reference) {
                info!("Skipping {}, already in README", artifact.name);
                skipped.push(artifact.name.clone());
                continue;
            }

            let terms = title_terms(&artifact.title);
            let image = self.image_line(artifact);

            let plan = match best_header(&doc.lines, &terms) {
                Some(m) => {
                    let at = doc.insert_under_header(m.line, vec![String::new(), image, String::new()]);
                    info!(
                        "Inserted {} under header at line {} (score {})",
                        artifact.name,
                        m.line + 1,
                        m.score
                    );
                    InsertionPlan::AfterHeader { header: m.line, at }
                }
                None => {
                    doc.append_section(format!("### {}", artifact.title), image);
                    info!("Appending {} to end of README", artifact.name);
                    InsertionPlan::AppendSection
                }
            };

            placements.push(Placement {
                artifact: artifact.name.clone(),
                plan,
            });
        }

        if placements.is_empty() {
            info!("No new GIFs to add to README");
        }

        UpdateReport {
            text: doc.into_text(),
            placements,
            skipped,
        }
    }
}

/// Substring predicate for "this artifact is already documented".
pub fn is_documented(text: &str, reference: &str) -> bool {
    text.contains(reference)
}

/// Lowercase whitespace-separated terms of a title, without repeats.
pub fn title_terms(title: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in title.to_lowercase().split_whitespace() {
        if !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}

/// Normalized header text (markers and whitespace stripped, lowercased),
/// or `None` if the line is not a header.
pub fn header_text(line: &str) -> Option<String> {
    HEADER_RE
        .captures(line)
        .map(|caps| caps[1].trim().to_lowercase())
}

/// Number of terms that occur as substrings of the header text.
pub fn score_header(header: &str, terms: &[String]) -> usize {
    terms.iter().filter(|t| header.contains(t.as_str())).count()
}

/// Highest-scoring header; the earliest one wins a tie. `None` if nothing scores above zero.
pub fn best_header(lines: &[String], terms: &[String]) -> Option<HeaderMatch> {
    let mut best: Option<HeaderMatch> = None;
    for (i, line) in lines.iter().enumerate() {
        let Some(header) = header_text(line) else {
            continue;
        };
        let score = score_header(&header, terms);
        if score > best.map_or(0, |b| b.score) {
            best = Some(HeaderMatch { line: i, score });
        }
    }
    best
}

/// Mutable line buffer for one update call.
///
/// `cursors` remembers, per header that already received an insertion, the
/// line just past the last inserted block so later references for the same
/// section land after earlier ones.
struct WorkingCopy {
    lines: Vec<String>,
    trailing_newline: bool,
    cursors: Vec<(usize, usize)>,
}

impl WorkingCopy {
    fn parse(text: &str) -> Self {
        let trailing_newline = text.is_empty() || text.ends_with('\n');
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            let body = text.strip_suffix('\n').unwrap_or(text);
            body.split('\n').map(str::to_string).collect()
        };
        Self {
            lines,
            trailing_newline,
            cursors: Vec::new(),
        }
    }

    fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| is_documented(line, needle))
    }

    /// Insert `block` into the section of `header`, returning the insertion index.
    fn insert_under_header(&mut self, header: usize, block: Vec<String>) -> usize {
        let at = match self.cursors.iter().find(|(h, _)| *h == header) {
            Some(&(_, next)) => next,
            None => {
                let mut at = header + 1;
                while at < self.lines.len() && self.lines[at].trim().is_empty() {
                    at += 1;
                }
                at
            }
        };
        let len = block.len();
        self.insert_lines(at, block);
        self.set_cursor(header, at + len);
        at
    }

    /// Append `header` and `image`, each preceded by a blank line.
    fn append_section(&mut self, header: String, image: String) {
        let mut block = Vec::with_capacity(4);
        if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
            block.push(String::new());
        }
        let header_at = self.lines.len() + block.len();
        block.extend([header, String::new(), image]);
        let end = self.lines.len() + block.len();
        self.lines.extend(block);
        self.set_cursor(header_at, end);
    }

    fn insert_lines(&mut self, at: usize, block: Vec<String>) {
        let len = block.len();
        self.lines.splice(at..at, block);
        for (header, next) in self.cursors.iter_mut() {
            if *header >= at {
                *header += len;
            }
            if *next > at {
                *next += len;
            }
        }
    }

    fn set_cursor(&mut self, header: usize, next: usize) {
        match self.cursors.iter_mut().find(|(h, _)| *h == header) {
            Some(entry) => entry.1 = next,
            None => self.cursors.push((header, next)),
        }
    }

    fn into_text(self) -> String {
        let mut text = self.lines.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }
}
