/// Corpus preparation — collects text sources, normalizes them, and joins
/// them into the single character sequence the trainer consumes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::model::SENTINEL;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus directory does not exist: {0}")]
    MissingDir(PathBuf),
    #[error("corpus path does not exist: {0}")]
    MissingPath(PathBuf),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-source text cleanup applied before concatenation.
///
/// The sentinel padding character is always removed, whatever the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalizer {
    pub lowercase: bool,
    pub strip_punctuation: bool,
    /// Replace each whitespace run with one space and trim the ends.
    pub collapse_whitespace: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_punctuation: true,
            collapse_whitespace: true,
        }
    }
}

impl Normalizer {
    /// Keep text as-is apart from removing the sentinel.
    pub fn raw() -> Self {
        Self {
            lowercase: false,
            strip_punctuation: false,
            collapse_whitespace: false,
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut pending_space = false;

        for c in text.chars() {
            if c == SENTINEL || (self.strip_punctuation && c.is_ascii_punctuation()) {
                continue;
            }

            if self.collapse_whitespace && c.is_whitespace() {
                pending_space = !out.is_empty();
                continue;
            }
            if pending_space {
                out.push(' ');
                pending_space = false;
            }

            if self.lowercase {
                out.extend(c.to_lowercase());
            } else {
                out.push(c);
            }
        }

        out
    }
}

/// Accumulates normalized text sources for one training run.
///
/// Each source is normalized on its own; [`build`](Self::build) joins the
/// non-empty ones with a single space.
#[derive(Debug, Clone, Default)]
pub struct CorpusBuilder {
    normalizer: Normalizer,
    sources: Vec<String>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            sources: Vec::new(),
        }
    }

    /// Number of sources added so far.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn add_text(&mut self, text: &str) -> &mut Self {
        self.sources.push(self.normalizer.normalize(text));
        self
    }

    pub fn add_file(&mut self, path: &Path) -> Result<&mut Self, CorpusError> {
        let text = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "added corpus file");
        Ok(self.add_text(&text))
    }

    /// Add every file under `dir` (recursively) whose extension matches.
    ///
    /// Files are visited in sorted path order. Symlinked directories are
    /// not descended into. `extension` may be given with or without its
    /// leading dot. Returns how many files were added.
    pub fn add_dir(&mut self, dir: &Path, extension: &str) -> Result<usize, CorpusError> {
        if !dir.is_dir() {
            return Err(CorpusError::MissingDir(dir.to_path_buf()));
        }
        let extension = extension.trim_start_matches('.');

        let mut files = Vec::new();
        collect_files(dir, extension, &mut files)?;
        files.sort();

        for file in &files {
            self.add_file(file)?;
        }

        tracing::debug!(dir = %dir.display(), files = files.len(), "scanned corpus directory");
        Ok(files.len())
    }

    /// Add a file or a directory, whichever `path` is.
    pub fn add_path(&mut self, path: &Path, extension: &str) -> Result<usize, CorpusError> {
        if path.is_dir() {
            self.add_dir(path, extension)
        } else if path.is_file() {
            self.add_file(path)?;
            Ok(1)
        } else {
            Err(CorpusError::MissingPath(path.to_path_buf()))
        }
    }

    /// Concatenate all sources into one training string.
    pub fn build(&self) -> String {
        self.sources
            .iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<(), CorpusError> {
    let io_err = |source| CorpusError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        // file_type does not follow symlinks, so a link back up the tree
        // cannot send the scan round in circles
        if entry.file_type().map_err(io_err)?.is_dir() {
            collect_files(&path, extension, out)?;
        } else if path.extension().is_some_and(|ext| ext == extension) {
            out.push(path);
        }
    }
    Ok(())
}
