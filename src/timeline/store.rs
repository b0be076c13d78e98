//! Timeline document storage with whole-file replace semantics.
//!
//! Each topic owns `<index_dir>/<topic_id>/timeline.md`. Writes go to a
//! `.tmp` sibling which is fsynced and renamed over the target, so an
//! interrupted run leaves either the old document or the new one on disk,
//! never a truncated mix.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

/// Errors reading or writing a timeline document.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// The document exists but could not be read.
    #[error("failed to read timeline {path}: {source}")]
    Read {
        /// Document path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be written (the prior version is untouched).
    #[error("failed to write timeline {path}: {source}")]
    Write {
        /// Document path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Maps topic ids to timeline files under one index directory.
#[derive(Debug, Clone)]
pub struct TimelineStore {
    index_dir: PathBuf,
}

impl TimelineStore {
    /// Creates a store rooted at `index_dir`.
    #[must_use]
    pub fn new(index_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_dir: index_dir.into(),
        }
    }

    /// The timeline path for a topic.
    #[must_use]
    pub fn timeline_path(&self, topic_id: &str) -> PathBuf {
        self.index_dir.join(topic_id).join("timeline.md")
    }

    /// Reads a topic's timeline; `None` when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Read`] for any failure other than the file
    /// being absent.
    pub fn read(&self, topic_id: &str) -> Result<Option<String>, TimelineError> {
        let path = self.timeline_path(topic_id);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(TimelineError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Replaces a topic's timeline with `content`, creating the topic
    /// directory on first write.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::Write`] on failure; the previous document,
    /// if any, is left untouched.
    #[instrument(skip(self, content), fields(topic = topic_id, bytes = content.len()))]
    pub fn write(&self, topic_id: &str, content: &str) -> Result<PathBuf, TimelineError> {
        let path = self.timeline_path(topic_id);
        let write_err = |source| TimelineError::Write {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let result = write_and_sync(&tmp, content).and_then(|()| fs::rename(&tmp, &path));
        if let Err(source) = result {
            // A leftover temp file must not block the next run.
            let _ = fs::remove_file(&tmp);
            return Err(write_err(source));
        }

        debug!(path = %path.display(), "timeline written");
        Ok(path)
    }
}

fn write_and_sync(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_timeline_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TimelineStore::new(tmp.path());
        assert!(store.read("ai_finance").unwrap().is_none());
    }

    #[test]
    fn test_write_creates_topic_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TimelineStore::new(tmp.path());

        let path = store.write("ai_finance", "# AI与金融\n").unwrap();
        assert_eq!(path, tmp.path().join("ai_finance").join("timeline.md"));
        assert_eq!(store.read("ai_finance").unwrap().unwrap(), "# AI与金融\n");
    }

    #[test]
    fn test_write_replaces_whole_document() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TimelineStore::new(tmp.path());

        store.write("t", "old content\n").unwrap();
        store.write("t", "new content\n").unwrap();
        assert_eq!(store.read("t").unwrap().unwrap(), "new content\n");
    }

    #[test]
    fn test_write_leaves_no_temp_file_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TimelineStore::new(tmp.path());
        store.write("t", "content\n").unwrap();

        let topic_dir = tmp.path().join("t");
        let leftovers: Vec<_> = fs::read_dir(&topic_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|name| name.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "leftovers: {leftovers:?}");
    }

    #[test]
    fn test_timeline_path_layout() {
        let store = TimelineStore::new("/data/index");
        assert_eq!(
            store.timeline_path("ai_finance"),
            PathBuf::from("/data/index/ai_finance/timeline.md")
        );
    }
}
