//! Trend record source: per-day SQLite databases produced by the crawler.
//!
//! The crawler writes one database file per calendar day, named
//! `YYYY-MM-DD.db`, containing a `news_items` table joined to `platforms`
//! for the source name. This module reads every day file in a directory,
//! newest first, and yields immutable [`TrendRecord`]s.
//!
//! The directory itself being missing (or holding no `*.db` files) is fatal
//! for the run; a single unreadable day file is not fatal. It is skipped,
//! recorded in the batch, and reported at the end of the run.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sqlx::Row;
use sqlx::sqlite::SqlitePoolOptions;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that make the whole trend source unusable.
///
/// These abort the run before any timeline is written.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source directory does not exist.
    #[error("trend source directory not found: {path}")]
    MissingDir {
        /// Directory that was looked up.
        path: String,
    },

    /// The source directory holds no day databases at all.
    #[error("no trend databases (*.db) found in {path}")]
    Empty {
        /// Directory that was scanned.
        path: String,
    },

    /// The source directory could not be scanned.
    #[error("failed to scan trend source directory {path}: {source}")]
    Scan {
        /// Directory that was being scanned.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// One crawled item from the upstream data source.
///
/// Records are immutable once read; the core only classifies and renders
/// them. The `url` is the dedup identity when present; crawler rows may
/// carry no url, in which case the record can never be deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRecord {
    /// Item headline.
    pub title: String,
    /// Dedup identity, treated as an opaque string. `None` for rows the
    /// crawler stored without a link.
    pub url: Option<String>,
    /// Display name of the originating platform.
    pub source: String,
    /// Calendar date of the day file the record came from.
    pub date: NaiveDate,
    /// Optional summary text (present for feed-style sources).
    pub summary: Option<String>,
}

impl TrendRecord {
    /// Text the matcher searches: title, plus summary when present.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        match &self.summary {
            Some(summary) => format!("{} {}", self.title, summary),
            None => self.title.clone(),
        }
    }
}

/// A source unit that could not be read and was skipped.
#[derive(Debug, Clone)]
pub struct SkippedUnit {
    /// The day file that was skipped.
    pub path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// Everything one `read_all` pass produced: records plus skipped units.
#[derive(Debug, Default)]
pub struct SourceBatch {
    /// Records from every readable day file, newest file first.
    pub records: Vec<TrendRecord>,
    /// Day files that were skipped, in scan order.
    pub skipped: Vec<SkippedUnit>,
}

/// Read-only reader over a directory of per-day trend databases.
#[derive(Debug, Clone)]
pub struct TrendSource {
    dir: PathBuf,
}

impl TrendSource {
    /// Creates a reader over `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads every day database under the source directory, newest first.
    ///
    /// Unreadable files and files whose stem is not a `YYYY-MM-DD` date are
    /// skipped and recorded in the returned batch.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the directory is missing, unscannable,
    /// or contains no `*.db` files at all.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub async fn read_all(&self) -> Result<SourceBatch, SourceError> {
        if !self.dir.exists() {
            return Err(SourceError::MissingDir {
                path: self.dir.display().to_string(),
            });
        }

        let mut day_files = self.day_files()?;
        if day_files.is_empty() {
            return Err(SourceError::Empty {
                path: self.dir.display().to_string(),
            });
        }
        // Newest day first, matching the recency order of the output.
        day_files.sort();
        day_files.reverse();

        let mut batch = SourceBatch::default();
        for path in day_files {
            let Some(date) = date_from_stem(&path) else {
                warn!(path = %path.display(), "skipping database with non-date file name");
                batch.skipped.push(SkippedUnit {
                    path,
                    reason: "file name is not a YYYY-MM-DD date".to_string(),
                });
                continue;
            };

            match read_day_file(&path, date).await {
                Ok(mut records) => {
                    debug!(path = %path.display(), rows = records.len(), "day file read");
                    batch.records.append(&mut records);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable trend database");
                    batch.skipped.push(SkippedUnit {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(batch)
    }

    fn day_files(&self) -> Result<Vec<PathBuf>, SourceError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| SourceError::Scan {
            path: self.dir.display().to_string(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SourceError::Scan {
                path: self.dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "db") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

/// Parses the `YYYY-MM-DD` file stem into a date.
fn date_from_stem(path: &Path) -> Option<NaiveDate> {
    let stem = path.file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}

/// Reads all news rows from one day file.
async fn read_day_file(path: &Path, date: NaiveDate) -> Result<Vec<TrendRecord>, sqlx::Error> {
    let db_url = format!("sqlite:{}?mode=ro", path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await?;

    let result = read_day_rows(&pool, date).await;
    pool.close().await;
    result
}

async fn read_day_rows(
    pool: &sqlx::SqlitePool,
    date: NaiveDate,
) -> Result<Vec<TrendRecord>, sqlx::Error> {
    // Older crawler schemas carry no summary column.
    let has_summary = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM pragma_table_info('news_items') WHERE name = 'summary'",
    )
    .fetch_one(pool)
    .await?
        > 0;

    let summary_column = if has_summary {
        "ni.summary"
    } else {
        "NULL AS summary"
    };
    let rows = sqlx::query(&format!(
        "SELECT ni.title, ni.url, p.name AS source, {summary_column} \
         FROM news_items ni \
         JOIN platforms p ON ni.platform_id = p.id \
         ORDER BY ni.first_crawl_time DESC"
    ))
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        records.push(TrendRecord {
            title: row.try_get("title")?,
            url: row
                .try_get::<Option<String>, _>("url")?
                .filter(|u| !u.is_empty()),
            source: row.try_get("source")?,
            date,
            summary: row
                .try_get::<Option<String>, _>("summary")?
                .filter(|s| !s.is_empty()),
        });
    }
    Ok(records)
}
