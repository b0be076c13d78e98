//! Topic registry: loading and validation of topic definitions.
//!
//! Topics are defined in a YAML mapping from topic id to a `{name,
//! description?, keywords}` entry:
//!
//! ```yaml
//! ai_finance:
//!   name: AI与金融
//!   description: 人工智能对金融行业的影响
//!   keywords:
//!     - AI
//!     - finance
//! ```
//!
//! The topic id doubles as the storage directory name, so it is restricted
//! to letters, digits and underscores. A topic with an empty keyword list is
//! accepted and simply never matches anything.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors produced while loading the topic configuration.
///
/// All variants are fatal: the run aborts before any timeline is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("topic config not found at {path}")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read topic config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a mapping of topic entries.
    #[error("topic config {path} is not a valid topic mapping: {source}")]
    Invalid {
        /// Path that was being parsed.
        path: String,
        /// Underlying YAML error (names the offending entry/field).
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// A topic id contains characters that cannot form a directory name.
    #[error("topic id '{id}' contains characters outside letters/digits/underscore")]
    InvalidId {
        /// The offending topic id.
        id: String,
    },

    /// A topic entry has an empty display name.
    #[error("topic '{id}' has an empty display name")]
    EmptyName {
        /// The topic whose name is blank.
        id: String,
    },
}

/// Raw YAML shape of one topic entry. Unknown fields (e.g. `priority`) are
/// accepted and ignored.
#[derive(Debug, Deserialize)]
struct TopicSpec {
    name: String,
    #[serde(default)]
    description: Option<String>,
    keywords: Vec<String>,
}

/// A named, user-defined interest area with an identifying keyword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// Short identifier; unique across the registry, used as directory name.
    pub id: String,
    /// Human-readable display name, used as the timeline's top heading.
    pub label: String,
    /// Optional free-text description (not used by matching).
    pub description: Option<String>,
    /// Keywords tested against record text. May be empty (matches nothing).
    pub keywords: Vec<String>,
}

/// Validated set of topic definitions, ordered by topic id.
#[derive(Debug, Clone, Default)]
pub struct TopicRegistry {
    topics: Vec<Topic>,
}

impl TopicRegistry {
    /// Loads and validates the topic configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, unreadable, not a
    /// mapping, or contains a structurally invalid topic entry (missing
    /// `name`/`keywords`, bad id characters, blank name).
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        // A BTreeMap keys the registry by id, so ids are unique by
        // construction and iteration order is deterministic.
        let specs: BTreeMap<String, TopicSpec> =
            serde_yaml_ng::from_str(&raw).map_err(|source| ConfigError::Invalid {
                path: path.display().to_string(),
                source,
            })?;

        let mut topics = Vec::with_capacity(specs.len());
        for (id, spec) in specs {
            if !is_valid_topic_id(&id) {
                return Err(ConfigError::InvalidId { id });
            }
            let label = spec.name.trim();
            if label.is_empty() {
                return Err(ConfigError::EmptyName { id });
            }
            topics.push(Topic {
                id,
                label: label.to_string(),
                description: spec.description,
                keywords: spec.keywords,
            });
        }

        debug!(topics = topics.len(), "topic registry loaded");
        Ok(Self { topics })
    }

    /// Returns the topics in id order.
    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Looks up a topic by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Number of topics in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Returns `true` when no topics are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Returns `true` if `id` can safely be used as a topic directory name.
fn is_valid_topic_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
