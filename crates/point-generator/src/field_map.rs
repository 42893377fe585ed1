//! Field-map files.
//!
//! A field map associates a series-key prefix (the text before the first
//! comma of a series key) with a field descriptor. On disk it is one entry
//! per line, prefix and descriptor separated by the first space:
//!
//! ```text
//! cpu usage=0.5,count=0i
//! mem free=1024i
//! ```

use crate::error::GeneratorError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// What to do when a prefix appears on more than one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePrefixPolicy {
    /// The later line replaces the earlier one.
    #[default]
    LastWins,
    /// Loading fails.
    Reject,
}

/// Prefix → field descriptor mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: HashMap<String, String>,
}

impl FieldMap {
    /// Load a field map from a file.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        policy: DuplicatePrefixPolicy,
    ) -> Result<Self, GeneratorError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;
        Self::parse(&content, policy)
    }

    /// Parse field-map text. Blank lines are ignored.
    pub fn parse(content: &str, policy: DuplicatePrefixPolicy) -> Result<Self, GeneratorError> {
        let mut map = Self::default();

        for (idx, line) in content.lines().enumerate() {
            let line_number = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let (prefix, descriptor) = line.split_once(' ').ok_or_else(|| {
                GeneratorError::MalformedFieldMap {
                    line: line_number,
                    content: line.to_string(),
                }
            })?;

            if let Some(previous) = map.entries.get(prefix) {
                match policy {
                    DuplicatePrefixPolicy::Reject => {
                        return Err(GeneratorError::DuplicatePrefix {
                            prefix: prefix.to_string(),
                            line: line_number,
                        });
                    }
                    DuplicatePrefixPolicy::LastWins => {
                        warn!(
                            "Field map prefix '{}' redefined on line {} (was '{}')",
                            prefix, line_number, previous
                        );
                    }
                }
            }

            map.entries.insert(prefix.to_string(), descriptor.to_string());
        }

        Ok(map)
    }

    /// Descriptor mapped to `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(String::as_str)
    }

    /// Prefix and descriptor, both borrowed from the map.
    pub fn get_key_value(&self, prefix: &str) -> Option<(&str, &str)> {
        self.entries
            .get_key_value(prefix)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Descriptor for a full series key, resolved by its prefix.
    pub fn lookup(&self, series_key: &str) -> Option<&str> {
        self.get(series_prefix(series_key))
    }

    pub fn insert(&mut self, prefix: impl Into<String>, descriptor: impl Into<String>) {
        self.entries.insert(prefix.into(), descriptor.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The text of a series key before its first comma (the whole key if it has
/// no comma).
pub fn series_prefix(series_key: &str) -> &str {
    series_key
        .split_once(',')
        .map_or(series_key, |(prefix, _)| prefix)
}
