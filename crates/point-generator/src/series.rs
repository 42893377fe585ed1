//! Series-key expansion.
//!
//! A template such as `cpu,host=server` is expanded into `n` distinct series
//! keys by substituting a 0-based cardinality index:
//!
//! - `{index}` anywhere in the template is replaced by the index
//!   (`cpu,host=server-{index},dc=eu` → `cpu,host=server-0,dc=eu`, ...)
//! - otherwise `-<index>` is appended to the value of the last tag
//!   (`cpu,host=server` → `cpu,host=server-0`, `cpu,host=server-1`, ...)
//! - a template with no tags gets a trailing `series=<index>` tag
//!   (`cpu` → `cpu,series=0`, ...)

use crate::error::GeneratorError;
use tracing::debug;

/// Placeholder replaced by the series index.
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// Tag key added to templates that have no tags.
pub const SERIES_TAG: &str = "series";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Substitution {
    Placeholder,
    LastTagSuffix,
    SeriesTag,
}

/// A validated series-key template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesTemplate {
    template: String,
    substitution: Substitution,
}

impl SeriesTemplate {
    /// Validate a template of the form `measurement[,tag=value...]`.
    pub fn parse(template: &str) -> Result<Self, GeneratorError> {
        let invalid = |reason: &str| GeneratorError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        if template.is_empty() {
            return Err(invalid("template is empty"));
        }

        let mut segments = template.split(',');
        if segments.next().is_some_and(str::is_empty) {
            return Err(invalid("missing measurement name"));
        }

        let mut has_tags = false;
        for tag in segments {
            match tag.split_once('=') {
                Some((key, _)) if !key.is_empty() => has_tags = true,
                _ => {
                    return Err(invalid(&format!(
                        "tag '{tag}' is not of the form key=value"
                    )))
                }
            }
        }

        let substitution = if template.contains(INDEX_PLACEHOLDER) {
            Substitution::Placeholder
        } else if has_tags {
            Substitution::LastTagSuffix
        } else {
            Substitution::SeriesTag
        };

        Ok(Self {
            template: template.to_string(),
            substitution,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// The series key for one index.
    pub fn key(&self, index: usize) -> Vec<u8> {
        let key = match self.substitution {
            Substitution::Placeholder => self
                .template
                .replace(INDEX_PLACEHOLDER, &index.to_string()),
            Substitution::LastTagSuffix => format!("{}-{index}", self.template),
            Substitution::SeriesTag => format!("{},{SERIES_TAG}={index}", self.template),
        };
        key.into_bytes()
    }

    /// Lazily produce the keys for indices `0..count`.
    pub fn keys(&self, count: usize) -> SeriesKeys<'_> {
        SeriesKeys {
            template: self,
            next: 0,
            end: count,
        }
    }
}

/// Expand `template` into `series_n` distinct series keys.
///
/// Pure and deterministic: the same `(template, series_n)` always yields the
/// same keys in the same order.
pub fn expand(template: &str, series_n: usize) -> Result<Vec<Vec<u8>>, GeneratorError> {
    let template = SeriesTemplate::parse(template)?;
    debug!(
        "Expanding series key template '{}' to {} keys",
        template.as_str(),
        series_n
    );
    Ok(template.keys(series_n).collect())
}

/// Iterator over the keys of a [`SeriesTemplate`].
pub struct SeriesKeys<'a> {
    template: &'a SeriesTemplate,
    next: usize,
    end: usize,
}

impl Iterator for SeriesKeys<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }

        let key = self.template.key(self.next);
        self.next += 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SeriesKeys<'_> {}
