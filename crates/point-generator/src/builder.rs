//! Batch builders.
//!
//! Two pipelines produce a batch of [`Point`]s:
//!
//! - [`new_points`] expands a series-key template to `n` keys and gives every
//!   key the fields of one descriptor.
//! - [`new_points_from_path`] reads series keys from a file and resolves each
//!   key's descriptor through a field-map file.
//!
//! Every point receives freshly instantiated field storage, so updating one
//! point never affects another.

use crate::descriptor::FieldSet;
use crate::error::{FieldParseError, GeneratorError};
use crate::field_map::{series_prefix, DuplicatePrefixPolicy, FieldMap};
use crate::files::read_series_keys;
use crate::series::SeriesTemplate;
use point_core::{Field, Point, Precision};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PROGRESS_INTERVAL: usize = 10_000;

/// What to do with a record whose fields cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRecordPolicy {
    /// Drop the record, report it in [`PointBatch::skipped`] and continue.
    #[default]
    Skip,
    /// Fail the whole batch with the record's error.
    Abort,
}

/// Options shared by the batch builders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub precision: Precision,
    pub on_invalid_record: InvalidRecordPolicy,
    pub duplicate_prefix: DuplicatePrefixPolicy,
}

impl BuildOptions {
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    pub fn with_invalid_record_policy(mut self, policy: InvalidRecordPolicy) -> Self {
        self.on_invalid_record = policy;
        self
    }

    pub fn with_duplicate_prefix_policy(mut self, policy: DuplicatePrefixPolicy) -> Self {
        self.duplicate_prefix = policy;
        self
    }
}

/// A record left out of a batch.
#[derive(Debug)]
pub struct SkippedRecord {
    /// Position of the record in its input (0-based).
    pub index: usize,
    pub series_key: String,
    pub error: GeneratorError,
}

/// Points built from one source, plus the records that were skipped.
#[derive(Debug, Default)]
pub struct PointBatch {
    pub points: Vec<Point>,
    pub skipped: Vec<SkippedRecord>,
}

impl PointBatch {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Total number of fields across all points.
    pub fn field_count(&self) -> usize {
        self.points.iter().map(|p| p.fields().len()).sum()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Build `series_n` points shaped like `series_key`, each with the fields of
/// the `fields` descriptor.
///
/// The descriptor is shared by every point, so a malformed descriptor fails
/// the whole batch.
pub fn new_points(
    series_key: &str,
    fields: &str,
    series_n: usize,
    precision: Precision,
) -> Result<Vec<Point>, GeneratorError> {
    let template = SeriesTemplate::parse(series_key)?;
    let field_set = FieldSet::parse(fields)?;

    let mut points = Vec::with_capacity(series_n);
    for key in template.keys(series_n) {
        points.push(Point::new(key, field_set.instantiate(), precision));

        if points.len() % PROGRESS_INTERVAL == 0 {
            debug!("Built {} points", points.len());
        }
    }

    info!(
        "Built {} points from template '{}' with {} fields each",
        points.len(),
        series_key,
        field_set.len()
    );
    Ok(points)
}

/// Build one point per line of the series-key file, with fields looked up
/// by series prefix in the field-map file.
///
/// Failing to read either file fails the batch. Records without a usable
/// descriptor are handled by `options.on_invalid_record`.
pub fn new_points_from_path<P, Q>(
    series_key_path: P,
    field_map_path: Q,
    options: &BuildOptions,
) -> Result<PointBatch, GeneratorError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let series_keys = read_series_keys(series_key_path.as_ref())?;
    let field_map = FieldMap::from_file(field_map_path.as_ref(), options.duplicate_prefix)?;
    info!(
        "Loaded {} series keys from '{}' and {} field descriptors from '{}'",
        series_keys.len(),
        series_key_path.as_ref().display(),
        field_map.len(),
        field_map_path.as_ref().display()
    );

    build_points(series_keys, &field_map, options)
}

/// Build one point per series key, with fields looked up in `field_map`.
pub fn build_points<I>(
    series_keys: I,
    field_map: &FieldMap,
    options: &BuildOptions,
) -> Result<PointBatch, GeneratorError>
where
    I: IntoIterator<Item = String>,
{
    let mut cache = DescriptorCache::new(field_map);
    let mut batch = PointBatch::default();

    for (index, series_key) in series_keys.into_iter().enumerate() {
        match cache.instantiate(&series_key) {
            Ok(fields) => batch
                .points
                .push(Point::new(series_key, fields, options.precision)),
            Err(error) => match options.on_invalid_record {
                InvalidRecordPolicy::Abort => return Err(error),
                InvalidRecordPolicy::Skip => {
                    warn!("Skipping series '{}': {}", series_key, error);
                    batch.skipped.push(SkippedRecord {
                        index,
                        series_key,
                        error,
                    });
                }
            },
        }

        if (index + 1) % PROGRESS_INTERVAL == 0 {
            debug!("Processed {} series keys", index + 1);
        }
    }

    info!(
        "Built {} points ({} skipped)",
        batch.len(),
        batch.skipped_count()
    );
    Ok(batch)
}

/// Parses each distinct descriptor once.
struct DescriptorCache<'a> {
    field_map: &'a FieldMap,
    parsed: HashMap<&'a str, Result<FieldSet, FieldParseError>>,
}

impl<'a> DescriptorCache<'a> {
    fn new(field_map: &'a FieldMap) -> Self {
        Self {
            field_map,
            parsed: HashMap::new(),
        }
    }

    fn instantiate(&mut self, series_key: &str) -> Result<Vec<Field>, GeneratorError> {
        let prefix = series_prefix(series_key);
        let (prefix, descriptor) = self.field_map.get_key_value(prefix).ok_or_else(|| {
            GeneratorError::MissingFieldSpec {
                prefix: prefix.to_string(),
            }
        })?;

        match self
            .parsed
            .entry(prefix)
            .or_insert_with(|| FieldSet::parse(descriptor))
        {
            Ok(field_set) => Ok(field_set.instantiate()),
            Err(e) => Err(GeneratorError::FieldParse(e.clone())),
        }
    }
}

/// Where a batch comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    /// Expand a template and give every key the same descriptor.
    Template {
        series_key: String,
        fields: String,
        series_count: usize,
    },
    /// Read series keys and a field map from files.
    Files {
        series_key_file: PathBuf,
        field_map_file: PathBuf,
    },
}

impl BatchSource {
    pub fn build(&self, options: &BuildOptions) -> Result<PointBatch, GeneratorError> {
        match self {
            BatchSource::Template {
                series_key,
                fields,
                series_count,
            } => Ok(PointBatch {
                points: new_points(series_key, fields, *series_count, options.precision)?,
                skipped: Vec::new(),
            }),
            BatchSource::Files {
                series_key_file,
                field_map_file,
            } => new_points_from_path(series_key_file, field_map_file, options),
        }
    }
}
