//! The `expand` command: write series-key and field-map files.
//!
//! The files it produces are the inputs of the file-backed builder, so a
//! templated population can be frozen, edited and replayed.

use anyhow::Context;
use clap::Args;
use point_generator::{expand, series_prefix, write_field_map, write_series_keys, FieldSet};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

use crate::config::{DEFAULT_SERIES_COUNT, DEFAULT_SERIES_KEY};

/// Arguments of the `expand` command.
#[derive(Args, Debug, Clone)]
pub struct ExpandArgs {
    /// Series-key template, e.g. "cpu,host=server"
    #[arg(long, default_value = DEFAULT_SERIES_KEY)]
    pub series_key: String,

    /// Number of series keys to write
    #[arg(long, short = 'n', default_value_t = DEFAULT_SERIES_COUNT)]
    pub series_count: usize,

    /// Series-key output file
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Field descriptor written for every distinct series prefix
    #[arg(long, requires = "field_map_output")]
    pub fields: Option<String>,

    /// Field-map output file
    #[arg(long, requires = "fields")]
    pub field_map_output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandSummary {
    pub series_keys: usize,
    pub field_map_entries: usize,
}

pub fn run_expand(args: &ExpandArgs) -> anyhow::Result<ExpandSummary> {
    let keys = expand(&args.series_key, args.series_count)
        .with_context(|| format!("Failed to expand series key '{}'", args.series_key))?;

    let series_keys = write_series_keys(&args.output, &keys).with_context(|| {
        format!(
            "Failed to write series keys to: {}",
            args.output.display()
        )
    })?;

    let mut field_map_entries = 0;
    if let (Some(fields), Some(path)) = (&args.fields, &args.field_map_output) {
        FieldSet::parse(fields)
            .with_context(|| format!("Invalid field descriptor '{fields}'"))?;

        // A placeholder in the measurement gives every key its own prefix.
        let prefixes: BTreeSet<String> = keys
            .iter()
            .map(|key| series_prefix(&String::from_utf8_lossy(key)).to_string())
            .collect();

        field_map_entries = write_field_map(
            path,
            prefixes.iter().map(|prefix| (prefix.as_str(), fields.as_str())),
        )
        .with_context(|| format!("Failed to write field map to: {}", path.display()))?;
    }

    info!(
        "Expanded '{}' into {} series keys ({} field map entries)",
        args.series_key, series_keys, field_map_entries
    );
    Ok(ExpandSummary {
        series_keys,
        field_map_entries,
    })
}
