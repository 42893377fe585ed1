//! Configuration for the `generate` command.
//!
//! Values come from an optional YAML file and are then overridden by
//! command-line arguments:
//!
//! ```yaml
//! series_key: "cpu,host=server"
//! fields: "usage=0.5,count=0i,state=ok"
//! series_count: 10000
//! precision: ms
//! cycles: 10
//! workers: 4
//! ```

use anyhow::Context;
use clap::Args;
use point_core::Precision;
use point_generator::{BatchSource, BuildOptions, DuplicatePrefixPolicy, InvalidRecordPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SERIES_KEY: &str = "ctr,some=tag";
pub const DEFAULT_FIELDS: &str = "n=0i";
pub const DEFAULT_SERIES_COUNT: usize = 100_000;

/// Settings for one generate run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StressConfig {
    /// Series-key template
    pub series_key: String,
    /// Field descriptor shared by every templated series
    pub fields: String,
    /// Number of series expanded from the template
    pub series_count: usize,
    pub precision: Precision,
    /// Series-key file (file-backed builder, requires `field_map_file`)
    pub series_key_file: Option<PathBuf>,
    /// Field-map file (file-backed builder, requires `series_key_file`)
    pub field_map_file: Option<PathBuf>,
    /// Update cycles run over the batch
    pub cycles: u64,
    /// Worker tasks sharing the batch
    pub workers: usize,
    pub on_invalid_record: InvalidRecordPolicy,
    pub duplicate_prefix: DuplicatePrefixPolicy,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            series_key: DEFAULT_SERIES_KEY.to_string(),
            fields: DEFAULT_FIELDS.to_string(),
            series_count: DEFAULT_SERIES_COUNT,
            precision: Precision::Nanosecond,
            series_key_file: None,
            field_map_file: None,
            cycles: 1,
            workers: 1,
            on_invalid_record: InvalidRecordPolicy::Skip,
            duplicate_prefix: DuplicatePrefixPolicy::LastWins,
        }
    }
}

impl StressConfig {
    /// Load a config from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Parse a config from YAML text. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("Failed to parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            anyhow::bail!("workers must be at least 1");
        }
        self.batch_source().map(|_| ())
    }

    /// The pipeline selected by this config.
    ///
    /// Both key files select the file-backed builder; neither selects the
    /// template builder.
    pub fn batch_source(&self) -> anyhow::Result<BatchSource> {
        match (&self.series_key_file, &self.field_map_file) {
            (Some(series_key_file), Some(field_map_file)) => Ok(BatchSource::Files {
                series_key_file: series_key_file.clone(),
                field_map_file: field_map_file.clone(),
            }),
            (None, None) => Ok(BatchSource::Template {
                series_key: self.series_key.clone(),
                fields: self.fields.clone(),
                series_count: self.series_count,
            }),
            (Some(_), None) => {
                anyhow::bail!("series_key_file is set but field_map_file is missing")
            }
            (None, Some(_)) => {
                anyhow::bail!("field_map_file is set but series_key_file is missing")
            }
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::new(self.precision)
            .with_invalid_record_policy(self.on_invalid_record)
            .with_duplicate_prefix_policy(self.duplicate_prefix)
    }
}

/// Arguments of the `generate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// YAML config file (command-line options override its values)
    #[arg(long, short = 'c', env = "POINT_STRESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Series-key template, e.g. "cpu,host=server"
    #[arg(long, env = "POINT_STRESS_SERIES_KEY")]
    pub series_key: Option<String>,

    /// Field descriptor, e.g. "usage=0.5,count=0i"
    #[arg(long, env = "POINT_STRESS_FIELDS")]
    pub fields: Option<String>,

    /// Number of series expanded from the template
    #[arg(long, short = 'n')]
    pub series_count: Option<usize>,

    /// Timestamp precision (n, ns, u, us, ms, s)
    #[arg(long, short = 'p')]
    pub precision: Option<Precision>,

    /// Series-key file, one key per line
    #[arg(long)]
    pub series_key_file: Option<PathBuf>,

    /// Field-map file, "<prefix> <descriptor>" per line
    #[arg(long)]
    pub field_map_file: Option<PathBuf>,

    /// Update cycles run over the batch
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Worker tasks sharing the batch
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Fail on the first series without usable fields instead of skipping it
    #[arg(long)]
    pub abort_on_invalid_record: bool,

    /// Fail when a field-map prefix appears on more than one line
    #[arg(long)]
    pub reject_duplicate_prefixes: bool,

    /// Print the run summary as a single JSON line
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Merge the config file (if any) with the command-line overrides.
    pub fn resolve(&self) -> anyhow::Result<StressConfig> {
        let mut config = match &self.config {
            Some(path) => StressConfig::from_file(path)?,
            None => StressConfig::default(),
        };

        if let Some(series_key) = &self.series_key {
            config.series_key = series_key.clone();
        }
        if let Some(fields) = &self.fields {
            config.fields = fields.clone();
        }
        if let Some(series_count) = self.series_count {
            config.series_count = series_count;
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if let Some(path) = &self.series_key_file {
            config.series_key_file = Some(path.clone());
        }
        if let Some(path) = &self.field_map_file {
            config.field_map_file = Some(path.clone());
        }
        if let Some(cycles) = self.cycles {
            config.cycles = cycles;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.abort_on_invalid_record {
            config.on_invalid_record = InvalidRecordPolicy::Abort;
        }
        if self.reject_duplicate_prefixes {
            config.duplicate_prefix = DuplicatePrefixPolicy::Reject;
        }

        config.validate()?;
        Ok(config)
    }
}
