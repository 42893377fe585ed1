//! point-stress
//!
//! Drives synthetic time-series write load: builds a batch of points from a
//! series-key template or from series-key and field-map files, then runs
//! update cycles over it from a pool of worker tasks.
//!
//! # CLI Usage
//!
//! ```bash
//! # 10k series, 5 update cycles, 4 workers, millisecond timestamps
//! point-stress generate \
//!   --series-key "cpu,host=server" \
//!   --fields "usage=0.5,count=0i,state=ok" \
//!   --series-count 10000 --cycles 5 --workers 4 --precision ms
//!
//! # Freeze a population into files, then replay it
//! point-stress expand --series-key "cpu,host=server" --series-count 1000 \
//!   --output series.txt --fields "count=0i" --field-map-output fields.txt
//! point-stress generate --series-key-file series.txt --field-map-file fields.txt
//! ```

pub mod config;
pub mod expand;
pub mod run;

pub use config::{GenerateArgs, StressConfig};
pub use expand::{run_expand, ExpandArgs, ExpandSummary};
pub use run::{run_generate, RunSummary};
