//! Point batch generator for point-stress.
//!
//! This crate turns compact load-test inputs into batches of
//! [`point_core::Point`]s that a write loop can mutate and serialize over
//! and over without re-parsing anything.
//!
//! # Architecture
//!
//! ```text
//!  series-key template ──► SeriesTemplate ──┐
//!                                           ├──► new_points ───────────┐
//!  field descriptor ─────► FieldSet ────────┘                          │
//!                                                                      ▼
//!  series-key file ──► read_series_keys ──┐                       Vec<Point>
//!                                         ├──► new_points_from_path ──►│
//!  field-map file ───► FieldMap ──────────┘     (PointBatch + skipped) │
//! ```
//!
//! # Example
//!
//! ```rust
//! use point_core::Precision;
//! use point_generator::new_points;
//!
//! let points = new_points("cpu,host=server", "count=10i,ratio=2.5", 3, Precision::Second)
//!     .unwrap();
//!
//! assert_eq!(points.len(), 3);
//! assert_eq!(points[2].series(), b"cpu,host=server-2");
//!
//! points[0].update();
//! assert_eq!(points[0].fields()[0].literal().to_string(), "11i");
//! ```
//!
//! # Descriptor grammar
//!
//! - `key=10i` - Int
//! - `key=2.5`, `key=-1e3`, `key=7` - Float
//! - anything else - String, stored quoted (`key=ok` → `"ok"`)

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod field_map;
pub mod files;
pub mod series;

// Re-exports for convenience
pub use builder::{
    build_points, new_points, new_points_from_path, BatchSource, BuildOptions,
    InvalidRecordPolicy, PointBatch, SkippedRecord,
};
pub use descriptor::{is_float_literal, FieldSet, FieldSpec, FieldValueSpec};
pub use error::{FieldParseError, FieldParseReason, GeneratorError};
pub use field_map::{series_prefix, DuplicatePrefixPolicy, FieldMap};
pub use files::{read_series_keys, write_field_map, write_series_keys};
pub use series::{expand, SeriesKeys, SeriesTemplate};
