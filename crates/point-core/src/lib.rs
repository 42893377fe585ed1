//! Core types for the point-stress generator.
//!
//! This crate provides the data model handed to a write loop:
//!
//! - [`Point`] - A series key, an ordered field list and a timestamp
//! - [`Field`] - Int, Float and String fields with in-place mutation
//! - [`Timestamp`] - A replaceable time value at a fixed [`Precision`]
//!
//! # Architecture
//!
//! ```text
//! point-core (this crate)
//!    │
//!    └─── point-generator  (parses descriptors, expands series keys,
//!                           builds batches of points)
//! ```
//!
//! # Example
//!
//! ```rust
//! use point_core::{Field, FloatField, IntField, Point, Precision};
//!
//! let point = Point::new(
//!     "cpu,host=server-0",
//!     vec![
//!         Field::Float(FloatField::new("usage", 0.5)),
//!         Field::Int(IntField::new("count", 10)),
//!     ],
//!     Precision::Millisecond,
//! );
//!
//! point.update();
//!
//! // Int fields always come first.
//! assert_eq!(point.fields()[0].literal().to_string(), "11i");
//! assert_eq!(point.fields()[1].literal().to_string(), "1.5");
//! ```

pub mod error;
pub mod field;
pub mod point;
pub mod time;

// Re-exports for convenience
pub use error::CoreError;
pub use field::{Field, FieldKind, FieldLiteral, FloatField, IntField, StringField};
pub use point::Point;
pub use time::{Precision, Timestamp};
