//! Typed point fields.
//!
//! A field is a key plus a value of one of three kinds. Numeric values live in
//! atomics so a point can be mutated through a shared reference:
//!
//! - [`IntField`] - `i64`, incremented with `fetch_add`
//! - [`FloatField`] - `f64` stored as its bit pattern, incremented with a
//!   compare-and-swap loop
//! - [`StringField`] - a pre-quoted literal, never mutated

use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Kind of a field value.
///
/// The declaration order is the canonical field order of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    Int,
    Float,
    String,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::String => "string",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 64-bit signed integer field.
#[derive(Debug)]
pub struct IntField {
    key: Box<[u8]>,
    value: AtomicI64,
}

impl IntField {
    pub fn new(key: impl Into<Vec<u8>>, value: i64) -> Self {
        Self {
            key: key.into().into_boxed_slice(),
            value: AtomicI64::new(value),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    /// Atomically add `delta`, wrapping on overflow. Returns the new value.
    pub fn add(&self, delta: i64) -> i64 {
        self.value
            .fetch_add(delta, Ordering::Relaxed)
            .wrapping_add(delta)
    }
}

impl Clone for IntField {
    fn clone(&self) -> Self {
        Self::new(self.key.to_vec(), self.value())
    }
}

/// A 64-bit floating point field.
#[derive(Debug)]
pub struct FloatField {
    key: Box<[u8]>,
    bits: AtomicU64,
}

impl FloatField {
    pub fn new(key: impl Into<Vec<u8>>, value: f64) -> Self {
        Self {
            key: key.into().into_boxed_slice(),
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Add `delta` without losing concurrent updates. Returns the new value.
    pub fn add(&self, delta: f64) -> f64 {
        let mut current = self.bits.load(Ordering::Relaxed);
        loop {
            let next = f64::from_bits(current) + delta;
            match self.bits.compare_exchange_weak(
                current,
                next.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Clone for FloatField {
    fn clone(&self) -> Self {
        Self::new(self.key.to_vec(), self.value())
    }
}

/// A string field holding an already quoted literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringField {
    key: Box<[u8]>,
    literal: Box<str>,
}

impl StringField {
    /// Create a field from a literal that already carries its quotes.
    pub fn new(key: impl Into<Vec<u8>>, literal: impl Into<String>) -> Self {
        Self {
            key: key.into().into_boxed_slice(),
            literal: literal.into().into_boxed_str(),
        }
    }

    /// Create a field by wrapping `raw` in double quotes.
    ///
    /// Embedded quotes are not escaped.
    pub fn quoted(key: impl Into<Vec<u8>>, raw: &str) -> Self {
        Self::new(key, format!("\"{raw}\""))
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The quoted literal, e.g. `"ok"`.
    pub fn value(&self) -> &str {
        &self.literal
    }
}

/// A point field.
#[derive(Debug, Clone)]
pub enum Field {
    Int(IntField),
    Float(FloatField),
    String(StringField),
}

impl Field {
    pub fn key(&self) -> &[u8] {
        match self {
            Field::Int(field) => field.key(),
            Field::Float(field) => field.key(),
            Field::String(field) => field.key(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Int(_) => FieldKind::Int,
            Field::Float(_) => FieldKind::Float,
            Field::String(_) => FieldKind::String,
        }
    }

    /// Snapshot of the current value, ready to be written out.
    pub fn literal(&self) -> FieldLiteral<'_> {
        match self {
            Field::Int(field) => FieldLiteral::Int(field.value()),
            Field::Float(field) => FieldLiteral::Float(field.value()),
            Field::String(field) => FieldLiteral::String(field.value()),
        }
    }

    pub fn as_int(&self) -> Option<&IntField> {
        match self {
            Field::Int(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&FloatField> {
        match self {
            Field::Float(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringField> {
        match self {
            Field::String(field) => Some(field),
            _ => None,
        }
    }
}

impl From<IntField> for Field {
    fn from(field: IntField) -> Self {
        Field::Int(field)
    }
}

impl From<FloatField> for Field {
    fn from(field: FloatField) -> Self {
        Field::Float(field)
    }
}

impl From<StringField> for Field {
    fn from(field: StringField) -> Self {
        Field::String(field)
    }
}

/// A field value as it appears on the wire.
///
/// Ints render with an `i` suffix (`10i`), floats in their shortest
/// round-trip decimal form (`2.5`, `2`), strings as their quoted literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldLiteral<'a> {
    Int(i64),
    Float(f64),
    String(&'a str),
}

impl fmt::Display for FieldLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLiteral::Int(value) => write!(f, "{value}i"),
            FieldLiteral::Float(value) => write!(f, "{value}"),
            FieldLiteral::String(literal) => f.write_str(literal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_add() {
        let field = IntField::new("count", 10);
        assert_eq!(field.add(1), 11);
        assert_eq!(field.add(5), 16);
        assert_eq!(field.value(), 16);
        assert_eq!(field.key(), b"count");
    }

    #[test]
    fn test_int_add_wraps() {
        let field = IntField::new("count", i64::MAX);
        assert_eq!(field.add(1), i64::MIN);
    }

    #[test]
    fn test_float_add() {
        let field = FloatField::new("ratio", 2.5);
        assert_eq!(field.add(1.0), 3.5);
        assert_eq!(field.value(), 3.5);
    }

    #[test]
    fn test_string_quoted() {
        let field = StringField::quoted("status", "ok");
        assert_eq!(field.value(), "\"ok\"");
        assert_eq!(field.key(), b"status");
    }

    #[test]
    fn test_literals() {
        assert_eq!(Field::from(IntField::new("a", -3)).literal().to_string(), "-3i");
        assert_eq!(Field::from(FloatField::new("b", 2.5)).literal().to_string(), "2.5");
        assert_eq!(Field::from(FloatField::new("c", 2.0)).literal().to_string(), "2");
        assert_eq!(
            Field::from(StringField::quoted("d", "ok")).literal().to_string(),
            "\"ok\""
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Field::from(IntField::new("n", 1));
        let copy = original.clone();

        original.as_int().unwrap().add(1);

        assert_eq!(original.literal(), FieldLiteral::Int(2));
        assert_eq!(copy.literal(), FieldLiteral::Int(1));
    }

    #[test]
    fn test_kind_order() {
        assert!(FieldKind::Int < FieldKind::Float);
        assert!(FieldKind::Float < FieldKind::String);
    }
}
