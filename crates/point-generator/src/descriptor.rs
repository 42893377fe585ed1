//! Field-descriptor parsing.
//!
//! A descriptor is a comma-separated list of `key=value` pairs, e.g.
//! `count=10i,ratio=2.5,status=ok`. Each value is typed by its literal
//! syntax, checked in this order:
//!
//! 1. ends with `i` → Int (the rest must be a base-10 `i64`)
//! 2. decimal floating-point literal → Float
//! 3. anything else → String, wrapped in double quotes
//!
//! Commas and equals signs inside values are not escapable. A pair is split
//! at its first `=`.

use crate::error::{FieldParseError, FieldParseReason};
use point_core::{Field, FieldKind, FloatField, IntField, StringField};
use std::str::FromStr;

/// Initial value of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValueSpec {
    Int(i64),
    Float(f64),
    /// Quoted literal, e.g. `"ok"`.
    String(String),
}

/// One parsed `key=value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: String,
    pub value: FieldValueSpec,
}

impl FieldSpec {
    pub fn kind(&self) -> FieldKind {
        match self.value {
            FieldValueSpec::Int(_) => FieldKind::Int,
            FieldValueSpec::Float(_) => FieldKind::Float,
            FieldValueSpec::String(_) => FieldKind::String,
        }
    }

    /// Create fresh field storage holding the initial value.
    pub fn instantiate(&self) -> Field {
        let key = self.key.as_bytes();
        match &self.value {
            FieldValueSpec::Int(value) => IntField::new(key, *value).into(),
            FieldValueSpec::Float(value) => FloatField::new(key, *value).into(),
            FieldValueSpec::String(literal) => StringField::new(key, literal.as_str()).into(),
        }
    }
}

/// A parsed descriptor in canonical order (Ints, then Floats, then Strings).
///
/// A `FieldSet` is an immutable template. Every call to
/// [`FieldSet::instantiate`] produces independently owned fields, so points
/// built from the same set never share mutable storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    specs: Vec<FieldSpec>,
}

impl FieldSet {
    /// Parse a descriptor. An empty or blank descriptor yields no fields.
    pub fn parse(descriptor: &str) -> Result<Self, FieldParseError> {
        if descriptor.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut ints = Vec::new();
        let mut floats = Vec::new();
        let mut strings = Vec::new();

        for pair in descriptor.split(',') {
            let spec = parse_pair(pair)?;
            match spec.kind() {
                FieldKind::Int => ints.push(spec),
                FieldKind::Float => floats.push(spec),
                FieldKind::String => strings.push(spec),
            }
        }

        ints.append(&mut floats);
        ints.append(&mut strings);
        Ok(Self { specs: ints })
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Keys of the fields of the given kind, in canonical order.
    pub fn keys_of(&self, kind: FieldKind) -> impl Iterator<Item = &str> + '_ {
        self.specs
            .iter()
            .filter(move |spec| spec.kind() == kind)
            .map(|spec| spec.key.as_str())
    }

    /// Create a fresh, independently owned field list for one point.
    pub fn instantiate(&self) -> Vec<Field> {
        self.specs.iter().map(FieldSpec::instantiate).collect()
    }
}

impl FromStr for FieldSet {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_pair(pair: &str) -> Result<FieldSpec, FieldParseError> {
    if pair.is_empty() {
        return Err(FieldParseError::new(pair, FieldParseReason::EmptyPair));
    }

    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| FieldParseError::new(pair, FieldParseReason::MissingEquals))?;

    if key.is_empty() {
        return Err(FieldParseError::new(pair, FieldParseReason::EmptyKey));
    }

    let value = if let Some(digits) = raw.strip_suffix('i') {
        let value = digits
            .parse::<i64>()
            .map_err(|e| FieldParseError::new(pair, FieldParseReason::InvalidInteger(e)))?;
        FieldValueSpec::Int(value)
    } else if is_float_literal(raw) {
        let value = raw
            .parse::<f64>()
            .map_err(|e| FieldParseError::new(pair, FieldParseReason::InvalidFloat(e)))?;
        FieldValueSpec::Float(value)
    } else {
        FieldValueSpec::String(format!("\"{raw}\""))
    };

    Ok(FieldSpec {
        key: key.to_string(),
        value,
    })
}

/// Whether `s` is a decimal floating-point literal: optional sign, digits
/// with an optional fractional part (at least one digit overall), optional
/// exponent.
pub fn is_float_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let mut mantissa_digits = skip_digits(bytes, &mut pos);
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        mantissa_digits += skip_digits(bytes, &mut pos);
    }
    if mantissa_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        if skip_digits(bytes, &mut pos) == 0 {
            return false;
        }
    }

    pos == bytes.len()
}

fn skip_digits(bytes: &[u8], pos: &mut usize) -> usize {
    let start = *pos;
    while bytes.get(*pos).is_some_and(u8::is_ascii_digit) {
        *pos += 1;
    }
    *pos - start
}
