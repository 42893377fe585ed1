//! The point aggregate handed to a write loop.

use crate::field::{Field, FieldKind, FloatField, IntField, StringField};
use crate::time::{Precision, Timestamp};
use chrono::{DateTime, Utc};

/// One series key, its fields and a timestamp.
///
/// Fields are kept in a single list in canonical order: Int fields, then
/// Float fields, then String fields, each group in insertion order. The typed
/// views ([`Point::ints`], [`Point::floats`], [`Point::strings`]) are
/// sub-slices of that list, so mutating through them is visible through
/// [`Point::fields`].
#[derive(Debug, Clone)]
pub struct Point {
    series_key: Box<[u8]>,
    fields: Vec<Field>,
    int_count: usize,
    float_count: usize,
    time: Timestamp,
}

impl Point {
    /// Create a point. `fields` is reordered into canonical order; the
    /// relative order within each kind is preserved.
    pub fn new(
        series_key: impl Into<Vec<u8>>,
        mut fields: Vec<Field>,
        precision: Precision,
    ) -> Self {
        fields.sort_by_key(Field::kind);
        let int_count = fields
            .iter()
            .take_while(|f| f.kind() == FieldKind::Int)
            .count();
        let float_count = fields[int_count..]
            .iter()
            .take_while(|f| f.kind() == FieldKind::Float)
            .count();

        Self {
            series_key: series_key.into().into_boxed_slice(),
            fields,
            int_count,
            float_count,
            time: Timestamp::new(precision),
        }
    }

    /// The series key, e.g. `cpu,host=server-0`.
    pub fn series(&self) -> &[u8] {
        &self.series_key
    }

    /// All fields in canonical order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn time(&self) -> &Timestamp {
        &self.time
    }

    /// Replace the time value; the precision is unchanged.
    pub fn set_time(&self, time: DateTime<Utc>) {
        self.time.set_time(time);
    }

    /// Apply one mutation pass: every Int field +1, every Float field +1.0.
    /// String fields are untouched.
    ///
    /// Safe to call concurrently on the same point; no increment is lost.
    pub fn update(&self) {
        for field in self.ints() {
            field.add(1);
        }
        for field in self.floats() {
            field.add(1.0);
        }
    }

    pub fn ints(&self) -> impl Iterator<Item = &IntField> + '_ {
        self.fields[..self.int_count]
            .iter()
            .filter_map(Field::as_int)
    }

    pub fn floats(&self) -> impl Iterator<Item = &FloatField> + '_ {
        self.fields[self.int_count..self.int_count + self.float_count]
            .iter()
            .filter_map(Field::as_float)
    }

    pub fn strings(&self) -> impl Iterator<Item = &StringField> + '_ {
        self.fields[self.int_count + self.float_count..]
            .iter()
            .filter_map(Field::as_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_point() -> Point {
        Point::new(
            "cpu,host=a",
            vec![
                StringField::quoted("status", "ok").into(),
                FloatField::new("ratio", 2.5).into(),
                IntField::new("count", 10).into(),
                FloatField::new("load", 0.0).into(),
                IntField::new("errors", 0).into(),
            ],
            Precision::Nanosecond,
        )
    }

    fn keys(point: &Point) -> Vec<String> {
        point
            .fields()
            .iter()
            .map(|f| String::from_utf8_lossy(f.key()).into_owned())
            .collect()
    }

    #[test]
    fn test_canonical_field_order() {
        let point = sample_point();

        assert_eq!(
            keys(&point),
            vec!["count", "errors", "ratio", "load", "status"]
        );
        assert_eq!(point.ints().count(), 2);
        assert_eq!(point.floats().count(), 2);
        assert_eq!(point.strings().count(), 1);
    }

    #[test]
    fn test_series() {
        assert_eq!(sample_point().series(), b"cpu,host=a");
    }

    #[test]
    fn test_update_sequential() {
        let point = sample_point();

        for _ in 0..5 {
            point.update();
        }

        let ints: Vec<i64> = point.ints().map(IntField::value).collect();
        let floats: Vec<f64> = point.floats().map(FloatField::value).collect();
        assert_eq!(ints, vec![15, 5]);
        assert_eq!(floats, vec![7.5, 5.0]);
        assert_eq!(point.strings().next().unwrap().value(), "\"ok\"");
    }

    #[test]
    fn test_typed_views_share_storage() {
        let point = sample_point();

        point.ints().next().unwrap().set(42);

        assert_eq!(point.fields()[0].literal().to_string(), "42i");
    }

    #[test]
    fn test_time_precision_round_trip() {
        for precision in [
            Precision::Nanosecond,
            Precision::Microsecond,
            Precision::Millisecond,
            Precision::Second,
        ] {
            let point = Point::new("cpu", Vec::new(), precision);
            assert_eq!(point.time().precision(), precision);

            let time = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
            point.set_time(time);
            assert_eq!(point.time().time(), time);
            assert_eq!(point.time().precision(), precision);
        }
    }

    #[test]
    fn test_no_fields() {
        let point = Point::new("cpu", Vec::new(), Precision::Second);
        point.update();
        assert!(point.fields().is_empty());
    }

    #[test]
    fn test_clone_mutates_independently() {
        let point = sample_point();
        let copy = point.clone();

        point.update();

        assert_eq!(point.ints().next().unwrap().value(), 11);
        assert_eq!(copy.ints().next().unwrap().value(), 10);
        assert_eq!(keys(&point), keys(&copy));
    }
}
