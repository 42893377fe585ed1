//! Concurrent `update` calls on a single shared point.

use point_core::{Field, FloatField, IntField, Point, Precision, StringField};
use std::sync::Arc;
use std::thread;

fn shared_point() -> Arc<Point> {
    Arc::new(Point::new(
        "cpu,host=server-0",
        vec![
            Field::from(IntField::new("count", 100)),
            Field::from(IntField::new("errors", 0)),
            Field::from(FloatField::new("ratio", 0.5)),
            Field::from(StringField::quoted("status", "ok")),
        ],
        Precision::Nanosecond,
    ))
}

#[test]
fn test_concurrent_single_update_per_caller() {
    const CALLERS: i64 = 16;
    let point = shared_point();

    thread::scope(|scope| {
        for _ in 0..CALLERS {
            let point = Arc::clone(&point);
            scope.spawn(move || point.update());
        }
    });

    let ints: Vec<i64> = point.ints().map(IntField::value).collect();
    assert_eq!(ints, vec![100 + CALLERS, CALLERS]);
    // Floats are only checked for being finite here.
    assert!(point.floats().all(|f| f.value().is_finite()));
    assert_eq!(point.strings().next().unwrap().value(), "\"ok\"");
}

#[test]
fn test_concurrent_repeated_updates() {
    const CALLERS: i64 = 8;
    const UPDATES: i64 = 1_000;
    let point = shared_point();

    thread::scope(|scope| {
        for _ in 0..CALLERS {
            let point = Arc::clone(&point);
            scope.spawn(move || {
                for _ in 0..UPDATES {
                    point.update();
                }
            });
        }
    });

    let ints: Vec<i64> = point.ints().map(IntField::value).collect();
    assert_eq!(ints, vec![100 + CALLERS * UPDATES, CALLERS * UPDATES]);
    assert_eq!(point.fields().len(), 4);
}

#[test]
fn test_points_do_not_share_storage() {
    let a = shared_point();
    let b = shared_point();

    thread::scope(|scope| {
        let a = Arc::clone(&a);
        scope.spawn(move || {
            for _ in 0..10 {
                a.update();
            }
        });
    });

    assert_eq!(a.ints().next().unwrap().value(), 110);
    assert_eq!(b.ints().next().unwrap().value(), 100);
}
