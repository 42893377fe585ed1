//! The `generate` driver.
//!
//! Builds one batch, shares it between worker tasks and runs update cycles
//! over it. Each cycle stamps every point with the current time, applies one
//! mutation pass and renders the point's fields into a scratch buffer, which
//! is the work a write loop does before handing bytes to a transport.

use crate::config::StressConfig;
use anyhow::Context;
use chrono::Utc;
use point_core::Point;
use serde::Serialize;
use std::io::{self, Write};
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of one generate run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Points in the batch
    pub points: usize,
    /// Series left out of the batch
    pub skipped: usize,
    /// Fields across all points
    pub fields: usize,
    pub cycles: u64,
    pub workers: usize,
    /// Field bytes rendered across all cycles
    pub bytes_rendered: u64,
    pub build_duration_ms: u64,
    pub run_duration_ms: u64,
    pub points_per_second: f64,
}

/// Build the configured batch and run `config.cycles` update cycles over it.
pub async fn run_generate(config: &StressConfig) -> anyhow::Result<RunSummary> {
    let source = config.batch_source()?;
    let options = config.build_options();

    let build_start = Instant::now();
    let batch = tokio::task::spawn_blocking(move || source.build(&options))
        .await
        .context("Batch builder task failed")?
        .context("Failed to build point batch")?;
    let build_duration = build_start.elapsed();

    let skipped = batch.skipped_count();
    let fields = batch.field_count();
    let points: Arc<[Point]> = batch.into_points().into();
    info!(
        "Built {} points with {} fields in {:?} ({} series skipped)",
        points.len(),
        fields,
        build_duration,
        skipped
    );

    let ranges = partition(points.len(), config.workers);
    info!(
        "Running {} cycles over {} points with {} workers",
        config.cycles,
        points.len(),
        ranges.len()
    );

    let run_start = Instant::now();
    let mut handles = Vec::with_capacity(ranges.len());
    for (worker, range) in ranges.iter().cloned().enumerate() {
        let points = Arc::clone(&points);
        let cycles = config.cycles;
        handles.push(tokio::task::spawn_blocking(move || {
            run_worker(worker, &points[range], cycles)
        }));
    }

    let mut bytes_rendered = 0;
    for handle in handles {
        bytes_rendered += handle
            .await
            .context("Worker task failed")?
            .context("Failed to render fields")?;
    }
    let run_duration = run_start.elapsed();

    let summary = RunSummary {
        points: points.len(),
        skipped,
        fields,
        cycles: config.cycles,
        workers: ranges.len(),
        bytes_rendered,
        build_duration_ms: build_duration.as_millis() as u64,
        run_duration_ms: run_duration.as_millis() as u64,
        points_per_second: points_per_second(points.len() as u64 * config.cycles, run_duration),
    };
    info!(
        "Generated {} point updates ({:.0} points/s, {} bytes rendered)",
        summary.points as u64 * summary.cycles,
        summary.points_per_second,
        summary.bytes_rendered
    );
    Ok(summary)
}

/// Split `len` points into at most `workers` contiguous, non-empty ranges.
pub(crate) fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let chunk = len.div_ceil(workers.clamp(1, len));
    (0..len)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(len))
        .collect()
}

fn run_worker(worker: usize, points: &[Point], cycles: u64) -> io::Result<u64> {
    let mut buf = Vec::with_capacity(256);
    let mut rendered = 0u64;

    for cycle in 0..cycles {
        let now = Utc::now();
        for point in points {
            point.set_time(now);
            point.update();

            buf.clear();
            render_fields(point, &mut buf)?;
            rendered += buf.len() as u64;
        }
        debug!(
            "Worker {} finished cycle {} over {} points",
            worker,
            cycle + 1,
            points.len()
        );
    }

    Ok(rendered)
}

/// Write `key=literal` pairs joined by commas.
pub(crate) fn render_fields<W: Write>(point: &Point, out: &mut W) -> io::Result<()> {
    for (i, field) in point.fields().iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        out.write_all(field.key())?;
        write!(out, "={}", field.literal())?;
    }
    Ok(())
}

fn points_per_second(updates: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        updates as f64 / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use point_core::{FloatField, IntField, Precision, StringField};

    #[test]
    fn test_partition() {
        assert_eq!(partition(10, 3), vec![0..4, 4..8, 8..10]);
        assert_eq!(partition(10, 1), vec![0..10]);
        assert_eq!(partition(2, 8), vec![0..1, 1..2]);
        assert_eq!(partition(5, 0), vec![0..5]);
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn test_render_fields() {
        let point = Point::new(
            "cpu,host=a",
            vec![
                StringField::quoted("state", "ok").into(),
                FloatField::new("load", 0.5).into(),
                IntField::new("n", 0).into(),
            ],
            Precision::Second,
        );
        point.update();

        let mut buf = Vec::new();
        render_fields(&point, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "n=1i,load=1.5,state=\"ok\"");
    }

    #[test]
    fn test_run_worker_updates_every_point() {
        let points: Vec<Point> = (0..3)
            .map(|i| {
                Point::new(
                    format!("cpu,host={i}"),
                    vec![IntField::new("n", 0).into()],
                    Precision::Second,
                )
            })
            .collect();

        let rendered = run_worker(0, &points, 4).unwrap();

        // Each cycle renders "n=<k>i", four bytes per point.
        assert_eq!(rendered, 3 * 4 * 4);
        for point in &points {
            assert_eq!(point.fields()[0].as_int().unwrap().value(), 4);
            assert!(point.time().value() > 0);
        }
    }

    #[tokio::test]
    async fn test_run_generate_template() {
        let config = StressConfig {
            series_key: "cpu,host=server".to_string(),
            fields: "n=0i,load=0.5".to_string(),
            series_count: 10,
            cycles: 3,
            workers: 4,
            ..StressConfig::default()
        };

        let summary = run_generate(&config).await.unwrap();

        assert_eq!(summary.points, 10);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.fields, 20);
        assert_eq!(summary.cycles, 3);
        assert_eq!(summary.workers, 4);
        assert!(summary.bytes_rendered > 0);
    }

    #[tokio::test]
    async fn test_run_generate_bad_descriptor() {
        let config = StressConfig {
            fields: "n=xi".to_string(),
            series_count: 10,
            ..StressConfig::default()
        };

        let err = run_generate(&config).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to build point batch"));
    }

    #[test]
    fn test_summary_json() {
        let summary = RunSummary {
            points: 1,
            skipped: 0,
            fields: 1,
            cycles: 1,
            workers: 1,
            bytes_rendered: 4,
            build_duration_ms: 0,
            run_duration_ms: 0,
            points_per_second: 0.0,
        };
        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["points"], 1);
        assert_eq!(json["bytes_rendered"], 4);
    }
}
