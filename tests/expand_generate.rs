//! Expand a template into files, then generate from those files.

use point_stress::{run_expand, run_generate, ExpandArgs, StressConfig};
use std::fs;
use tempfile::TempDir;

fn expand_into(dir: &TempDir, series_count: usize) -> ExpandArgs {
    let args = ExpandArgs {
        series_key: "cpu,host=server".to_string(),
        series_count,
        output: dir.path().join("series.txt"),
        fields: Some("n=0i,load=0.5,state=up".to_string()),
        field_map_output: Some(dir.path().join("fields.txt")),
    };
    run_expand(&args).unwrap();
    args
}

#[tokio::test]
async fn test_generate_from_expanded_files() {
    let dir = TempDir::new().unwrap();
    let args = expand_into(&dir, 50);

    let config = StressConfig {
        series_key_file: Some(args.output.clone()),
        field_map_file: args.field_map_output.clone(),
        cycles: 2,
        workers: 3,
        ..StressConfig::default()
    };
    let summary = run_generate(&config).await.unwrap();

    assert_eq!(summary.points, 50);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.fields, 150);
    assert_eq!(summary.workers, 3);
}

#[tokio::test]
async fn test_generate_skips_unmapped_series() {
    let dir = TempDir::new().unwrap();
    let args = expand_into(&dir, 10);

    let mut series = fs::read_to_string(&args.output).unwrap();
    series.push_str("mem,host=a\n");
    fs::write(&args.output, series).unwrap();

    let config = StressConfig {
        series_key_file: Some(args.output.clone()),
        field_map_file: args.field_map_output.clone(),
        ..StressConfig::default()
    };
    let summary = run_generate(&config).await.unwrap();

    assert_eq!(summary.points, 10);
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn test_generate_missing_field_map_fails() {
    let dir = TempDir::new().unwrap();
    let args = expand_into(&dir, 10);

    let config = StressConfig {
        series_key_file: Some(args.output.clone()),
        field_map_file: Some(dir.path().join("missing.txt")),
        ..StressConfig::default()
    };

    assert!(run_generate(&config).await.is_err());
}

#[test]
fn test_config_file_selects_file_builder() {
    let dir = TempDir::new().unwrap();
    let args = expand_into(&dir, 5);
    let config_path = dir.path().join("stress.yaml");
    fs::write(
        &config_path,
        format!(
            "series_key_file: {}\nfield_map_file: {}\nprecision: s\n",
            args.output.display(),
            dir.path().join("fields.txt").display()
        ),
    )
    .unwrap();

    let config = StressConfig::from_file(&config_path).unwrap();
    assert_eq!(config.series_key_file.as_deref(), Some(args.output.as_path()));
}
