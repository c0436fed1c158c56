use std::fs;

use polars::prelude::*;
use tabclean_model::parse_run_timestamp;
use tabclean_output::{ArtifactTarget, artifact_timestamp, select_recent_file, write_artifact};
use tempfile::tempdir;

#[test]
fn test_latest_written_artifact_is_recent() {
    let dir = tempdir().unwrap();
    let target = ArtifactTarget {
        base: dir.path().to_path_buf(),
        product: "master".to_string(),
        tag: "suppliers".to_string(),
        date_part: None,
        file_type: "csv".to_string(),
        delimiter: ",".to_string(),
        encoding: "UTF-8".to_string(),
    };
    let df = DataFrame::new(vec![Series::new("nif".into(), vec!["500100200"]).into_column()]).unwrap();

    let first = parse_run_timestamp("20240101_090000").unwrap();
    let second = parse_run_timestamp("20240102_090000").unwrap();
    write_artifact(&df, &target, &first).unwrap();
    let latest = write_artifact(&df, &target, &second).unwrap();

    let recent = select_recent_file(&target.tag_dir(), &target.tag).unwrap().unwrap();
    assert_eq!(recent, latest);
    assert_eq!(artifact_timestamp(&recent, &target.tag).unwrap(), second);
    assert_eq!(fs::read_to_string(&recent).unwrap(), "nif\n500100200\n");
}

#[test]
fn test_partitioned_artifacts_do_not_shadow_recent_lookup() {
    let dir = tempdir().unwrap();
    let mut target = ArtifactTarget {
        base: dir.path().to_path_buf(),
        product: "master".to_string(),
        tag: "sales".to_string(),
        date_part: None,
        file_type: "csv".to_string(),
        delimiter: ";".to_string(),
        encoding: "UTF-8-SIG".to_string(),
    };
    let df = DataFrame::new(vec![Series::new("v".into(), vec![1i64]).into_column()]).unwrap();
    let stamp = parse_run_timestamp("20240101_000000").unwrap();
    let whole = write_artifact(&df, &target, &stamp).unwrap();

    target.date_part = Some("202312".to_string());
    let part = write_artifact(&df, &target, &stamp).unwrap();
    assert!(part.starts_with(target.tag_dir().join("sales_202312")));

    let recent = select_recent_file(&target.tag_dir(), "sales").unwrap();
    assert_eq!(recent, Some(whole));
}
