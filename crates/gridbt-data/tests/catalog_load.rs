use std::fs;

use gridbt_core::SweepError;
use gridbt_data::{load_catalog, LoadPolicy};

const GOOD_ROWS: &str = "\
date,symbol,open,high,low,close,volume
2021-01-04,ACME,10.0,10.5,9.8,10.2,1000
2021-01-05,ACME,10.2,10.9,10.1,10.7,1400
";

#[test]
fn universe_keys_come_from_file_stems() {
    let dir = tempfile::tempdir().expect("tmp dir");
    fs::write(dir.path().join("nifty50.csv"), GOOD_ROWS).expect("write");
    fs::write(dir.path().join("midcap.csv"), GOOD_ROWS).expect("write");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let catalog = load_catalog(dir.path(), LoadPolicy::Abort).expect("load");
    let keys: Vec<&str> = catalog.keys().map(|key| key.as_str()).collect();
    assert_eq!(keys, vec!["midcap", "nifty50"]);
    assert_eq!(catalog["nifty50"].bars.len(), 2);
    assert_eq!(catalog["nifty50"].universe, "nifty50");
}

#[test]
fn abort_policy_fails_on_first_bad_file() {
    let dir = tempfile::tempdir().expect("tmp dir");
    fs::write(dir.path().join("good.csv"), GOOD_ROWS).expect("write");
    fs::write(dir.path().join("bad.csv"), "date,symbol\nnot-a-date,ACME\n").expect("write");

    let err = load_catalog(dir.path(), LoadPolicy::Abort).expect_err("abort");
    assert!(matches!(err, SweepError::Dataset(_)));
    let info = err.info();
    assert!(info.context.get("path").is_some_and(|p| p.contains("bad.csv")));
}

#[test]
fn skip_policy_keeps_remaining_universes() {
    let dir = tempfile::tempdir().expect("tmp dir");
    fs::write(dir.path().join("good.csv"), GOOD_ROWS).expect("write");
    fs::write(dir.path().join("bad.csv"), "date,symbol\nnot-a-date,ACME\n").expect("write");

    let catalog = load_catalog(dir.path(), LoadPolicy::Skip).expect("load");
    assert_eq!(catalog.len(), 1);
    assert!(catalog.contains_key("good"));
}

#[test]
fn missing_directory_is_a_dataset_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let missing = dir.path().join("absent");
    let err = load_catalog(&missing, LoadPolicy::Abort).expect_err("missing dir");
    assert!(matches!(err, SweepError::Dataset(_)));
}
