use std::fs;

use chrono::NaiveDate;
use gridbt_data::load_benchmark;

fn day(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("date")
}

#[test]
fn headers_match_case_insensitively() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("indices.csv");
    fs::write(
        &path,
        "Date,Open,High,Low,Close\n\
         2021-01-04,100,101,99,100.0\n\
         2021-01-05,100,103,100,102.0\n\
         2021-01-06,102,102,98,99.96\n",
    )
    .expect("write");

    let benchmark = load_benchmark(&path, None).expect("load");
    assert_eq!(benchmark.len(), 2);
    let first = benchmark.daily_return(day("2021-01-05")).expect("return");
    assert!((first - 0.02).abs() < 1e-12);
    let second = benchmark.daily_return(day("2021-01-06")).expect("return");
    assert!((second - (-0.02)).abs() < 1e-12);
}

#[test]
fn rows_before_min_start_are_dropped_before_returns() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("indices.csv");
    fs::write(
        &path,
        "date,open,high,low,close\n\
         2020-12-30,90,91,89,90\n\
         2021-01-04,100,101,99,100\n\
         2021-01-05,100,103,100,110\n",
    )
    .expect("write");

    let benchmark = load_benchmark(&path, Some(day("2021-01-01"))).expect("load");
    // 2020-12-30 is filtered out, so 2021-01-04 has no predecessor and the
    // only return is 2021-01-05 relative to 2021-01-04.
    assert_eq!(benchmark.len(), 1);
    let only = benchmark.daily_return(day("2021-01-05")).expect("return");
    assert!((only - 0.10).abs() < 1e-12);
}

#[test]
fn missing_close_column_is_rejected() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("indices.csv");
    fs::write(&path, "date,open\n2021-01-04,100\n").expect("write");
    assert!(load_benchmark(&path, None).is_err());
}
