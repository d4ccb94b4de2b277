use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gridbt_core::errors::{ErrorInfo, SweepError};
use gridbt_core::value::{Config, Scalar};
use gridbt_data::{Bar, Dataset, TradeRecord};
use gridbt_exp::{expand, SweepSpec};
use gridbt_run::{run_sweep, Evaluator, ReferenceEvaluator, RunOpts, SweepPaths, UnitState};

fn day(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("date")
}

fn sample_dataset(universe: &str) -> Dataset {
    let bars = vec![
        Bar {
            date: day("2021-01-04"),
            symbol: "ACME".to_string(),
            open: 10.0,
            high: 11.0,
            low: 9.5,
            close: 10.5,
            volume: 1000.0,
        },
        Bar {
            date: day("2021-01-05"),
            symbol: "ACME".to_string(),
            open: 10.5,
            high: 10.5,
            low: 10.0,
            close: 10.2,
            volume: 900.0,
        },
    ];
    Dataset::new(universe, bars)
}

fn sample_inputs() -> (BTreeMap<String, Dataset>, Vec<Config>) {
    let mut datasets = BTreeMap::new();
    datasets.insert("nifty50".to_string(), sample_dataset("nifty50"));
    datasets.insert("midcap".to_string(), sample_dataset("midcap"));
    let spec = SweepSpec::from_yaml_str("window: [2, 3]\nquantity: 10\n").expect("classify");
    let configs = expand(&spec).expect("expand");
    (datasets, configs)
}

fn artifact_bytes(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut bytes = BTreeMap::new();
    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        let entry = entry.expect("walk");
        if entry.file_type().is_file() {
            let path = entry.path().to_path_buf();
            bytes.insert(path.clone(), fs::read(&path).expect("read"));
        }
    }
    bytes
}

#[test]
fn sweep_persists_every_unit_under_its_identifier() {
    let (datasets, configs) = sample_inputs();
    let temp = tempfile::tempdir().expect("tmp dir");
    let paths = SweepPaths::under(temp.path());

    let report = run_sweep(
        &datasets,
        &configs,
        &ReferenceEvaluator,
        &paths,
        &RunOpts::default(),
    )
    .expect("sweep");

    assert_eq!(report.submitted, 4);
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.failed, 0);
    for unit in &report.units {
        assert!(paths.params_file(&unit.identifier).exists());
        assert!(paths.result_file(&unit.universe, &unit.identifier).exists());
        assert_eq!(unit.rows, 2);
    }
    assert!(temp.path().join("sweep_report.json").exists());
}

#[test]
fn rerunning_the_sweep_reproduces_artifacts_byte_for_byte() {
    let (datasets, configs) = sample_inputs();
    let temp = tempfile::tempdir().expect("tmp dir");
    let paths = SweepPaths::under(temp.path());
    let opts = RunOpts::default();

    run_sweep(&datasets, &configs, &ReferenceEvaluator, &paths, &opts).expect("first run");
    let first = artifact_bytes(&paths.params_dir);
    let first_results = artifact_bytes(&paths.results_dir);

    run_sweep(&datasets, &configs, &ReferenceEvaluator, &paths, &opts).expect("second run");
    assert_eq!(first, artifact_bytes(&paths.params_dir));
    assert_eq!(first_results, artifact_bytes(&paths.results_dir));
}

struct PoisonedEvaluator;

impl Evaluator for PoisonedEvaluator {
    fn evaluate(
        &self,
        dataset: &Dataset,
        config: &Config,
    ) -> Result<Vec<TradeRecord>, SweepError> {
        if config.get("window") == Some(&Scalar::Int(3)) {
            return Err(SweepError::Evaluation(ErrorInfo::new(
                "forced_failure",
                "degenerate configuration",
            )));
        }
        ReferenceEvaluator.evaluate(dataset, config)
    }
}

#[test]
fn one_failing_configuration_does_not_abort_siblings() {
    let (datasets, configs) = sample_inputs();
    let temp = tempfile::tempdir().expect("tmp dir");
    let paths = SweepPaths::under(temp.path());

    let report = run_sweep(
        &datasets,
        &configs,
        &PoisonedEvaluator,
        &paths,
        &RunOpts::default(),
    )
    .expect("sweep");

    // window=3 fails in both universes; window=2 completes in both.
    assert_eq!(report.submitted, 4);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 2);
    for unit in &report.units {
        match unit.status.state {
            UnitState::Complete => {
                assert!(paths.result_file(&unit.universe, &unit.identifier).exists());
            }
            UnitState::Failed => {
                assert!(unit.status.error.is_some());
                assert!(!paths.result_file(&unit.universe, &unit.identifier).exists());
            }
        }
    }
    let failed: Vec<_> = report.failed_units().collect();
    assert_eq!(failed.len(), 2);
}

#[test]
fn shared_configurations_reuse_one_params_artifact() {
    let (datasets, configs) = sample_inputs();
    let temp = tempfile::tempdir().expect("tmp dir");
    let paths = SweepPaths::under(temp.path());

    run_sweep(
        &datasets,
        &configs,
        &ReferenceEvaluator,
        &paths,
        &RunOpts::default(),
    )
    .expect("sweep");

    // Two universes share the same two configurations: two params files,
    // four result files.
    let params = artifact_bytes(&paths.params_dir);
    assert_eq!(params.len(), 2);
    let results = artifact_bytes(&paths.results_dir);
    assert_eq!(results.len(), 4);
}
