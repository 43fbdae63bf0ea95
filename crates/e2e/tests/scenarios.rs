//! Runs the bundled YAML scenarios through the library API

use std::path::PathBuf;

use shopcheck_e2e::runner::RunnerConfig;
use shopcheck_e2e::{ScenarioRunner, ScenarioSpec};

fn specs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/specs")
}

fn runner(output: &std::path::Path) -> ScenarioRunner {
    ScenarioRunner::with_config(RunnerConfig {
        specs_dir: specs_dir(),
        output_dir: output.to_path_buf(),
        ..Default::default()
    })
}

#[test]
fn bundled_specs_parse() {
    let specs = ScenarioSpec::load_all(&specs_dir()).unwrap();
    assert!(specs.len() >= 9);

    let mut names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), specs.len(), "scenario names must be unique");
}

#[test]
fn bundled_specs_pass() {
    let out = tempfile::tempdir().unwrap();
    let runner = runner(out.path());

    let suite = runner.run_all().unwrap();
    let failures: Vec<_> = suite
        .results
        .iter()
        .filter(|r| !r.success)
        .map(|r| format!("{}: {}", r.name, r.error.as_deref().unwrap_or("")))
        .collect();
    assert!(failures.is_empty(), "failing scenarios: {:#?}", failures);
    assert_eq!(suite.passed, suite.total);

    let path = runner.write_results(&suite).unwrap();
    assert!(path.ends_with("scenario-results.json"));
}

#[test]
fn smoke_tag_selects_subset() {
    let out = tempfile::tempdir().unwrap();
    let runner = runner(out.path());

    let all = runner.run_all().unwrap();
    let smoke = runner.run_tagged("smoke").unwrap();
    assert_eq!(smoke.total, 3);
    assert!(smoke.total < all.total);
    assert_eq!(smoke.failed, 0);
}

#[test]
fn run_single_scenario_by_name() {
    let out = tempfile::tempdir().unwrap();
    let result = runner(out.path()).run_test("purchase-complete").unwrap();
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.steps.len(), 6);
}

#[test]
fn unknown_scenario_is_an_error() {
    let out = tempfile::tempdir().unwrap();
    assert!(runner(out.path()).run_test("no-such-scenario").is_err());
}
