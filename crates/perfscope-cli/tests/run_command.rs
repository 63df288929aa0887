use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

// Nothing listens on port 1, so every connection attempt is refused
const UNREACHABLE_CDP: &str = "http://127.0.0.1:1";

#[allow(deprecated)]
fn get_perfscope_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("perfscope")
}

#[test]
fn test_help_lists_options() {
    let mut cmd = Command::new(get_perfscope_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("page-load performance"))
        .stdout(predicate::str::contains("--cache"))
        .stdout(predicate::str::contains("--runs"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--cdp-url"))
        .stdout(predicate::str::contains("--wait"))
        .stdout(predicate::str::contains("--headers"));
}

#[test]
fn test_url_is_required() {
    let mut cmd = Command::new(get_perfscope_bin());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[test]
fn test_invalid_cache_mode_rejected() {
    let mut cmd = Command::new(get_perfscope_bin());
    cmd.arg("https://example.com").arg("--cache").arg("lukewarm");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'lukewarm'"));
}

#[test]
fn test_zero_runs_rejected() {
    let mut cmd = Command::new(get_perfscope_bin());
    cmd.arg("https://example.com").arg("--runs").arg("0");

    cmd.assert().failure();
}

#[test]
fn test_invalid_url_rejected() {
    let mut cmd = Command::new(get_perfscope_bin());
    cmd.arg("not a url");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL"));
}

#[test]
fn test_unreachable_browser_still_writes_results() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("result.json");

    let mut cmd = Command::new(get_perfscope_bin());
    cmd.arg("https://example.com")
        .arg("--cdp-url")
        .arg(UNREACHABLE_CDP)
        .arg("--runs")
        .arg("1")
        .arg("--wait")
        .arg("0")
        .arg("--output")
        .arg(&output);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Run 1 failed"))
        .stdout(predicate::str::contains("Successful tests: 0/1"))
        .stderr(predicate::str::contains("All 1 runs failed"));

    let content = std::fs::read_to_string(&output).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["test_config"]["url"], "https://example.com");
    assert_eq!(report["test_config"]["cache_mode"], "warm");
    assert_eq!(report["results"].as_array().unwrap().len(), 0);
    assert_eq!(report["analysis"]["successful_tests"], 0);
}

#[test]
fn test_config_file_sets_endpoint_and_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let results_dir = dir.path().join("perf-results");
    let config_path = dir.path().join("perfscope.yaml");
    std::fs::write(
        &config_path,
        format!(
            "cdp_url: {}\nstabilization_time: 0\noutput_dir: {}\n",
            UNREACHABLE_CDP,
            results_dir.display()
        ),
    )
    .unwrap();

    let mut cmd = Command::new(get_perfscope_bin());
    cmd.arg("https://example.com/shop")
        .arg("--cache")
        .arg("cold")
        .arg("--config")
        .arg(&config_path)
        .arg("--wait")
        .arg("0");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains(format!(
            "CDP endpoint: {}",
            UNREACHABLE_CDP
        )));

    let written: Vec<_> = std::fs::read_dir(&results_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("detailed_perf_example.com_shop_cold_"));
    assert!(written[0].ends_with(".json"));
}
