//! Integration tests for output formatting
//!
//! These run the built binary and check JSON output, config layering, and
//! error reporting. None of them need the analysis service.

use std::io::Write;
use std::process::{Command, Output};

fn citytrotter(args: &[&str]) -> Output {
    let workdir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_citytrotter"))
        .args(args)
        .current_dir(workdir.path())
        .env_remove("CITYTROTTER_API_URL")
        .env_remove("VITE_API_URL")
        .env_remove("CITYTROTTER_DEBOUNCE_MS")
        .env_remove("CITYTROTTER_REQUEST_TIMEOUT_SECS")
        .output()
        .expect("Failed to execute command")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

#[test]
fn test_footprint_json_output_is_valid() {
    let output = citytrotter(&["footprint", "--lat", "33.749", "--lng", "-84.388", "--json"]);
    assert!(output.status.success());

    let parsed = stdout_json(&output);
    assert_eq!(parsed["status"], "success");

    let data = &parsed["data"];
    let ring = data["ring"].as_array().expect("ring should be an array");
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], ring[4]);
    assert_eq!(data["valid"], true);
    assert_eq!(data["side_length_ft"], 50.0);
    assert_eq!(data["feature"]["geometry"]["type"], "Polygon");

    let centroid = data["centroid"].as_array().expect("centroid should be [lng, lat]");
    assert!((centroid[0].as_f64().unwrap() - -84.388).abs() < 1e-9);
    assert!((centroid[1].as_f64().unwrap() - 33.749).abs() < 1e-9);
}

#[test]
fn test_footprint_human_output_lists_corners() {
    let output = citytrotter(&["footprint", "--lat", "33.749", "--lng", "-84.388", "--area", "6400"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bottom-left"));
    assert!(stdout.contains("top-left"));
    assert!(stdout.contains("80.0 ft"));
}

#[test]
fn test_config_reports_sources() {
    let output = citytrotter(&["config", "--json", "--api-url", "http://analysis.test:9000/"]);
    assert!(output.status.success());

    let data = &stdout_json(&output)["data"];
    assert_eq!(data["api_url"]["value"], "http://analysis.test:9000");
    assert_eq!(data["api_url"]["source"], "Cli");
    assert_eq!(data["debounce_ms"]["value"], 1500);
    assert_eq!(data["debounce_ms"]["source"], "Default");
    assert!(data["config_file"].is_null());
}

#[test]
fn test_config_file_is_layered_under_cli_flags() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "api_url = \"http://file.test:8000\"\ndebounce_ms = 900").unwrap();
    let path = file.path().to_str().unwrap();

    let output = citytrotter(&["config", "--json", "--config", path, "--timeout", "5"]);
    assert!(output.status.success());

    let data = &stdout_json(&output)["data"];
    assert_eq!(data["api_url"]["value"], "http://file.test:8000");
    assert_eq!(data["api_url"]["source"], "File");
    assert_eq!(data["debounce_ms"]["value"], 900);
    assert_eq!(data["request_timeout_secs"]["value"], 5);
    assert_eq!(data["request_timeout_secs"]["source"], "Cli");
}

#[test]
fn test_invalid_parameters_fail_before_any_request() {
    // Nothing listens on the discard port; validation must fail first
    let output = citytrotter(&[
        "analyze",
        "--lat",
        "33.749",
        "--lng",
        "-84.388",
        "--stories",
        "40",
        "--api-url",
        "http://127.0.0.1:9",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid building placement"), "stderr: {stderr}");
}

#[test]
fn test_unreachable_service_is_reported() {
    let output = citytrotter(&["health", "--api-url", "http://127.0.0.1:9", "--timeout", "2"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot reach the analysis service"), "stderr: {stderr}");
}

#[test]
fn test_json_errors_are_structured() {
    let output = citytrotter(&[
        "analyze",
        "--lat",
        "95",
        "--lng",
        "-84.388",
        "--json",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let start = stderr.find('{').expect("stderr should contain a JSON error");
    let parsed: serde_json::Value = serde_json::from_str(&stderr[start..]).unwrap();
    assert_eq!(parsed["status"], "error");
}
