//! Integration tests for the CLI application
//!
//! These tests run the compiled binary against diagram files written to
//! temporary locations.

use serde_json::Value;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

/// Helper to create test diagram files
struct TestDataFiles {
    pub text_file: NamedTempFile,
    pub json_file: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        // Three diagrams in the text format
        let mut text_file = NamedTempFile::new()?;
        writeln!(text_file, "# diagram 0")?;
        writeln!(text_file, "0.0 1.0")?;
        writeln!(text_file, "0.2 0.7")?;
        writeln!(text_file, "---")?;
        writeln!(text_file, "0.1 1.5")?;
        writeln!(text_file, "0.0 inf")?;
        writeln!(text_file, "---")?;
        writeln!(text_file, "0.4 2.0")?;
        writeln!(text_file, "0.5 0.6")?;
        text_file.flush()?;

        // Two diagrams in the JSON format
        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile()?;
        write!(json_file, "[[[0.0, 1.1]], [[0.3, 0.9], [0.1, 1.4]]]")?;
        json_file.flush()?;

        Ok(TestDataFiles {
            text_file,
            json_file,
        })
    }
}

/// Get the path to the compiled CLI binary
fn get_cli_binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_pdkernel")
}

fn run(args: &[&str]) -> Output {
    Command::new(get_cli_binary_path())
        .args(args)
        .output()
        .expect("Failed to run CLI command")
}

fn parse_stdout_matrix(output: &Output) -> Vec<Vec<f64>> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| {
            line.split_whitespace()
                .map(|v| v.parse().expect("Matrix entry should be a number"))
                .collect()
        })
        .collect()
}

#[test]
fn test_cli_compute_sliced_wasserstein_stdout() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "compute",
        "--input",
        test_data.text_file.path().to_str().unwrap(),
        "--metric",
        "sliced_wasserstein",
        "--bandwidth",
        "1.0",
        "--num-directions",
        "10",
    ]);

    assert!(
        output.status.success(),
        "Compute command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let matrix = parse_stdout_matrix(&output);
    assert_eq!(matrix.len(), 3);
    for (i, row) in matrix.iter().enumerate() {
        assert_eq!(row.len(), 3);
        assert_eq!(row[i], 1.0);
        for (j, &v) in row.iter().enumerate() {
            assert!(v > 0.0 && v <= 1.0);
            assert_eq!(v, matrix[j][i]);
        }
    }
}

#[test]
fn test_cli_compute_against_json_to_file() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let matrix_path = temp_dir.path().join("matrix.json");

    let output = run(&[
        "compute",
        "--input",
        test_data.text_file.path().to_str().unwrap(),
        "--against",
        test_data.json_file.path().to_str().unwrap(),
        "--metric",
        "persistence_weighted_gaussian",
        "--bandwidth",
        "0.5",
        "--weight",
        "arctan",
        "--arctan-c",
        "2.0",
        "--output",
        matrix_path.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "Compute command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(matrix_path.exists(), "Matrix file was not created");

    let saved: Value = serde_json::from_str(
        &std::fs::read_to_string(&matrix_path).expect("Failed to read matrix file"),
    )
    .expect("Matrix file should be valid JSON");
    assert_eq!(saved["rows"], 3);
    assert_eq!(saved["cols"], 2);
    assert_eq!(saved["values"].as_array().map(Vec::len), Some(6));
    assert_eq!(saved["metadata"]["metric"], "persistence_weighted_gaussian");
    assert_eq!(saved["metadata"]["params"]["weight"], "arctan");
}

#[test]
fn test_cli_info_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let matrix_path = temp_dir.path().join("matrix.json");

    let compute = run(&[
        "compute",
        "--input",
        test_data.json_file.path().to_str().unwrap(),
        "--metric",
        "persistence_fisher",
        "--bandwidth",
        "1.0",
        "--bandwidth-fisher",
        "0.5",
        "--output",
        matrix_path.to_str().unwrap(),
    ]);
    assert!(
        compute.status.success(),
        "Compute command failed: {}",
        String::from_utf8_lossy(&compute.stderr)
    );

    let output = run(&["info", matrix_path.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "Info command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Kernel Matrix Summary"));
    assert!(stdout.contains("persistence_fisher"));
    assert!(stdout.contains("Shape: 2 x 2"));
    assert!(stdout.contains("bandwidth_fisher"));
}

#[test]
fn test_cli_random_features() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "compute",
        "--input",
        test_data.text_file.path().to_str().unwrap(),
        "--metric",
        "persistence_scale_space",
        "--bandwidth",
        "1.0",
        "--approx-components",
        "200",
        "--seed",
        "7",
    ]);

    assert!(
        output.status.success(),
        "Compute command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(parse_stdout_matrix(&output).len(), 3);
}

#[test]
fn test_cli_missing_parameter() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "compute",
        "--input",
        test_data.text_file.path().to_str().unwrap(),
        "--metric",
        "persistence_fisher",
        "--bandwidth",
        "1.0",
    ]);

    assert!(!output.status.success(), "Command should fail without --bandwidth-fisher");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bandwidth_fisher"), "Unexpected error: {stderr}");
}

#[test]
fn test_cli_unknown_metric() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");

    let output = run(&[
        "compute",
        "--input",
        test_data.text_file.path().to_str().unwrap(),
        "--metric",
        "bottleneck",
        "--bandwidth",
        "1.0",
    ]);

    assert!(!output.status.success(), "Command should fail with unknown metric");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bottleneck"), "Unexpected error: {stderr}");
}

#[test]
fn test_cli_nonexistent_input() {
    let output = run(&[
        "compute",
        "--input",
        "/nonexistent/diagrams.txt",
        "--metric",
        "persistence_scale_space",
        "--bandwidth",
        "1.0",
    ]);

    assert!(!output.status.success(), "Command should fail with missing input file");
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("compute"));
    assert!(stdout.contains("info"));
}
