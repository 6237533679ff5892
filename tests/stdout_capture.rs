//! The process-wide pipeline writes to the real stdout, so this test runs
//! itself again as a child process and reads back what the child printed.

use std::process::Command;

use serde_json::Value;
use structured_logging::{logging_flush, AppContext, StructuredLogging, LOG_LEVEL_CONFIG_KEY};

const CHILD_ENV: &str = "STRUCTURED_LOGGING_STDOUT_CHILD";

fn emit_to_stdout() {
    StructuredLogging::new()
        .get_logger()
        .info("lazy facade on stdout")
        .unwrap();

    let app = AppContext::new().with_config(LOG_LEVEL_CONFIG_KEY, "WARNING");
    let slog = StructuredLogging::attach(&app).unwrap();
    slog.get_logger().info("hidden").unwrap();
    slog.get_logger().warn("attached facade on stdout").unwrap();

    logging_flush().unwrap();
}

/// JSON records in the child's stdout. The harness may print its own text on
/// the same line before the first record.
fn records(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .filter_map(|line| line.find("{\"").map(|pos| &line[pos..]))
        .map(|json| serde_json::from_str(json).unwrap())
        .collect()
}

#[test]
fn global_pipeline_writes_json_lines_to_stdout() {
    if std::env::var_os(CHILD_ENV).is_some() {
        emit_to_stdout();
        return;
    }

    let output = Command::new(std::env::current_exe().unwrap())
        .args([
            "global_pipeline_writes_json_lines_to_stdout",
            "--exact",
            "--nocapture",
            "--test-threads=1",
        ])
        .env(CHILD_ENV, "1")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "child failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let records = records(&stdout);
    assert_eq!(records.len(), 2, "stdout was: {}", stdout);

    assert_eq!(records[0]["severity"], "info");
    assert_eq!(records[0]["message"], "lazy facade on stdout");
    assert!(records[0]["timestamp"].is_string());

    assert_eq!(records[1]["severity"], "warning");
    assert_eq!(records[1]["message"], "attached facade on stdout");
    assert!(!stdout.contains("\"hidden\""));
}
