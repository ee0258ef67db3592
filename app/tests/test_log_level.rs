//! FILENAME: tests/test_log_level.rs
//! The configured log level applies to the app's own log lines.
//! Kept in its own test binary: the log file and level are process-wide.

mod common;

use app_lib::cli::execute_args;
use common::TestHarness;
use serde_json::Value;

#[test]
fn test_warn_level_drops_debug_and_info_lines() {
    let harness = TestHarness::new();
    let log_path = harness.path("run.log");

    let mut args = harness.novel_args();
    std::fs::write(
        harness.path("wordbags.toml"),
        format!("log_level = \"warn\"\nlog_file = \"{}\"\n", log_path.display()),
    )
    .unwrap();
    args.extend(["session".to_string(), "show".to_string()]);

    let shown: Value = serde_json::from_str(&execute_args(args).unwrap().unwrap()).unwrap();
    assert_eq!(shown["logFile"], log_path.display().to_string());

    let content = std::fs::read_to_string(&log_path).unwrap();
    assert!(!content.is_empty());
    for line in content.lines() {
        assert!(!line.contains("|D|") && !line.contains("|I|"), "{}", line);
    }
    // document 104 has no metadata
    assert!(content.contains("|W|CMD|"), "{}", content);
}
