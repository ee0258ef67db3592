//! FILENAME: app/src/main.rs
// PURPOSE: Command line entry point.
// FORMAT: log lines are seq|level|category|message

use std::process::ExitCode;

fn main() -> ExitCode {
    app_lib::run()
}
