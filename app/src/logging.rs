//! FILENAME: app/src/logging.rs
// PURPOSE: Unified logging system for the application.
// FORMAT: seq|level|category|message
// CONTEXT: Library crates log through the `log` facade; LogBridge routes
// those records into the same file so one sequence covers everything.

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use once_cell::sync::Lazy;

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

/// Global sequence counter
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Global log file handle
pub static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Path of the open log file
static LOG_PATH: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

/// Mirror every line to stderr. stdout is reserved for command output.
static ECHO: AtomicBool = AtomicBool::new(false);

/// Most verbose level written, as a `log::LevelFilter` discriminant.
static MAX_LEVEL: AtomicUsize = AtomicUsize::new(log::LevelFilter::Trace as usize);

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

pub fn set_echo(enabled: bool) {
    ECHO.store(enabled, Ordering::SeqCst);
}

/// Lines less severe than `level` are dropped, from the macros and the
/// facade bridge alike.
pub fn set_max_level(level: log::LevelFilter) {
    MAX_LEVEL.store(level as usize, Ordering::SeqCst);
}

/// Whether a line with the given level code ("E", "W", "I", "D") is written.
pub fn level_enabled(level: &str) -> bool {
    let rank = match level {
        "E" => log::LevelFilter::Error,
        "W" => log::LevelFilter::Warn,
        "D" => log::LevelFilter::Debug,
        _ => log::LevelFilter::Info,
    };
    rank as usize <= MAX_LEVEL.load(Ordering::SeqCst)
}

/// Get the path of the open log file
pub fn get_log_path() -> Option<PathBuf> {
    LOG_PATH.lock().ok().and_then(|guard| guard.clone())
}

/// Initialize the unified log file, truncating any previous run.
pub fn init_log_file(log_path: &Path) -> Result<PathBuf, String> {
    if let Some(dir) = log_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create log dir at {:?}: {}", dir, e))?;
        }
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(log_path)
        .map_err(|e| format!("Failed to create log file {:?}: {}", log_path, e))?;

    let mut log_file = LOG_FILE.lock()
        .map_err(|e| format!("Lock error: {}", e))?;
    *log_file = Some(file);

    if let Ok(mut guard) = LOG_PATH.lock() {
        *guard = Some(log_path.to_path_buf());
    }

    Ok(log_path.to_path_buf())
}

/// Write a log line in unified format
pub fn write_log(level: &str, category: &str, message: &str) {
    if !level_enabled(level) {
        return;
    }
    let seq = next_seq();
    let line = format!("{}|{}|{}|{}", seq, level, category, message);

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            if let Err(e) = writeln!(file, "{}", line) {
                eprintln!("[LOG_ERROR] Failed to write: {}", e);
            }
            let _ = file.flush();
        }
    }

    if ECHO.load(Ordering::SeqCst) {
        eprintln!("{}", line);
    }
}

/// Write an ENTER log line for function entry
pub fn write_log_enter(level: &str, category: &str, func_name: &str, params: &str) {
    let message = if params.is_empty() {
        format!("ENTER {}", func_name)
    } else {
        format!("ENTER {} {}", func_name, params)
    };
    write_log(level, category, &message);
}

/// Write an EXIT log line for function exit
pub fn write_log_exit(level: &str, category: &str, func_name: &str, result: &str) {
    let message = if result.is_empty() {
        format!("EXIT {}", func_name)
    } else {
        format!("EXIT {} {}", func_name, result)
    };
    write_log(level, category, &message);
}

// ============================================================================
// LOG FACADE BRIDGE
// ============================================================================

/// Routes `log` records from the library crates into the unified log.
pub struct LogBridge {
    level: log::LevelFilter,
}

impl LogBridge {
    pub fn new(level: log::LevelFilter) -> Self {
        LogBridge { level }
    }
}

/// Short category for a record's module target.
fn category_for(target: &str) -> &'static str {
    match target.split("::").next().unwrap_or(target) {
        "pivot_engine" => "ENGINE",
        "persistence" => "IO",
        "corpus" => "CORPUS",
        "app_lib" | "wordbags" => "APP",
        _ => "LIB",
    }
}

fn level_code(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "E",
        log::Level::Warn => "W",
        log::Level::Info => "I",
        log::Level::Debug | log::Level::Trace => "D",
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            write_log(
                level_code(record.level()),
                category_for(record.target()),
                &record.args().to_string(),
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                let _ = file.flush();
            }
        }
    }
}

/// Installs the bridge as the global `log` logger and applies `level`.
/// Only the first install wins, but the level is applied every time.
pub fn install_log_bridge(level: log::LevelFilter) -> Result<(), String> {
    set_max_level(level);
    log::set_max_level(level);
    log::set_boxed_logger(Box::new(LogBridge::new(log::LevelFilter::Trace)))
        .map_err(|e| format!("Logger already installed: {}", e))
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("D", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("I", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("W", $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log("E", $cat, &format!($($arg)*))
    };
}

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_enter("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_enter("D", $cat, $func, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_exit("D", $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_exit("D", $cat, $func, &format!($($arg)*))
    };
}

pub use log_debug;
pub use log_info;
pub use log_warn;
pub use log_error;
pub use log_enter;
pub use log_exit;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = next_seq();
        let b = next_seq();
        assert!(b > a);
    }

    #[test]
    fn test_category_for_targets() {
        assert_eq!(category_for("pivot_engine::engine"), "ENGINE");
        assert_eq!(category_for("persistence::session"), "IO");
        assert_eq!(category_for("corpus"), "CORPUS");
        assert_eq!(category_for("hyper::client"), "LIB");
    }

    #[test]
    fn test_level_codes_rank_by_severity() {
        set_max_level(log::LevelFilter::Warn);
        assert!(level_enabled("E"));
        assert!(level_enabled("W"));
        assert!(!level_enabled("I"));
        assert!(!level_enabled("D"));

        set_max_level(log::LevelFilter::Trace);
        assert!(level_enabled("D"));
    }

    #[test]
    fn test_bridge_respects_level() {
        use log::Log;
        let bridge = LogBridge::new(log::LevelFilter::Warn);
        let warn = log::Metadata::builder().level(log::Level::Warn).build();
        let debug = log::Metadata::builder().level(log::Level::Debug).build();
        assert!(bridge.enabled(&warn));
        assert!(!bridge.enabled(&debug));
    }
}
