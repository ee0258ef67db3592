//! FILENAME: app/src/lib.rs
// PURPOSE: Main library entry point.
// CONTEXT: Holds the application state shared by the commands and the CLI.

use std::sync::Mutex;

use corpus::{Corpus, EvaluationResult, IdNamespace, MetadataIndex, WordGroup};
use pivot_engine::ViewOptions;

pub mod api_types;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use api_types::{ChartResponse, SessionSummary, TableResponse, ViewOptionsUpdate};
pub use cli::run;
pub use config::{AppConfig, ViewDefaults};
pub use logging::{get_log_path, init_log_file, install_log_bridge, next_seq, set_max_level, write_log};

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Everything loaded into one working session. Tables and charts are never
/// stored here; they are derived on request from these inputs.
pub struct AppState {
    pub corpus: Mutex<Corpus>,
    /// Namespace the metadata index and evaluation result are keyed by
    pub namespace: Mutex<IdNamespace>,
    pub metadata: Mutex<MetadataIndex>,
    pub wordbags: Mutex<Vec<WordGroup>>,
    /// None until an evaluation has been loaded
    pub result: Mutex<Option<EvaluationResult>>,
    pub view: Mutex<ViewOptions>,
}

pub fn create_app_state(config: &AppConfig) -> AppState {
    log_info!("SYS", "Creating AppState");
    let namespace = IdNamespace::default();
    AppState {
        corpus: Mutex::new(Corpus::new()),
        namespace: Mutex::new(namespace),
        metadata: Mutex::new(MetadataIndex::new(namespace)),
        wordbags: Mutex::new(Vec::new()),
        result: Mutex::new(None),
        view: Mutex::new(config.view.view_options()),
    }
}

impl Default for AppState {
    fn default() -> Self {
        create_app_state(&AppConfig::default())
    }
}
