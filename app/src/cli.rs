//! FILENAME: app/src/cli.rs
// PURPOSE: Command line front end.
// CONTEXT: Loads inputs into a fresh AppState, applies view flags, runs one
// command and prints its JSON result on stdout.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use pivot_engine::SortDirection;

use crate::api_types::ViewOptionsUpdate;
use crate::commands;
use crate::config::AppConfig;
use crate::logging;
use crate::{create_app_state, log_error, log_info, log_warn, AppState};

#[derive(Parser)]
#[command(name = "wordbags", version, about = "Word-group count tables over a document corpus")]
struct Cli {
    /// Configuration file (default: wordbags.toml in the working directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    inputs: Inputs,

    #[command(flatten)]
    view: ViewArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Session file to start from. Other inputs replace its parts.
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Corpus table (JSON).
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Word-group file (JSON).
    #[arg(long, global = true)]
    wordbags: Option<PathBuf>,

    /// Evaluation response (JSON).
    #[arg(long, global = true)]
    evaluation: Option<PathBuf>,
}

#[derive(Args)]
struct ViewArgs {
    /// Sort key: total, title, authors, year, dhlabid, urn, row, a word-group
    /// name or a year column key.
    #[arg(long, global = true)]
    sort: Option<String>,

    #[arg(long, global = true, value_enum)]
    dir: Option<DirArg>,

    /// Pivot to one row per word-group with a column per year bin.
    #[arg(long, global = true)]
    pivot: bool,

    /// Back to one row per document (e.g. over a pivoted session).
    #[arg(long, global = true, conflicts_with = "pivot")]
    no_pivot: bool,

    /// Years per bin when pivoting.
    #[arg(long, global = true)]
    bin: Option<f64>,

    /// Add percent-of-year columns when pivoting.
    #[arg(long, global = true)]
    percent: bool,

    #[arg(long, global = true, conflicts_with = "percent")]
    no_percent: bool,

    /// Drop rows whose total is below this.
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Rows per page (0 for all).
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Zero-based page index.
    #[arg(long, global = true)]
    page: Option<usize>,

    /// Leave a word-group out of the chart (repeatable).
    #[arg(long, global = true)]
    hide: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirArg {
    Asc,
    Desc,
}

impl From<DirArg> for SortDirection {
    fn from(dir: DirArg) -> Self {
        match dir {
            DirArg::Asc => SortDirection::Asc,
            DirArg::Desc => SortDirection::Desc,
        }
    }
}

impl ViewArgs {
    fn to_update(&self) -> ViewOptionsUpdate {
        ViewOptionsUpdate {
            sort_key: self.sort.clone(),
            sort_dir: self.dir.map(SortDirection::from),
            total_threshold: self.threshold,
            pivot_by_year: switch(self.pivot, self.no_pivot),
            year_bin_size: self.bin,
            show_percent: switch(self.percent, self.no_percent),
            page_size: self.page_size,
            page_index: self.page,
            hidden_series: (!self.hide.is_empty()).then(|| self.hide.clone()),
        }
    }
}

/// An on/off flag pair; neither leaves the setting alone.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the derived table as JSON.
    Table,
    /// Print the year chart series as JSON.
    Chart,
    /// Write the derived table to an XLSX file.
    ExportXlsx {
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the normalized word-groups, or write them with --out.
    Wordbags {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Save or inspect sessions.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Print summary statistics for the derived table.
    Summary,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Save the loaded inputs and view options.
    Save {
        #[arg(long)]
        out: PathBuf,
    },
    /// Describe what is loaded.
    Show,
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Parses the process arguments and runs one command.
pub fn run() -> ExitCode {
    match execute_args(std::env::args_os()) {
        Ok(Some(output)) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!("CLI", "{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs one command line. Returns the text to print, if any.
pub fn execute_args<I, T>(args: I) -> Result<Option<String>, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config)?;

    let state = create_app_state(&config);
    load_inputs(&state, &cli.inputs)?;
    commands::update_view_options(&state, &cli.view.to_update())?;

    match cli.command {
        Commands::Table => to_json(&commands::get_table_view(&state)?).map(Some),
        Commands::Chart => to_json(&commands::get_chart(&state)?).map(Some),
        Commands::Summary => to_json(&commands::get_summary(&state)?).map(Some),
        Commands::ExportXlsx { out } => {
            commands::export_table_xlsx(&state, &out)?;
            Ok(None)
        }
        Commands::Wordbags { out: Some(out) } => {
            commands::export_wordbags(&state, &out)?;
            Ok(None)
        }
        Commands::Wordbags { out: None } => {
            let wordbags = state.wordbags.lock().map_err(|e| e.to_string())?;
            to_json(&persistence::export_wordbags(&wordbags)).map(Some)
        }
        Commands::Session { action: SessionAction::Save { out } } => {
            commands::save_session(&state, &out)?;
            Ok(None)
        }
        Commands::Session { action: SessionAction::Show } => {
            to_json(&commands::get_session_summary(&state)?).map(Some)
        }
    }
}

fn init_logging(config: &AppConfig) -> Result<(), String> {
    logging::set_echo(config.echo_logs);
    if let Some(path) = &config.log_file {
        logging::init_log_file(path)?;
    }
    if let Err(e) = logging::install_log_bridge(config.level_filter()) {
        // a second run in the same process keeps the first bridge
        log_warn!("SYS", "{}", e);
    }
    log_info!("SYS", "wordbags {} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn load_inputs(state: &AppState, inputs: &Inputs) -> Result<(), String> {
    if let Some(path) = &inputs.session {
        commands::open_session(state, path)?;
    }
    if let Some(path) = &inputs.corpus {
        commands::load_corpus(state, path)?;
    }
    if let Some(path) = &inputs.wordbags {
        commands::load_wordbags(state, path)?;
    }
    if let Some(path) = &inputs.evaluation {
        commands::load_evaluation(state, path)?;
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize output: {}", e))
}
