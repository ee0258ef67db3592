//! FILENAME: app/src/commands.rs
//! PURPOSE: Commands over the shared application state.
//! CONTEXT: Each command locks what it needs, derives fresh output and
//! returns a serializable response. Errors are plain strings for display.

use std::path::Path;

use corpus::EvaluationResult;
use persistence::{common_namespace, SessionFile, ShapeHint};
use pivot_engine::{derive_view, extract_chart, SortKey, TableSummary, ViewOptions};

use crate::api_types::{ChartResponse, SessionSummary, TableResponse, ViewOptionsUpdate};
use crate::logging::get_log_path;
use crate::{log_debug, log_enter, log_exit, log_info, log_warn, AppState};

fn lock_err<T>(e: std::sync::PoisonError<T>) -> String {
    format!("State lock poisoned: {}", e)
}

// ============================================================================
// LOADING
// ============================================================================

/// Loads a corpus table and re-indexes metadata in its preferred namespace.
pub fn load_corpus(state: &AppState, path: &Path) -> Result<SessionSummary, String> {
    log_enter!("CMD", "load_corpus", "path={}", path.display());

    let corpus = persistence::load_corpus(path).map_err(|e| e.to_string())?;
    let namespace = corpus.preferred_namespace();
    {
        *state.metadata.lock().map_err(lock_err)? = corpus.metadata_index(namespace);
        *state.namespace.lock().map_err(lock_err)? = namespace;
        *state.corpus.lock().map_err(lock_err)? = corpus;
    }

    let summary = get_session_summary(state)?;
    log_exit!("CMD", "load_corpus", "documents={} namespace={:?}", summary.document_count, namespace);
    Ok(summary)
}

pub fn load_wordbags(state: &AppState, path: &Path) -> Result<Vec<String>, String> {
    log_enter!("CMD", "load_wordbags", "path={}", path.display());

    let wordbags = persistence::load_wordbags(path).map_err(|e| e.to_string())?;
    let names: Vec<String> = wordbags.iter().map(|w| w.name.clone()).collect();
    *state.wordbags.lock().map_err(lock_err)? = wordbags;

    log_exit!("CMD", "load_wordbags", "count={}", names.len());
    Ok(names)
}

/// Loads an evaluation response. When every result id belongs to the other
/// namespace, metadata is re-indexed under that namespace.
pub fn load_evaluation(state: &AppState, path: &Path) -> Result<SessionSummary, String> {
    log_enter!("CMD", "load_evaluation", "path={}", path.display());

    let hint = ShapeHint::from_wordbags(&state.wordbags.lock().map_err(lock_err)?);
    let result = persistence::load_evaluation(path, &hint).map_err(|e| e.to_string())?;
    set_evaluation(state, result)?;

    let summary = get_session_summary(state)?;
    log_exit!("CMD", "load_evaluation", "documents={}", summary.evaluated_count);
    Ok(summary)
}

/// Installs an evaluation result and resets paging.
pub fn set_evaluation(state: &AppState, result: EvaluationResult) -> Result<(), String> {
    let detected = common_namespace(result.document_ids().map(String::as_str));
    let current = *state.namespace.lock().map_err(lock_err)?;

    if let Some(ns) = detected.filter(|ns| *ns != current) {
        log_info!("CMD", "evaluation ids are {:?}, switching metadata namespace from {:?}", ns, current);
        let corpus = state.corpus.lock().map_err(lock_err)?;
        *state.metadata.lock().map_err(lock_err)? = corpus.metadata_index(ns);
        *state.namespace.lock().map_err(lock_err)? = ns;
    }

    let missing = {
        let metadata = state.metadata.lock().map_err(lock_err)?;
        result.document_ids().filter(|id| metadata.lookup(id).is_none()).count()
    };
    if missing > 0 {
        log_warn!("CMD", "{} evaluated documents have no metadata", missing);
    }

    *state.result.lock().map_err(lock_err)? = Some(result);
    state.view.lock().map_err(lock_err)?.page_index = 0;
    Ok(())
}

// ============================================================================
// SESSIONS
// ============================================================================

pub fn open_session(state: &AppState, path: &Path) -> Result<SessionSummary, String> {
    log_enter!("CMD", "open_session", "path={}", path.display());

    let session = SessionFile::load(path).map_err(|e| e.to_string())?;
    {
        *state.metadata.lock().map_err(lock_err)? = session.metadata_index();
        *state.namespace.lock().map_err(lock_err)? = session.namespace;
        *state.corpus.lock().map_err(lock_err)? = session.corpus;
        *state.wordbags.lock().map_err(lock_err)? = session.wordbags;
        *state.result.lock().map_err(lock_err)? = session.result;
        *state.view.lock().map_err(lock_err)? = session.view;
    }

    let summary = get_session_summary(state)?;
    log_exit!("CMD", "open_session", "documents={}", summary.document_count);
    Ok(summary)
}

pub fn save_session(state: &AppState, path: &Path) -> Result<(), String> {
    log_enter!("CMD", "save_session", "path={}", path.display());

    let session = SessionFile {
        version: persistence::SESSION_VERSION,
        namespace: *state.namespace.lock().map_err(lock_err)?,
        corpus: state.corpus.lock().map_err(lock_err)?.clone(),
        wordbags: state.wordbags.lock().map_err(lock_err)?.clone(),
        result: state.result.lock().map_err(lock_err)?.clone(),
        view: state.view.lock().map_err(lock_err)?.clone(),
    };
    session.save(path).map_err(|e| e.to_string())?;

    log_exit!("CMD", "save_session");
    Ok(())
}

pub fn get_session_summary(state: &AppState) -> Result<SessionSummary, String> {
    let result = state.result.lock().map_err(lock_err)?;
    Ok(SessionSummary {
        namespace: *state.namespace.lock().map_err(lock_err)?,
        document_count: state.corpus.lock().map_err(lock_err)?.len(),
        indexed_count: state.metadata.lock().map_err(lock_err)?.len(),
        wordbag_names: state.wordbags.lock().map_err(lock_err)?.iter().map(|w| w.name.clone()).collect(),
        has_result: result.is_some(),
        evaluated_count: result.as_ref().map(|r| r.len()).unwrap_or(0),
        log_file: get_log_path().map(|p| p.display().to_string()),
    })
}

// ============================================================================
// VIEW
// ============================================================================

pub fn get_view_options(state: &AppState) -> Result<ViewOptions, String> {
    Ok(state.view.lock().map_err(lock_err)?.clone())
}

pub fn update_view_options(state: &AppState, update: &ViewOptionsUpdate) -> Result<ViewOptions, String> {
    let mut view = state.view.lock().map_err(lock_err)?;
    *view = update.apply(&view);
    log_debug!("CMD", "view options now {:?}", *view);
    Ok(view.clone())
}

/// Header click: same key flips direction, a new key takes its default.
pub fn sort_by(state: &AppState, key: &str) -> Result<ViewOptions, String> {
    let mut view = state.view.lock().map_err(lock_err)?;
    *view = view.select_sort(SortKey::new(key));
    log_debug!("CMD", "sort_by key={} dir={:?}", key, view.sort_dir);
    Ok(view.clone())
}

pub fn toggle_series(state: &AppState, id: &str) -> Result<ViewOptions, String> {
    let mut view = state.view.lock().map_err(lock_err)?;
    *view = view.toggle_series(id);
    Ok(view.clone())
}

/// Derives the table for the current state. With no evaluation result the
/// table is empty.
pub fn get_table_view(state: &AppState) -> Result<TableResponse, String> {
    log_enter!("CMD", "get_table_view");

    let options = get_view_options(state)?;
    let empty = EvaluationResult::new();
    let result_guard = state.result.lock().map_err(lock_err)?;
    let result = result_guard.as_ref().unwrap_or(&empty);
    let metadata = state.metadata.lock().map_err(lock_err)?;

    let view = derive_view(result, &metadata, &options);

    log_exit!(
        "CMD",
        "get_table_view",
        "mode={:?} rows={} of {}",
        view.mode,
        view.rows.len(),
        view.total_row_count
    );
    Ok(TableResponse { options, view })
}

/// Chart series for the current state. Charts always use the pivoted
/// table, whatever the current table mode.
pub fn get_chart(state: &AppState) -> Result<ChartResponse, String> {
    log_enter!("CMD", "get_chart");

    let mut options = get_view_options(state)?;
    options.pivot_by_year = true;

    let empty = EvaluationResult::new();
    let result_guard = state.result.lock().map_err(lock_err)?;
    let result = result_guard.as_ref().unwrap_or(&empty);
    let metadata = state.metadata.lock().map_err(lock_err)?;

    let view = derive_view(result, &metadata, &options);
    let chart = extract_chart(&view, &options.hidden_series, options.show_percent);

    log_exit!("CMD", "get_chart", "series={} years={}", chart.series.len(), chart.years.len());
    Ok(ChartResponse { options, chart })
}

pub fn get_summary(state: &AppState) -> Result<TableSummary, String> {
    Ok(get_table_view(state)?.view.summary)
}

// ============================================================================
// EXPORT
// ============================================================================

pub fn export_table_xlsx(state: &AppState, path: &Path) -> Result<(), String> {
    log_enter!("CMD", "export_table_xlsx", "path={}", path.display());

    let response = get_table_view(state)?;
    let metadata = state.metadata.lock().map_err(lock_err)?;
    persistence::save_table_xlsx(&response.view, &metadata, path).map_err(|e| e.to_string())?;

    log_exit!("CMD", "export_table_xlsx", "rows={}", response.view.rows.len());
    Ok(())
}

pub fn export_wordbags(state: &AppState, path: &Path) -> Result<(), String> {
    let wordbags = state.wordbags.lock().map_err(lock_err)?;
    persistence::save_wordbags(&wordbags, path).map_err(|e| e.to_string())?;
    log_info!("CMD", "exported {} word-groups to {}", wordbags.len(), path.display());
    Ok(())
}
