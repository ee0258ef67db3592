//! FILENAME: app/src/config.rs
// PURPOSE: Application configuration.
// CONTEXT: Figment merges built-in defaults, then `wordbags.toml` (or the
// file given with --config), then `WORDBAGS_*` environment variables.
// Nested keys use a double underscore: WORDBAGS_VIEW__PAGE_SIZE=100.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use pivot_engine::{SortDirection, SortKey, ViewOptions, DEFAULT_PAGE_SIZE};

pub const DEFAULT_CONFIG_FILE: &str = "wordbags.toml";
pub const ENV_PREFIX: &str = "WORDBAGS_";

// ============================================================================
// CONFIG TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Unified log file. None disables the file log.
    pub log_file: Option<PathBuf>,
    /// One of off, error, warn, info, debug, trace.
    pub log_level: String,
    /// Mirror log lines to stderr.
    pub echo_logs: bool,
    pub view: ViewDefaults,
}

/// Starting view options for a fresh session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefaults {
    pub page_size: usize,
    pub year_bin_size: f64,
    pub sort_key: String,
    pub sort_dir: SortDirection,
    pub total_threshold: f64,
    pub show_percent: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_file: None,
            log_level: "info".to_string(),
            echo_logs: false,
            view: ViewDefaults::default(),
        }
    }
}

impl Default for ViewDefaults {
    fn default() -> Self {
        ViewDefaults {
            page_size: DEFAULT_PAGE_SIZE,
            year_bin_size: 1.0,
            sort_key: SortKey::TOTAL.to_string(),
            sort_dir: SortDirection::Desc,
            total_threshold: 0.0,
            show_percent: false,
        }
    }
}

impl ViewDefaults {
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            sort_key: SortKey::new(self.sort_key.clone()),
            sort_dir: self.sort_dir,
            total_threshold: self.total_threshold,
            year_bin_size: self.year_bin_size,
            show_percent: self.show_percent,
            page_size: self.page_size,
            ..ViewOptions::default()
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

impl AppConfig {
    /// The provider stack. A missing config file is not an error.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(path: Option<&Path>) -> Result<AppConfig, String> {
        if let Some(p) = path {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()));
            }
        }
        Self::from_figment(Self::figment(path))
    }

    pub fn from_figment(figment: Figment) -> Result<AppConfig, String> {
        figment
            .extract()
            .map_err(|e| format!("Invalid configuration: {}", e))
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_figment(Figment::from(Serialized::defaults(AppConfig::default()))).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.view.view_options(), ViewOptions::default());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(
            r#"
            log_level = "debug"

            [view]
            page_size = 10
            year_bin_size = 10.0
            sort_key = "title"
            sort_dir = "asc"
            "#,
        ));
        let config = AppConfig::from_figment(figment).unwrap();
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);

        let options = config.view.view_options();
        assert_eq!(options.page_size, 10);
        assert_eq!(options.bin_size(), 10);
        assert_eq!(options.sort_key.as_str(), "title");
        assert_eq!(options.sort_dir, SortDirection::Asc);
        // untouched keys keep their defaults
        assert!(!options.show_percent);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "echo_logs = true\n[view]\ntotal_threshold = 5.0\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert!(config.echo_logs);
        assert_eq!(config.view.total_threshold, 5.0);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_bad_value_is_error() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string("[view]\npage_size = \"many\""));
        assert!(AppConfig::from_figment(figment).is_err());
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = AppConfig { log_level: "loud".into(), ..AppConfig::default() };
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }
}
