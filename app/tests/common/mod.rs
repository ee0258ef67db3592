//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for wordbags integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use app_lib::{commands, create_app_state, AppConfig, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Test harness: an AppState plus a scratch directory for input files.
pub struct TestHarness {
    pub state: AppState,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with empty state.
    pub fn new() -> Self {
        TestHarness {
            state: create_app_state(&AppConfig::default()),
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Create a harness with the novels fixture fully loaded.
    pub fn with_novels() -> Self {
        let harness = Self::new();
        harness.load_novels();
        harness
    }

    /// Writes `value` as JSON into the scratch directory.
    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn load_novels(&self) {
        let corpus = self.write_json("corpus.json", &NovelsFixture::corpus());
        let wordbags = self.write_json("wordbags.json", &NovelsFixture::wordbags());
        let evaluation = self.write_json("evaluation.json", &NovelsFixture::evaluation());

        commands::load_corpus(&self.state, &corpus).unwrap();
        commands::load_wordbags(&self.state, &wordbags).unwrap();
        commands::load_evaluation(&self.state, &evaluation).unwrap();
    }

    /// Command line arguments pointing at the fixture files.
    pub fn novel_args(&self) -> Vec<String> {
        let corpus = self.write_json("corpus.json", &NovelsFixture::corpus());
        let wordbags = self.write_json("wordbags.json", &NovelsFixture::wordbags());
        let evaluation = self.write_json("evaluation.json", &NovelsFixture::evaluation());
        let config = self.dir.path().join("wordbags.toml");
        std::fs::write(&config, "").unwrap();

        vec![
            "wordbags".to_string(),
            "--config".to_string(),
            config.display().to_string(),
            "--corpus".to_string(),
            corpus.display().to_string(),
            "--wordbags".to_string(),
            wordbags.display().to_string(),
            "--evaluation".to_string(),
            evaluation.display().to_string(),
        ]
    }
}

/// Five Norwegian novels, three word-groups.
///
/// | dhlabid | title            | year | natur | krig | by |
/// |---------|------------------|------|-------|------|----|
/// | 100     | Sult             | 1890 | 2     | 0    | 9  |
/// | 101     | Pan              | 1894 | 12    | 0    | 1  |
/// | 102     | Markens grøde    | 1917 | 20    | 1    | 0  |
/// | 103     | Ærlighet         | 1920 | 3     | 4    | 2  |
/// | 104     | (no metadata)    |      | 1     | 1    | 1  |
pub struct NovelsFixture;

impl NovelsFixture {
    pub fn corpus() -> Value {
        json!([
            {"dhlabid": 100, "urn": "URN:NBN:no-nb_digibok_100", "title": "Sult", "authors": "Hamsun, Knut", "year": 1890},
            {"dhlabid": 101, "urn": "URN:NBN:no-nb_digibok_101", "title": "Pan", "authors": ["Hamsun, Knut"], "year": "1894"},
            {"dhlabid": 102, "urn": "URN:NBN:no-nb_digibok_102", "title": "Markens grøde", "authors": "Hamsun, Knut", "year": 1917.0},
            {"dhlabid": 103, "urn": "URN:NBN:no-nb_digibok_103", "title": "Ærlighet", "authors": "Aas, Per", "year": 1920}
        ])
    }

    pub fn wordbags() -> Value {
        json!({
            "natur": ["skog", "fjell", "hav"],
            "krig": ["soldat", "kanon"],
            "by": ["gate", "torg"]
        })
    }

    /// Column-oriented, the way the evaluation service answers.
    pub fn evaluation() -> Value {
        json!({
            "natur": {"100": 2, "101": 12, "102": 20, "103": 3, "104": 1},
            "krig":  {"100": 0, "101": 0, "102": 1, "103": 4, "104": 1},
            "by":    {"100": 9, "101": 1, "102": 0, "103": 2, "104": 1}
        })
    }

    /// One document by dhlabid, one by URN.
    pub fn evaluation_mixed() -> Value {
        json!({
            "100": {"natur": 2, "by": 9},
            "URN:NBN:no-nb_digibok_101": {"natur": 12, "by": 1}
        })
    }

    /// The same counts keyed by URN.
    pub fn evaluation_by_urn() -> Value {
        json!({
            "URN:NBN:no-nb_digibok_100": {"natur": 2, "by": 9},
            "URN:NBN:no-nb_digibok_101": {"natur": 12, "by": 1}
        })
    }
}
