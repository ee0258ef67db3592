//! FILENAME: core/persistence/src/session.rs
//! Session files: everything needed to reopen a table exactly as it was.

use serde::{Deserialize, Serialize};
use std::path::Path;

use corpus::{Corpus, EvaluationResult, IdNamespace, MetadataIndex, WordGroup};
use pivot_engine::ViewOptions;

use crate::error::{PersistenceError, Result};

/// Current session file format.
pub const SESSION_VERSION: u32 = 1;

// ============================================================================
// SESSION FILE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    pub version: u32,

    /// Namespace the evaluation result is keyed by.
    #[serde(default)]
    pub namespace: IdNamespace,

    #[serde(default)]
    pub corpus: Corpus,

    #[serde(default)]
    pub wordbags: Vec<WordGroup>,

    /// Absent until an evaluation has been run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<EvaluationResult>,

    #[serde(default)]
    pub view: ViewOptions,
}

impl SessionFile {
    pub fn new(corpus: Corpus, wordbags: Vec<WordGroup>) -> Self {
        let namespace = corpus.preferred_namespace();
        SessionFile {
            version: SESSION_VERSION,
            namespace,
            corpus,
            wordbags,
            result: None,
            view: ViewOptions::default(),
        }
    }

    pub fn with_result(mut self, result: EvaluationResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_view(mut self, view: ViewOptions) -> Self {
        self.view = view;
        self
    }

    /// The metadata lookup for this session's namespace.
    pub fn metadata_index(&self) -> MetadataIndex {
        self.corpus.metadata_index(self.namespace)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("saved session to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let session: SessionFile = serde_json::from_str(&text)?;
        if session.version == 0 || session.version > SESSION_VERSION {
            return Err(PersistenceError::SessionVersion(session.version));
        }
        log::info!(
            "loaded session from {} ({} documents, {} word-groups)",
            path.display(),
            session.corpus.len(),
            session.wordbags.len()
        );
        Ok(session)
    }
}
