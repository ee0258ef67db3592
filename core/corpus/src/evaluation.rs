//! FILENAME: core/corpus/src/evaluation.rs
//! PURPOSE: Word-groups and the per-document counts returned by evaluation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::document::DocumentId;

/// Word-group name -> occurrence count for one document.
/// Sparse: a missing word-group means zero.
pub type TopicCounts = BTreeMap<String, u64>;

// ============================================================================
// WORD GROUP
// ============================================================================

/// A named list of words whose occurrences are counted per document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordGroup {
    pub name: String,
    pub words: Vec<String>,
}

impl WordGroup {
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Self {
        WordGroup { name: name.into(), words }
    }
}

// ============================================================================
// EVALUATION RESULT
// ============================================================================

/// DocumentId -> (word-group name -> count).
///
/// Backed by a BTreeMap so that two results built from the same data iterate
/// in the same order regardless of how they were assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationResult {
    documents: BTreeMap<DocumentId, TopicCounts>,
}

impl EvaluationResult {
    pub fn new() -> Self {
        EvaluationResult { documents: BTreeMap::new() }
    }

    /// Adds `count` to (document, topic). Registers the document even when
    /// the count is zero so that an all-zero document still gets a row.
    pub fn add(&mut self, document: impl Into<DocumentId>, topic: impl Into<String>, count: u64) {
        let counts = self.documents.entry(document.into()).or_default();
        let slot = counts.entry(topic.into()).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Registers a document with no reported word-groups.
    pub fn add_document(&mut self, document: impl Into<DocumentId>) {
        self.documents.entry(document.into()).or_default();
    }

    pub fn get(&self, document: &str) -> Option<&TopicCounts> {
        self.documents.get(document)
    }

    /// Count for (document, topic); absent entries are zero.
    pub fn count(&self, document: &str, topic: &str) -> u64 {
        self.documents
            .get(document)
            .and_then(|c| c.get(topic))
            .copied()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &TopicCounts)> {
        self.documents.iter()
    }

    pub fn document_ids(&self) -> impl Iterator<Item = &DocumentId> {
        self.documents.keys()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Union of word-group names across all documents, sorted lexically.
    pub fn topic_universe(&self) -> Vec<String> {
        let topics: BTreeSet<&String> = self.documents.values().flat_map(|c| c.keys()).collect();
        topics.into_iter().cloned().collect()
    }

    /// Sum of every count in the result, saturating at `u64::MAX`.
    pub fn grand_total(&self) -> u64 {
        self.documents
            .values()
            .flat_map(|c| c.values())
            .fold(0u64, |acc, &n| acc.saturating_add(n))
    }
}

impl FromIterator<(DocumentId, TopicCounts)> for EvaluationResult {
    fn from_iter<I: IntoIterator<Item = (DocumentId, TopicCounts)>>(iter: I) -> Self {
        let mut result = EvaluationResult::new();
        for (doc, counts) in iter {
            let entry = result.documents.entry(doc).or_default();
            for (topic, count) in counts {
                let slot = entry.entry(topic).or_insert(0);
                *slot = slot.saturating_add(count);
            }
        }
        result
    }
}
