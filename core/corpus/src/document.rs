//! FILENAME: core/corpus/src/document.rs
//! PURPOSE: Corpus documents and their display metadata.
//! CONTEXT: A corpus is built by an external library-metadata query. Each
//! document may carry a numeric `dhlabid`, a URN, or both. The engine only
//! ever addresses documents through ONE namespace per session, chosen when
//! the MetadataIndex is built.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque document key (a URN or a numeric-looking dhlabid).
pub type DocumentId = String;

// ============================================================================
// IDENTIFIER NAMESPACE
// ============================================================================

/// The two identifier namespaces a document can be addressed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdNamespace {
    #[default]
    Dhlabid,
    Urn,
}

impl IdNamespace {
    /// Column/field name used for this namespace in corpus tables.
    pub fn field_name(&self) -> &'static str {
        match self {
            IdNamespace::Dhlabid => "dhlabid",
            IdNamespace::Urn => "urn",
        }
    }

    /// The other namespace (used for explicit alias lookups).
    pub fn other(&self) -> IdNamespace {
        match self {
            IdNamespace::Dhlabid => IdNamespace::Urn,
            IdNamespace::Urn => IdNamespace::Dhlabid,
        }
    }
}

// ============================================================================
// METADATA
// ============================================================================

/// Display metadata for one document. Supplied wholesale by the corpus
/// builder; never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(default)]
    pub title: Option<String>,

    /// Author names, already flattened into one display string.
    #[serde(default)]
    pub authors: Option<String>,

    /// Publication year as delivered (numeric-looking or absent).
    #[serde(default)]
    pub year: Option<String>,
}

impl DocumentMeta {
    pub fn new(title: Option<String>, authors: Option<String>, year: Option<String>) -> Self {
        DocumentMeta { title, authors, year }
    }

    /// The numeric year, if the year string starts with an integer.
    pub fn year_value(&self) -> Option<i64> {
        self.year.as_deref().and_then(parse_year)
    }
}

/// Years further from zero than this are treated as garbage.
pub const MAX_YEAR_MAGNITUDE: i64 = 9999;

/// Parses the leading integer of a year string.
/// "1994" -> 1994, "1994-05-01" -> 1994, " 1994.0" -> 1994, "ukjent" -> None.
/// Values outside +-MAX_YEAR_MAGNITUDE are rejected.
pub fn parse_year(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    if value > MAX_YEAR_MAGNITUDE {
        return None;
    }
    Some(if negative { -value } else { value })
}

// ============================================================================
// CORPUS
// ============================================================================

/// One document row from a corpus build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusDocument {
    #[serde(default)]
    pub dhlabid: Option<String>,

    #[serde(default)]
    pub urn: Option<String>,

    #[serde(flatten)]
    pub meta: DocumentMeta,
}

impl CorpusDocument {
    /// The document's identifier in the given namespace, if it has one.
    pub fn id(&self, namespace: IdNamespace) -> Option<&str> {
        let id = match namespace {
            IdNamespace::Dhlabid => self.dhlabid.as_deref(),
            IdNamespace::Urn => self.urn.as_deref(),
        };
        id.filter(|s| !s.trim().is_empty())
    }
}

/// An ordered collection of corpus documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub documents: Vec<CorpusDocument>,
}

impl Corpus {
    pub fn new() -> Self {
        Corpus { documents: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn push(&mut self, document: CorpusDocument) {
        self.documents.push(document);
    }

    /// Flat list of document identifiers in the given namespace, in corpus
    /// order. Documents without an id in that namespace are skipped.
    pub fn ids(&self, namespace: IdNamespace) -> Vec<DocumentId> {
        self.documents
            .iter()
            .filter_map(|d| d.id(namespace).map(str::to_string))
            .collect()
    }

    /// The namespace carried by the most documents. Ties go to dhlabid.
    pub fn preferred_namespace(&self) -> IdNamespace {
        let dhlabids = self.documents.iter().filter(|d| d.id(IdNamespace::Dhlabid).is_some()).count();
        let urns = self.documents.iter().filter(|d| d.id(IdNamespace::Urn).is_some()).count();
        if urns > dhlabids {
            IdNamespace::Urn
        } else {
            IdNamespace::Dhlabid
        }
    }

    /// Builds the metadata lookup keyed by `namespace`.
    /// Ids from the other namespace are recorded as aliases, consulted by
    /// `MetadataIndex::lookup` after the canonical id misses.
    pub fn metadata_index(&self, namespace: IdNamespace) -> MetadataIndex {
        let mut index = MetadataIndex::new(namespace);
        let mut skipped = 0usize;

        for doc in &self.documents {
            let Some(id) = doc.id(namespace) else {
                skipped += 1;
                continue;
            };
            if !index.insert(id.to_string(), doc.meta.clone()) {
                log::warn!("duplicate {} '{}' in corpus, keeping first", namespace.field_name(), id);
                continue;
            }
            if let Some(alias) = doc.id(namespace.other()) {
                index.aliases.insert(alias.to_string(), id.to_string());
            }
        }

        if skipped > 0 {
            log::warn!(
                "{} corpus documents have no {} and are not addressable",
                skipped,
                namespace.field_name()
            );
        }
        index
    }
}

// ============================================================================
// METADATA INDEX
// ============================================================================

/// DocumentId -> DocumentMeta lookup for one canonical namespace.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    namespace: IdNamespace,
    entries: HashMap<DocumentId, DocumentMeta>,
    /// Other-namespace id -> canonical id.
    aliases: HashMap<DocumentId, DocumentId>,
}

impl MetadataIndex {
    pub fn new(namespace: IdNamespace) -> Self {
        MetadataIndex {
            namespace,
            entries: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn from_entries<I>(namespace: IdNamespace, entries: I) -> Self
    where
        I: IntoIterator<Item = (DocumentId, DocumentMeta)>,
    {
        let mut index = MetadataIndex::new(namespace);
        for (id, meta) in entries {
            index.insert(id, meta);
        }
        index
    }

    /// Inserts an entry. Returns false (and keeps the existing entry) when
    /// the id is already present.
    pub fn insert(&mut self, id: DocumentId, meta: DocumentMeta) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, meta);
        true
    }

    pub fn namespace(&self) -> IdNamespace {
        self.namespace
    }

    pub fn get(&self, id: &str) -> Option<&DocumentMeta> {
        self.entries.get(id)
    }

    /// Looks up an id from the OTHER namespace.
    pub fn resolve_alias(&self, other_id: &str) -> Option<&DocumentMeta> {
        self.aliases.get(other_id).and_then(|id| self.entries.get(id))
    }

    /// Display lookup: the canonical id, then the other-namespace alias.
    pub fn lookup(&self, id: &str) -> Option<&DocumentMeta> {
        self.get(id).or_else(|| self.resolve_alias(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
