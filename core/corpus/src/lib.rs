//! FILENAME: core/corpus/src/lib.rs
//! PURPOSE: Shared data model for the wordbag workspace.
//! CONTEXT: Re-exports the document, evaluation and year-bin types used by
//! the pivot engine, the persistence adapters and the app.

pub mod collation;
pub mod document;
pub mod evaluation;
pub mod year_bin;

// Re-export commonly used types at the crate root
pub use collation::CollationKey;
pub use document::{
    parse_year, Corpus, CorpusDocument, DocumentId, DocumentMeta, IdNamespace, MetadataIndex,
};
pub use evaluation::{EvaluationResult, TopicCounts, WordGroup};
pub use year_bin::YearBin;
