//! FILENAME: core/persistence/src/corpus_import.rs
//! Corpus tables from JSON.
//!
//! Corpus builds come back as data frames serialized one of several ways:
//! column-oriented (`{"dhlabid": {"0": 1, ...}, "title": {...}}` or
//! `{"dhlabid": [..], "title": [..]}`), split (`{"columns", "data"}`),
//! records (`[{"dhlabid": 1, "title": ..}]`) or wrapped records
//! (`{"documents": [..]}`).

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use corpus::{Corpus, CorpusDocument, DocumentMeta};

use crate::error::{PersistenceError, Result};
use crate::ids::value_to_id;

const AUTHOR_SEPARATOR: &str = "; ";

/// Field names that may hold the author list.
const AUTHOR_FIELDS: [&str; 2] = ["authors", "author"];

/// Reads a corpus table in any of the supported layouts.
pub fn import_corpus(value: &Value) -> Result<Corpus> {
    let records = match value {
        Value::Array(items) => items.iter().map(record_fields).collect::<Result<Vec<_>>>()?,
        Value::Object(map) if map.get("documents").is_some_and(Value::is_array) => {
            let items = map.get("documents").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
            items.iter().map(record_fields).collect::<Result<Vec<_>>>()?
        }
        Value::Object(map) if map.contains_key("columns") && map.contains_key("data") => split_records(map)?,
        Value::Object(map) => column_records(map)?,
        _ => {
            return Err(PersistenceError::UnsupportedShape(
                "corpus must be an array or an object".to_string(),
            ))
        }
    };

    let mut corpus = Corpus::new();
    for record in &records {
        let document = document_from_record(record);
        if document.dhlabid.is_none() && document.urn.is_none() {
            log::warn!("corpus row without dhlabid or urn skipped");
            continue;
        }
        corpus.push(document);
    }

    log::debug!("imported corpus with {} documents", corpus.len());
    Ok(corpus)
}

type Record<'a> = BTreeMap<&'a str, &'a Value>;

fn record_fields(value: &Value) -> Result<Record<'_>> {
    let map = value
        .as_object()
        .ok_or_else(|| PersistenceError::UnsupportedShape("corpus record is not an object".to_string()))?;
    Ok(map.iter().map(|(k, v)| (k.as_str(), v)).collect())
}

fn split_records(map: &Map<String, Value>) -> Result<Vec<Record<'_>>> {
    let columns = map
        .get("columns")
        .and_then(Value::as_array)
        .ok_or_else(|| PersistenceError::MissingField("columns".to_string()))?;
    let names: Vec<&str> = columns
        .iter()
        .map(|c| {
            c.as_str()
                .ok_or_else(|| PersistenceError::UnsupportedShape(format!("column name {} is not a string", c)))
        })
        .collect::<Result<_>>()?;

    let data = map
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| PersistenceError::MissingField("data".to_string()))?;

    data.iter()
        .map(|row| -> Result<Record<'_>> {
            let cells = row
                .as_array()
                .ok_or_else(|| PersistenceError::UnsupportedShape("corpus data row is not an array".to_string()))?;
            Ok(names.iter().copied().zip(cells.iter()).collect())
        })
        .collect()
}

/// Column-oriented frames: each column is either an array or an
/// index-keyed object. Rows are ordered by index key (numeric keys
/// numerically).
fn column_records(map: &Map<String, Value>) -> Result<Vec<Record<'_>>> {
    let mut rows: BTreeMap<RowIndex, Record<'_>> = BTreeMap::new();

    for (column, cells) in map {
        match cells {
            Value::Array(items) => {
                for (i, cell) in items.iter().enumerate() {
                    rows.entry(RowIndex::Position(i as u64)).or_default().insert(column.as_str(), cell);
                }
            }
            Value::Object(items) => {
                for (key, cell) in items {
                    rows.entry(RowIndex::parse(key)).or_default().insert(column.as_str(), cell);
                }
            }
            other => {
                return Err(PersistenceError::UnsupportedShape(format!(
                    "corpus column '{}' is neither an array nor an object: {}",
                    column, other
                )))
            }
        }
    }

    Ok(rows.into_values().collect())
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RowIndex {
    Position(u64),
    Label(String),
}

impl RowIndex {
    fn parse(key: &str) -> Self {
        key.parse().map(RowIndex::Position).unwrap_or_else(|_| RowIndex::Label(key.to_string()))
    }
}

fn document_from_record(record: &Record<'_>) -> CorpusDocument {
    let field = |name: &str| record.get(name).copied();

    let authors = AUTHOR_FIELDS.iter().find_map(|f| field(f).and_then(authors_text));

    CorpusDocument {
        dhlabid: field("dhlabid").and_then(value_to_id),
        urn: field("urn").and_then(value_to_id),
        meta: DocumentMeta::new(
            field("title").and_then(text),
            authors,
            field("year").and_then(year_text),
        ),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn authors_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let names: Vec<String> = items.iter().filter_map(text).collect();
            (!names.is_empty()).then(|| names.join(AUTHOR_SEPARATOR))
        }
        other => text(other),
    }
}

/// Years arrive as strings, integers or floats ("1994", 1994, 1994.0).
fn year_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(_) => value_to_id(value).or_else(|| text(value)),
        other => text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus::IdNamespace;
    use serde_json::json;

    #[test]
    fn test_records() {
        let value = json!([
            {"dhlabid": 100, "urn": "URN:NBN:no-nb_digibok_1", "title": "Sult", "authors": "Hamsun, Knut", "year": 1890},
            {"dhlabid": 101.0, "title": "Pan", "authors": ["Hamsun, Knut", "Ukjent"], "year": "1894"}
        ]);
        let corpus = import_corpus(&value).unwrap();
        assert_eq!(corpus.len(), 2);

        let second = &corpus.documents[1];
        assert_eq!(second.dhlabid.as_deref(), Some("101"));
        assert_eq!(second.meta.authors.as_deref(), Some("Hamsun, Knut; Ukjent"));
        assert_eq!(corpus.documents[0].meta.year.as_deref(), Some("1890"));
    }

    #[test]
    fn test_column_oriented_with_index_keys() {
        let value = json!({
            "dhlabid": {"10": 3, "2": 1},
            "title": {"2": "Først", "10": "Sist"},
            "year": {"2": 1901.0, "10": null}
        });
        let corpus = import_corpus(&value).unwrap();
        let ids = corpus.ids(IdNamespace::Dhlabid);
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(corpus.documents[0].meta.year.as_deref(), Some("1901"));
        assert_eq!(corpus.documents[1].meta.year, None);
    }

    #[test]
    fn test_column_oriented_with_arrays() {
        let value = json!({"urn": ["URN:NBN:a", "URN:NBN:b"], "title": ["A", "B"]});
        let corpus = import_corpus(&value).unwrap();
        assert_eq!(corpus.preferred_namespace(), IdNamespace::Urn);
        assert_eq!(corpus.documents[1].meta.title.as_deref(), Some("B"));
    }

    #[test]
    fn test_split_and_wrapped() {
        let split = json!({"columns": ["dhlabid", "author"], "data": [[7, "Undset, Sigrid"]]});
        let corpus = import_corpus(&split).unwrap();
        assert_eq!(corpus.documents[0].meta.authors.as_deref(), Some("Undset, Sigrid"));

        let wrapped = json!({"documents": [{"dhlabid": "8"}]});
        assert_eq!(import_corpus(&wrapped).unwrap().len(), 1);
    }

    #[test]
    fn test_rows_without_ids_are_skipped() {
        let value = json!([{"title": "Foreldreløs"}, {"dhlabid": 1}]);
        assert_eq!(import_corpus(&value).unwrap().len(), 1);
    }

    #[test]
    fn test_bad_shapes() {
        assert!(import_corpus(&json!(5)).is_err());
        assert!(import_corpus(&json!({"dhlabid": 5})).is_err());
        assert!(import_corpus(&json!([1, 2])).is_err());
    }
}
