//! FILENAME: core/persistence/src/evaluation.rs
//! Normalization of evaluation responses.
//!
//! The evaluation service (and files exported from it) deliver counts in
//! several layouts. Everything is turned into the canonical
//! DocumentId -> word-group -> count mapping before the engine sees it:
//!
//! - by document: `{"doc": {"topic": n}}`
//! - by topic:    `{"topic": {"doc": n}}` (a column-oriented frame)
//! - split:       `{"index": [docs], "columns": [topics], "data": [[n]]}`
//! - records:     `[{"dhlabid": doc, "topic": n, ...}]`

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use corpus::{EvaluationResult, WordGroup};

use crate::error::{PersistenceError, Result};
use crate::ids::{looks_like_document_id, value_to_id};

/// Fields that can carry the document id in record arrays, in lookup order.
const RECORD_ID_FIELDS: [&str; 5] = ["dhlabid", "urn", "id", "index", "document"];

/// Metadata fields that may ride along in record arrays and are not counts.
const RECORD_META_FIELDS: [&str; 7] = ["dhlabid", "urn", "title", "authors", "author", "year", "timestamp"];

/// What the caller knows about the request, used to tell layouts apart.
#[derive(Debug, Clone, Default)]
pub struct ShapeHint {
    /// Word-group names that were submitted.
    pub topics: BTreeSet<String>,
}

impl ShapeHint {
    pub fn from_wordbags(wordbags: &[WordGroup]) -> Self {
        ShapeHint {
            topics: wordbags.iter().map(|w| w.name.clone()).collect(),
        }
    }
}

/// Detected response layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationShape {
    ByDocument,
    ByTopic,
    Split,
    Records,
}

/// Works out which layout `value` uses.
pub fn detect_shape(value: &Value, hint: &ShapeHint) -> Result<EvaluationShape> {
    match value {
        Value::Array(_) => Ok(EvaluationShape::Records),
        Value::Object(map) if map.contains_key("columns") && map.contains_key("data") => {
            Ok(EvaluationShape::Split)
        }
        Value::Object(map) => {
            let mut inner_keys: BTreeSet<&str> = BTreeSet::new();
            for (key, inner) in map {
                match inner {
                    Value::Object(inner) => inner_keys.extend(inner.keys().map(String::as_str)),
                    Value::Null => {}
                    other => {
                        return Err(PersistenceError::UnsupportedShape(format!(
                            "entry '{}' is {}, expected an object",
                            key,
                            type_name(other)
                        )))
                    }
                }
            }
            Ok(orientation(map.keys().map(String::as_str), inner_keys, hint))
        }
        other => Err(PersistenceError::UnsupportedShape(format!(
            "evaluation response is {}",
            type_name(other)
        ))),
    }
}

/// Decides whether outer keys are documents (ByDocument) or word-groups
/// (ByTopic). Known word-group names win; otherwise whichever side looks
/// like document ids is the document side.
fn orientation<'a>(
    outer: impl Iterator<Item = &'a str> + Clone,
    inner: BTreeSet<&'a str>,
    hint: &ShapeHint,
) -> EvaluationShape {
    let mut outer_keys = outer.clone().peekable();
    if outer_keys.peek().is_none() {
        return EvaluationShape::ByDocument;
    }

    if !hint.topics.is_empty() {
        if outer.clone().all(|k| hint.topics.contains(k)) {
            return EvaluationShape::ByTopic;
        }
        if !inner.is_empty() && inner.iter().all(|k| hint.topics.contains(*k)) {
            return EvaluationShape::ByDocument;
        }
    }

    let outer_ids = outer.clone().all(looks_like_document_id);
    let inner_ids = !inner.is_empty() && inner.iter().all(|k| looks_like_document_id(k));
    if !outer_ids && inner_ids {
        EvaluationShape::ByTopic
    } else {
        EvaluationShape::ByDocument
    }
}

/// Normalizes any supported layout into an EvaluationResult.
pub fn normalize_evaluation(value: &Value, hint: &ShapeHint) -> Result<EvaluationResult> {
    let shape = detect_shape(value, hint)?;
    log::debug!("evaluation response shape: {:?}", shape);

    match shape {
        EvaluationShape::ByDocument => from_nested(as_object(value)?, false),
        EvaluationShape::ByTopic => from_nested(as_object(value)?, true),
        EvaluationShape::Split => from_split(as_object(value)?, hint),
        EvaluationShape::Records => from_records(value),
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| PersistenceError::UnsupportedShape("expected an object".to_string()))
}

fn from_nested(map: &Map<String, Value>, transposed: bool) -> Result<EvaluationResult> {
    let mut result = EvaluationResult::new();

    for (outer, inner) in map {
        let Some(inner) = inner.as_object() else {
            // null entry: a document with nothing reported
            if !transposed {
                result.add_document(outer.clone());
            }
            continue;
        };

        if !transposed {
            result.add_document(outer.clone());
        }
        for (key, raw) in inner {
            let (doc, topic) = if transposed { (key, outer) } else { (outer, key) };
            if transposed {
                result.add_document(doc.clone());
            }
            if let Some(count) = parse_count(raw, doc, topic)? {
                result.add(doc.clone(), topic.clone(), count);
            }
        }
    }

    Ok(result)
}

fn from_split(map: &Map<String, Value>, hint: &ShapeHint) -> Result<EvaluationResult> {
    let columns = string_list(map.get("columns"), "columns")?;
    let index = match map.get("index") {
        Some(v) => string_list(Some(v), "index")?,
        None => return Err(PersistenceError::MissingField("index".to_string())),
    };
    let data = map
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| PersistenceError::MissingField("data".to_string()))?;

    if data.len() != index.len() {
        return Err(PersistenceError::UnsupportedShape(format!(
            "split frame has {} index entries but {} data rows",
            index.len(),
            data.len()
        )));
    }

    // Rows are documents unless the index holds the word-groups.
    let inner: BTreeSet<&str> = columns.iter().map(String::as_str).collect();
    let transposed = orientation(index.iter().map(String::as_str), inner, hint) == EvaluationShape::ByTopic;

    let mut result = EvaluationResult::new();
    for (row_key, row) in index.iter().zip(data) {
        let cells = row.as_array().ok_or_else(|| {
            PersistenceError::UnsupportedShape(format!("data row '{}' is not an array", row_key))
        })?;
        if !transposed {
            result.add_document(row_key.clone());
        }
        for (col_key, raw) in columns.iter().zip(cells) {
            let (doc, topic) = if transposed { (col_key, row_key) } else { (row_key, col_key) };
            if transposed {
                result.add_document(doc.clone());
            }
            if let Some(count) = parse_count(raw, doc, topic)? {
                result.add(doc.clone(), topic.clone(), count);
            }
        }
    }

    Ok(result)
}

fn from_records(value: &Value) -> Result<EvaluationResult> {
    let records = value
        .as_array()
        .ok_or_else(|| PersistenceError::UnsupportedShape("expected an array".to_string()))?;

    let mut result = EvaluationResult::new();
    for (position, record) in records.iter().enumerate() {
        let record = record.as_object().ok_or_else(|| {
            PersistenceError::UnsupportedShape(format!("record {} is not an object", position))
        })?;

        let (id_field, doc) = RECORD_ID_FIELDS
            .iter()
            .find_map(|f| record.get(*f).and_then(value_to_id).map(|id| (*f, id)))
            .ok_or_else(|| PersistenceError::MissingField(format!("document id in record {}", position)))?;

        result.add_document(doc.clone());
        for (topic, raw) in record {
            if topic == id_field || RECORD_META_FIELDS.contains(&topic.as_str()) {
                continue;
            }
            if let Some(count) = parse_count(raw, &doc, topic)? {
                result.add(doc.clone(), topic.clone(), count);
            }
        }
    }

    Ok(result)
}

fn string_list(value: Option<&Value>, field: &str) -> Result<Vec<String>> {
    let items = value
        .and_then(Value::as_array)
        .ok_or_else(|| PersistenceError::MissingField(field.to_string()))?;
    items
        .iter()
        .map(|v| {
            value_to_id(v).ok_or_else(|| {
                PersistenceError::UnsupportedShape(format!("'{}' entry {} is not a label", field, v))
            })
        })
        .collect()
}

/// Reads one count cell. Null means "not reported" (None). Integral
/// numbers and numeric strings are accepted; anything negative,
/// fractional or non-numeric is an error.
fn parse_count(raw: &Value, document: &str, topic: &str) -> Result<Option<u64>> {
    let invalid = || PersistenceError::InvalidCount {
        document: document.to_string(),
        topic: topic.to_string(),
        value: raw.to_string(),
    };

    let as_integral = |f: f64| -> Option<u64> {
        (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
    };

    match raw {
        Value::Null => Ok(None),
        Value::Number(n) => match n.as_u64() {
            Some(u) => Ok(Some(u)),
            None => n.as_f64().and_then(as_integral).map(Some).ok_or_else(invalid),
        },
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(as_integral))
                .map(Some)
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hint(topics: &[&str]) -> ShapeHint {
        ShapeHint { topics: topics.iter().map(|t| t.to_string()).collect() }
    }

    #[test]
    fn test_by_document() {
        let value = json!({"doc1": {"nature": 3, "war": 0}, "doc2": {"nature": 5}});
        let result = normalize_evaluation(&value, &ShapeHint::default()).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.count("doc1", "nature"), 3);
        assert_eq!(result.count("doc2", "war"), 0);
        assert_eq!(result.topic_universe(), vec!["nature", "war"]);
    }

    #[test]
    fn test_by_topic_detected_from_hint() {
        let value = json!({"nature": {"doc1": 3, "doc2": 5}, "war": {"doc1": 0}});
        assert_eq!(detect_shape(&value, &hint(&["nature", "war"])).unwrap(), EvaluationShape::ByTopic);

        let result = normalize_evaluation(&value, &hint(&["nature", "war"])).unwrap();
        assert_eq!(result.count("doc2", "nature"), 5);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_by_topic_detected_from_ids() {
        let value = json!({"natur": {"100": 3.0, "101": null}, "krig": {"100": 1}});
        let result = normalize_evaluation(&value, &ShapeHint::default()).unwrap();
        assert_eq!(result.count("100", "natur"), 3);
        assert_eq!(result.count("100", "krig"), 1);
        // a null cell still registers the document
        assert!(result.get("101").is_some());
        assert_eq!(result.count("101", "natur"), 0);
    }

    #[test]
    fn test_ids_as_outer_keys_stay_by_document() {
        let value = json!({"100": {"natur": 2}, "URN:NBN:no-nb_digibok_1": {"natur": 1}});
        assert_eq!(detect_shape(&value, &ShapeHint::default()).unwrap(), EvaluationShape::ByDocument);
    }

    #[test]
    fn test_split_frame() {
        let value = json!({
            "index": [100, 101],
            "columns": ["natur", "krig"],
            "data": [[3, 0], [5, "2"]]
        });
        let result = normalize_evaluation(&value, &ShapeHint::default()).unwrap();
        assert_eq!(result.count("100", "natur"), 3);
        assert_eq!(result.count("101", "krig"), 2);
    }

    #[test]
    fn test_split_frame_transposed() {
        let value = json!({
            "index": ["natur"],
            "columns": ["100", "101"],
            "data": [[3, 4]]
        });
        let result = normalize_evaluation(&value, &hint(&["natur"])).unwrap();
        assert_eq!(result.count("101", "natur"), 4);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_records() {
        let value = json!([
            {"dhlabid": 100, "title": "Sult", "natur": 3},
            {"urn": "URN:NBN:no-nb_digibok_1", "natur": 1, "krig": null}
        ]);
        let result = normalize_evaluation(&value, &ShapeHint::default()).unwrap();
        assert_eq!(result.count("100", "natur"), 3);
        assert_eq!(result.count("URN:NBN:no-nb_digibok_1", "natur"), 1);
        assert_eq!(result.topic_universe(), vec!["natur"]);
    }

    #[test]
    fn test_record_without_id_is_error() {
        let value = json!([{"natur": 3}]);
        assert!(matches!(
            normalize_evaluation(&value, &ShapeHint::default()),
            Err(PersistenceError::MissingField(_))
        ));
    }

    #[test]
    fn test_invalid_counts_are_tagged() {
        for bad in [json!(-1), json!(2.5), json!("mange"), json!(true)] {
            let value = json!({"doc1": {"natur": bad}});
            match normalize_evaluation(&value, &ShapeHint::default()) {
                Err(PersistenceError::InvalidCount { document, topic, .. }) => {
                    assert_eq!(document, "doc1");
                    assert_eq!(topic, "natur");
                }
                other => panic!("expected InvalidCount, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unsupported_shapes() {
        assert!(matches!(
            normalize_evaluation(&json!("nope"), &ShapeHint::default()),
            Err(PersistenceError::UnsupportedShape(_))
        ));
        assert!(matches!(
            normalize_evaluation(&json!({"doc1": 3}), &ShapeHint::default()),
            Err(PersistenceError::UnsupportedShape(_))
        ));
    }

    #[test]
    fn test_empty_object_is_empty_result() {
        let result = normalize_evaluation(&json!({}), &ShapeHint::default()).unwrap();
        assert!(result.is_empty());
    }
}
