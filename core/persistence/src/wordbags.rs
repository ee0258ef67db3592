//! FILENAME: core/persistence/src/wordbags.rs
//! Word-group (wordbag) files.
//!
//! The canonical file format is a JSON object `{"name": ["word", ...]}`.
//! Imports also take comma-separated strings as word lists and an array of
//! `{"name", "words"}` objects.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

use corpus::WordGroup;

use crate::error::{PersistenceError, Result};

/// Reads word-groups from JSON. Array input keeps its order; object input
/// comes back in key order.
pub fn import_wordbags(value: &Value) -> Result<Vec<WordGroup>> {
    let groups = match value {
        Value::Object(map) => map
            .iter()
            .map(|(name, words)| group(name, words))
            .collect::<Result<Vec<_>>>()?,
        Value::Array(items) => items.iter().map(group_from_object).collect::<Result<Vec<_>>>()?,
        other => {
            return Err(PersistenceError::UnsupportedShape(format!(
                "wordbags must be an object or an array, got {}",
                other
            )))
        }
    };

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(groups.len());
    for g in groups {
        if g.name.is_empty() {
            log::warn!("word-group without a name skipped");
            continue;
        }
        if !seen.insert(g.name.clone()) {
            log::warn!("duplicate word-group '{}' skipped", g.name);
            continue;
        }
        unique.push(g);
    }
    Ok(unique)
}

/// Writes word-groups as `{"name": ["word", ...]}`.
pub fn export_wordbags(wordbags: &[WordGroup]) -> Value {
    let map: Map<String, Value> = wordbags
        .iter()
        .map(|g| {
            let words = g.words.iter().cloned().map(Value::String).collect();
            (g.name.clone(), Value::Array(words))
        })
        .collect();
    Value::Object(map)
}

pub fn load_wordbags(path: &Path) -> Result<Vec<WordGroup>> {
    let value = crate::load_json(path)?;
    import_wordbags(&value)
}

pub fn save_wordbags(wordbags: &[WordGroup], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&export_wordbags(wordbags))?;
    std::fs::write(path, json)?;
    Ok(())
}

fn group_from_object(value: &Value) -> Result<WordGroup> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| PersistenceError::MissingField("name".to_string()))?;
    let words = value
        .get("words")
        .ok_or_else(|| PersistenceError::MissingField(format!("words of '{}'", name)))?;
    group(name, words)
}

fn group(name: &str, words: &Value) -> Result<WordGroup> {
    let raw: Vec<&str> = match words {
        Value::Array(items) => items
            .iter()
            .map(|w| {
                w.as_str().ok_or_else(|| {
                    PersistenceError::UnsupportedShape(format!("word {} in '{}' is not a string", w, name))
                })
            })
            .collect::<Result<_>>()?,
        Value::String(s) => s.split(',').collect(),
        other => {
            return Err(PersistenceError::UnsupportedShape(format!(
                "words of '{}' must be a list or a string, got {}",
                name, other
            )))
        }
    };

    Ok(WordGroup::new(name.trim(), clean_words(raw)))
}

/// Trims words, drops empties, keeps the first of each duplicate.
fn clean_words<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(*w))
        .map(str::to_string)
        .collect()
}
