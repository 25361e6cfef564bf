//! Selective patch application and lock enforcement for refine merges.
//!
//! These functions never error: malformed paths and missing keys degrade to
//! no-ops so interactive editing stays resilient.

use serde_json::{Map, Value};

/// Returns `base` with the values at `selected` paths overwritten from
/// `candidate`.
///
/// An empty selection is the accept-all shortcut: it returns `candidate`
/// wholesale, not `base`.
pub fn apply_path_selections(base: &Value, candidate: &Value, selected: &[String]) -> Value {
    if selected.is_empty() {
        return candidate.clone();
    }
    let mut merged = base.clone();
    for path in selected {
        match value_at(candidate, path) {
            Some(value) => set_value_at(&mut merged, path, value.clone()),
            // Selected path vanished from the candidate: the selection means
            // "take the candidate's state here", so drop it from the merge.
            None => remove_value_at(&mut merged, path),
        }
    }
    merged
}

/// Force-overwrites each locked path in `candidate` back to its value in
/// `base`, so user-locked fields are never altered by a refine regardless
/// of what the provider returned.
pub fn enforce_locked_paths(base: &Value, candidate: &Value, locked: &[String]) -> Value {
    let mut result = candidate.clone();
    for path in locked {
        match value_at(base, path) {
            Some(value) => set_value_at(&mut result, path, value.clone()),
            // Locked path absent in base: anything the candidate put there
            // is still an alteration, so strip it.
            None => remove_value_at(&mut result, path),
        }
    }
    result
}

/// Resolves a dot-separated path inside a payload tree.
pub fn value_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn set_value_at(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return;
    }
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let Some(object) = current.as_object_mut() else {
            return;
        };
        current = object
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if let Some(object) = current.as_object_mut() {
        object.insert((*last).to_string(), value);
    }
}

fn remove_value_at(root: &mut Value, path: &str) {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return;
    }
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let Some(object) = current.as_object_mut() else {
            return;
        };
        match object.get_mut(*segment) {
            Some(next) => current = next,
            None => return,
        }
    }
    if let Some(object) = current.as_object_mut() {
        object.remove(*last);
    }
}
