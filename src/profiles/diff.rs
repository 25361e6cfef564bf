//! Path-level comparison of two profile payload trees.

use serde_json::Value;

/// Returns every dot-separated path at which the two payloads differ.
///
/// Objects recurse. Arrays are atomic: any array-level change is reported
/// as a single path, never element by element. `diff_paths(x, x)` is
/// always empty.
pub fn diff_paths(before: &Value, after: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    collect_diffs(before, after, "", &mut paths);
    paths
}

fn collect_diffs(before: &Value, after: &Value, prefix: &str, out: &mut Vec<String>) {
    match (before, after) {
        (Value::Object(before), Value::Object(after)) => {
            for (key, old) in before {
                let path = join(prefix, key);
                match after.get(key) {
                    Some(new) => collect_diffs(old, new, &path, out),
                    None => out.push(path),
                }
            }
            for key in after.keys() {
                if !before.contains_key(key) {
                    out.push(join(prefix, key));
                }
            }
        }
        (Value::Array(before), Value::Array(after)) => {
            if before != after {
                out.push(prefix.to_string());
            }
        }
        _ => {
            if before != after {
                out.push(prefix.to_string());
            }
        }
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
