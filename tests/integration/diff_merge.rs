use personabase::profiles::{apply_path_selections, diff_paths, enforce_locked_paths};
use serde_json::json;

#[test]
fn diff_of_identical_payloads_is_empty() {
    let payload = json!({
        "name": "Kara Voss",
        "age": 34,
        "traits": ["wry", "loyal"],
        "appearance": { "eyes": "grey", "height_cm": 171 },
    });
    assert!(diff_paths(&payload, &payload).is_empty());
}

#[test]
fn nested_leaf_changes_report_dotted_paths() {
    let before = json!({ "appearance": { "eyes": "grey", "height_cm": 171 } });
    let after = json!({ "appearance": { "eyes": "green", "height_cm": 171 } });
    assert_eq!(diff_paths(&before, &after), vec!["appearance.eyes"]);
}

#[test]
fn array_changes_are_one_path_entry() {
    let before = json!({ "traits": ["wry", "loyal"], "name": "Kara" });
    let after = json!({ "traits": ["wry", "loyal", "tired"], "name": "Kara" });
    assert_eq!(diff_paths(&before, &after), vec!["traits"]);
}

#[test]
fn added_and_removed_keys_are_reported() {
    let before = json!({ "name": "Kara", "age": 34 });
    let after = json!({ "name": "Kara", "motto": "keep moving" });
    let mut paths = diff_paths(&before, &after);
    paths.sort();
    assert_eq!(paths, vec!["age", "motto"]);
}

#[test]
fn empty_selection_accepts_the_whole_candidate() {
    let base = json!({ "name": "Kara", "age": 34 });
    let candidate = json!({ "name": "Mara", "age": 41 });
    assert_eq!(apply_path_selections(&base, &candidate, &[]), candidate);
}

#[test]
fn selecting_all_diff_paths_equals_accepting_everything() {
    let base = json!({ "name": "Kara", "age": 34, "traits": ["wry"] });
    let candidate = json!({ "name": "Mara", "age": 41, "traits": ["stoic"] });
    let all_paths = diff_paths(&base, &candidate);
    assert_eq!(
        apply_path_selections(&base, &candidate, &all_paths),
        apply_path_selections(&base, &candidate, &[]),
    );
}

#[test]
fn partial_selection_takes_only_selected_paths() {
    let base = json!({ "name": "Kara", "age": 34 });
    let candidate = json!({ "name": "Mara", "age": 41 });
    let selected = vec!["age".to_string()];
    let merged = apply_path_selections(&base, &candidate, &selected);
    assert_eq!(merged, json!({ "name": "Kara", "age": 41 }));
}

#[test]
fn nested_selection_overwrites_only_that_leaf() {
    let base = json!({ "appearance": { "eyes": "grey", "height_cm": 171 } });
    let candidate = json!({ "appearance": { "eyes": "green", "height_cm": 190 } });
    let selected = vec!["appearance.eyes".to_string()];
    let merged = apply_path_selections(&base, &candidate, &selected);
    assert_eq!(
        merged,
        json!({ "appearance": { "eyes": "green", "height_cm": 171 } })
    );
}

#[test]
fn locked_paths_always_return_to_base_values() {
    let base = json!({ "name": "Kara", "age": 34, "appearance": { "eyes": "grey" } });
    let candidate = json!({ "name": "Mara", "age": 41, "appearance": { "eyes": "green" } });
    let locked = vec!["name".to_string(), "appearance.eyes".to_string()];
    let result = enforce_locked_paths(&base, &candidate, &locked);
    assert_eq!(result["name"], "Kara");
    assert_eq!(result["appearance"]["eyes"], "grey");
    assert_eq!(result["age"], 41);
}

#[test]
fn locked_path_missing_from_base_is_stripped_from_candidate() {
    let base = json!({ "name": "Kara" });
    let candidate = json!({ "name": "Kara", "alias": "The Gull" });
    let locked = vec!["alias".to_string()];
    let result = enforce_locked_paths(&base, &candidate, &locked);
    assert_eq!(result, json!({ "name": "Kara" }));
}

#[test]
fn malformed_paths_degrade_to_noops() {
    let base = json!({ "name": "Kara" });
    let candidate = json!({ "name": "Mara" });
    let weird = vec![
        String::new(),
        "ghost.limb".to_string(),
        ".leading".to_string(),
        "trailing.".to_string(),
    ];
    let merged = apply_path_selections(&base, &candidate, &weird);
    assert_eq!(merged, base);
    let locked = enforce_locked_paths(&base, &candidate, &weird);
    assert_eq!(locked["name"], "Mara");
}
