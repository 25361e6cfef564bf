use personabase::schema::{is_multi_pass, pass_keys, resolve_passes, CharacterSchema, Field, FieldKind};

use crate::support::studio::two_pass_schema;

fn three_field_schema() -> CharacterSchema {
    CharacterSchema::new(
        "Plan",
        vec![
            Field::new("name", "Name", FieldKind::ShortText),
            Field::new("age", "Age", FieldKind::Number),
            Field::new("backstory", "Backstory", FieldKind::ShortText),
        ],
    )
}

#[test]
fn absent_order_yields_single_pass_in_schema_order() {
    let schema = three_field_schema();
    let passes = resolve_passes(&schema);
    assert_eq!(passes.len(), 1);
    assert_eq!(pass_keys(&passes[0]), vec!["name", "age", "backstory"]);
    assert!(!is_multi_pass(&schema));
}

#[test]
fn single_entry_order_still_covers_every_field() {
    let mut schema = three_field_schema();
    schema.generation_order = vec![vec!["name".into()]];
    let passes = resolve_passes(&schema);
    assert_eq!(passes.len(), 1);
    assert_eq!(pass_keys(&passes[0]), vec!["name", "age", "backstory"]);
    assert!(!is_multi_pass(&schema));
}

#[test]
fn multi_entry_order_partitions_fields_exactly_once() {
    let mut schema = three_field_schema();
    schema.generation_order = vec![vec!["name".into(), "age".into()], vec!["backstory".into()]];
    let passes = resolve_passes(&schema);
    assert_eq!(passes.len(), 2);
    assert!(is_multi_pass(&schema));

    let mut all_keys: Vec<String> = passes.iter().flat_map(|pass| pass_keys(pass)).collect();
    all_keys.sort();
    let mut expected = schema.field_keys();
    expected.sort();
    assert_eq!(all_keys, expected);
}

#[test]
fn unreferenced_fields_fall_into_trailing_pass() {
    let mut schema = three_field_schema();
    schema.generation_order = vec![vec!["name".into()], vec!["backstory".into()]];
    let passes = resolve_passes(&schema);
    assert_eq!(passes.len(), 3);
    assert_eq!(pass_keys(&passes[2]), vec!["age"]);
}

#[test]
fn unknown_keys_are_silently_dropped() {
    let mut schema = three_field_schema();
    schema.generation_order = vec![
        vec!["name".into(), "ghost".into()],
        vec!["age".into(), "backstory".into()],
    ];
    let passes = resolve_passes(&schema);
    assert_eq!(passes.len(), 2);
    assert_eq!(pass_keys(&passes[0]), vec!["name"]);
}

#[test]
fn order_of_only_unknown_keys_collapses_to_single_pass() {
    let mut schema = three_field_schema();
    schema.generation_order = vec![vec!["x".into()], vec!["y".into()]];
    let passes = resolve_passes(&schema);
    assert_eq!(passes.len(), 1);
    assert_eq!(pass_keys(&passes[0]), vec!["name", "age", "backstory"]);
    assert!(!is_multi_pass(&schema));
}

#[test]
fn repeated_keys_resolve_once() {
    let mut schema = three_field_schema();
    schema.generation_order = vec![
        vec!["name".into()],
        vec!["name".into(), "age".into(), "backstory".into()],
    ];
    let passes = resolve_passes(&schema);
    let total: usize = passes.iter().map(Vec::len).sum();
    assert_eq!(total, 3);
    assert_eq!(pass_keys(&passes[0]), vec!["name"]);
    assert_eq!(pass_keys(&passes[1]), vec!["age", "backstory"]);
}

#[test]
fn fixture_two_pass_schema_is_multi_pass() {
    let schema = two_pass_schema();
    assert!(is_multi_pass(&schema));
    let passes = resolve_passes(&schema);
    assert_eq!(passes.len(), 2);
    assert_eq!(pass_keys(&passes[0]), vec!["name"]);
    assert_eq!(pass_keys(&passes[1]), vec!["backstory"]);
}
