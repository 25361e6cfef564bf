use personabase::schema::{CharacterSchema, Field, FieldKind, Specificity};

#[test]
fn schema_round_trips_through_json() {
    let mut schema = CharacterSchema::new(
        "Rival",
        vec![
            Field::new("name", "Name", FieldKind::ShortText).seedable(),
            Field::new("alignment", "Alignment", FieldKind::SingleChoice)
                .with_options(["ally", "rival", "wildcard"]),
            Field::new("appearance", "Appearance", FieldKind::NestedObject).with_children(vec![
                Field::new("eyes", "Eye color", FieldKind::ShortText),
                Field::new("height_cm", "Height", FieldKind::Number),
            ]),
        ],
    );
    schema.specificity = Specificity::High;
    schema.generation_order = vec![vec!["name".into()], vec!["alignment".into()]];

    let encoded = serde_json::to_string(&schema).expect("schema should serialize");
    let decoded: CharacterSchema = serde_json::from_str(&encoded).expect("schema should parse");

    assert_eq!(decoded.id, schema.id);
    assert_eq!(decoded.specificity, Specificity::High);
    assert_eq!(decoded.generation_order, schema.generation_order);
    assert_eq!(decoded.fields.len(), 3);
    let appearance = decoded.field("appearance").expect("nested field survives");
    assert_eq!(appearance.children.len(), 2);
    assert!(decoded.field("name").is_some_and(|field| field.seedable));
}

#[test]
fn validate_accepts_well_formed_schema() {
    let schema = CharacterSchema::new(
        "Clean",
        vec![
            Field::new("name", "Name", FieldKind::ShortText),
            Field::new("mood", "Mood", FieldKind::OrderedScale).with_levels(["calm", "tense"]),
        ],
    );
    assert!(schema.validate().is_empty());
}

#[test]
fn validate_flags_duplicate_sibling_keys() {
    let schema = CharacterSchema::new(
        "Dupes",
        vec![
            Field::new("name", "Name", FieldKind::ShortText),
            Field::new("name", "Other name", FieldKind::ShortText),
        ],
    );
    let issues = schema.validate();
    assert!(issues.iter().any(|issue| issue.contains("duplicate")));
}

#[test]
fn validate_flags_nested_object_without_children() {
    let schema = CharacterSchema::new(
        "Hollow",
        vec![Field::new("appearance", "Appearance", FieldKind::NestedObject)],
    );
    let issues = schema.validate();
    assert!(issues.iter().any(|issue| issue.contains("appearance")));
}

#[test]
fn validate_flags_unknown_generation_order_keys() {
    let mut schema = CharacterSchema::new(
        "Ordered",
        vec![Field::new("name", "Name", FieldKind::ShortText)],
    );
    schema.generation_order = vec![vec!["name".into(), "ghost".into()]];
    let issues = schema.validate();
    assert!(issues.iter().any(|issue| issue.contains("ghost")));
}

#[test]
fn validate_flags_duplicate_keys_inside_nested_children() {
    let schema = CharacterSchema::new(
        "Deep",
        vec![
            Field::new("appearance", "Appearance", FieldKind::NestedObject).with_children(vec![
                Field::new("eyes", "Eyes", FieldKind::ShortText),
                Field::new("eyes", "Eyes again", FieldKind::ShortText),
            ]),
        ],
    );
    let issues = schema.validate();
    assert!(issues
        .iter()
        .any(|issue| issue.contains("appearance.eyes")));
}
