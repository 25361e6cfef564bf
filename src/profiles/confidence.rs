//! Shallow validity and completeness checks for generated payloads.
//!
//! Deliberately top-level only: nested-field completeness is not separately
//! validated. `fields_complete` checks presence; `schema_valid` additionally
//! checks that present values carry the shape their field kind asks for.

use serde_json::{Map, Value};

use crate::schema::model::{CharacterSchema, Field, FieldKind};

use super::model::ConfidenceReport;

/// Evaluates a payload against its schema's top-level fields.
pub fn evaluate(schema: &CharacterSchema, payload: &Value, pass_count: usize) -> ConfidenceReport {
    let empty = Map::new();
    let object = payload.as_object().unwrap_or(&empty);

    let mut missing = Vec::new();
    let mut type_issues = Vec::new();
    for field in &schema.fields {
        match object.get(&field.key) {
            None | Some(Value::Null) => missing.push(field.key.clone()),
            Some(Value::String(text)) if text.trim().is_empty() => {
                missing.push(field.key.clone());
            }
            Some(value) => {
                if !kind_matches(field, value) {
                    type_issues.push(format!(
                        "Field '{}' does not match its declared kind",
                        field.key
                    ));
                }
            }
        }
    }

    let mut warnings = Vec::new();
    if !missing.is_empty() {
        warnings.push(format!("Missing fields: {}", missing.join(", ")));
    }
    warnings.extend(type_issues.iter().cloned());

    ConfidenceReport {
        schema_valid: payload.is_object() && type_issues.is_empty(),
        fields_complete: missing.is_empty(),
        pass_count,
        warnings,
    }
}

fn kind_matches(field: &Field, value: &Value) -> bool {
    match field.kind {
        FieldKind::ShortText | FieldKind::TraitList => value.is_string(),
        FieldKind::Number => value.is_number(),
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::SingleChoice => match value.as_str() {
            Some(text) => {
                field.options.is_empty() || field.options.iter().any(|option| option == text)
            }
            None => false,
        },
        FieldKind::OrderedScale => match value.as_str() {
            Some(text) => {
                field.levels.is_empty() || field.levels.iter().any(|level| level == text)
            }
            None => false,
        },
        FieldKind::ReferenceList | FieldKind::RankedList | FieldKind::Array => value.is_array(),
        FieldKind::NestedObject => value.is_object(),
    }
}
