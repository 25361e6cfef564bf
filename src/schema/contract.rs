//! Translates a field subset into a structured-output contract.
//!
//! The contract is a JSON-Schema-style object the completion call is bound
//! to. Synthesis is pure and deterministic for a given field list; malformed
//! input falls back to safe defaults instead of erroring.

use serde_json::{json, Map, Value};

use super::model::{Field, FieldKind};

/// Fallback item count for list fields whose schema omits a target count.
const DEFAULT_LIST_COUNT: u32 = 3;

/// Builds the output contract for a whole schema or a pass subset.
pub fn contract_for_fields(fields: &[Field]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in fields {
        properties.insert(field.key.clone(), field_contract(field));
        required.push(Value::String(field.key.clone()));
    }
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": properties,
        "required": required,
    })
}

fn field_contract(field: &Field) -> Value {
    match field.kind {
        FieldKind::ShortText => json!({
            "type": "string",
            "description": describe(field, "a concise prose value"),
        }),
        FieldKind::Number => json!({
            "type": "number",
            "description": describe(field, "a single numeric value"),
        }),
        FieldKind::Boolean => json!({
            "type": "boolean",
            "description": describe(field, "true or false"),
        }),
        FieldKind::SingleChoice => {
            if field.options.is_empty() {
                // No options to constrain against; fall back to free text.
                json!({
                    "type": "string",
                    "description": describe(field, "a single short value"),
                })
            } else {
                json!({
                    "type": "string",
                    "enum": field.options,
                    "description": describe(field, "exactly one of the listed options"),
                })
            }
        }
        FieldKind::OrderedScale => {
            if field.levels.is_empty() {
                json!({
                    "type": "string",
                    "description": describe(field, "a single scale level"),
                })
            } else {
                json!({
                    "type": "string",
                    "enum": field.levels,
                    "description": describe(
                        field,
                        "exactly one level from the ordered scale, weakest to strongest",
                    ),
                })
            }
        }
        FieldKind::TraitList => {
            let count = list_count(field);
            json!({
                "type": "string",
                "description": describe_owned(
                    field,
                    format!("exactly {count} comma-separated adjectives"),
                ),
            })
        }
        FieldKind::ReferenceList => {
            let count = list_count(field);
            json!({
                "type": "array",
                "items": { "type": "string" },
                "description": describe_owned(
                    field,
                    format!("{count} references formatted as 'Name (Source)'"),
                ),
            })
        }
        FieldKind::RankedList => {
            let count = list_count(field);
            json!({
                "type": "array",
                "items": { "type": "string" },
                "minItems": count,
                "maxItems": count,
                "description": describe_owned(
                    field,
                    format!(
                        "exactly {count} explicitly numbered entries ranked strongest to weakest"
                    ),
                ),
            })
        }
        FieldKind::Array => {
            let items = if field.children.is_empty() {
                let shape = field
                    .descriptor
                    .clone()
                    .unwrap_or_else(|| "a short string entry".to_string());
                json!({ "type": "string", "description": shape })
            } else {
                contract_for_fields(&field.children)
            };
            json!({
                "type": "array",
                "items": items,
                "description": describe(field, "an ordered list of entries"),
            })
        }
        FieldKind::NestedObject => {
            let mut contract = contract_for_fields(&field.children);
            if let Some(object) = contract.as_object_mut() {
                object.insert(
                    "description".to_string(),
                    Value::String(describe(field, "a nested group of fields")),
                );
            }
            contract
        }
    }
}

fn list_count(field: &Field) -> u32 {
    match field.count {
        Some(count) if count > 0 => count,
        _ => DEFAULT_LIST_COUNT,
    }
}

fn describe(field: &Field, instruction: &str) -> String {
    describe_owned(field, instruction.to_string())
}

fn describe_owned(field: &Field, instruction: String) -> String {
    let description = field.description.trim();
    if description.is_empty() {
        format!("{}: {instruction}", field.label)
    } else {
        format!("{description} ({instruction})")
    }
}
