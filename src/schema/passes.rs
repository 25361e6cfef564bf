//! Partitions a schema's top-level fields into ordered generation passes.
//!
//! Ordering is load-bearing: later passes are composed with the literal
//! output of all earlier passes as context, so schema authors schedule
//! causal/narrative fields after the identity fields they depend on via
//! `generation_order`. The engine never reorders on its own.

use std::collections::HashSet;

use super::model::{CharacterSchema, Field};

/// Resolves the schema's pass plan.
///
/// With no `generation_order` (or a single entry) the whole schema is one
/// pass in original field order. Otherwise each ordered key-group becomes
/// one pass (unknown and repeated keys are silently dropped) and any
/// unreferenced fields are appended as a trailing pass. The resulting
/// passes always cover every top-level field exactly once.
pub fn resolve_passes(schema: &CharacterSchema) -> Vec<Vec<Field>> {
    if schema.generation_order.len() <= 1 {
        return vec![schema.fields.clone()];
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut passes = Vec::new();
    for group in &schema.generation_order {
        let mut pass = Vec::new();
        for key in group {
            if seen.contains(key.as_str()) {
                continue;
            }
            if let Some(field) = schema.field(key) {
                seen.insert(field.key.as_str());
                pass.push(field.clone());
            }
        }
        if !pass.is_empty() {
            passes.push(pass);
        }
    }

    let trailing: Vec<Field> = schema
        .fields
        .iter()
        .filter(|field| !seen.contains(field.key.as_str()))
        .cloned()
        .collect();
    if !trailing.is_empty() {
        passes.push(trailing);
    }
    passes
}

/// True iff the resolved plan has more than one pass.
pub fn is_multi_pass(schema: &CharacterSchema) -> bool {
    resolve_passes(schema).len() > 1
}

/// Keys of one resolved pass, in pass order.
pub fn pass_keys(pass: &[Field]) -> Vec<String> {
    pass.iter().map(|field| field.key.clone()).collect()
}
