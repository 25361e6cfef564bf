//! Builds the instruction text and context payload for generation passes and
//! refinement requests.
//!
//! Composition is pure: the same inputs always produce the same prompt. The
//! orchestrator owns the ordering of passes; this module only renders one
//! pass (or one refine request) at a time.

use serde_json::{Map, Value};

use crate::schema::contract::contract_for_fields;
use crate::schema::model::{CharacterSchema, Field};

use super::guidance::{brevity_ceiling, hint_guidance, specificity_policy, QUALITY_RULES};

const ROLE_PREAMBLE: &str = "You are a character-profile writer. You fill in structured \
profile fields for a fictional character, exactly as requested.";

/// A fully rendered prompt pair plus the contract the call is bound to.
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    pub system: String,
    pub user: String,
    pub contract: Value,
}

/// Inputs for one generation pass.
pub struct PassPromptInputs<'a> {
    pub schema: &'a CharacterSchema,
    pub fields: &'a [Field],
    pub pass_index: usize,
    pub pass_total: usize,
    pub brief: &'a str,
    /// Accumulated output of all earlier passes; empty object on pass 0.
    pub accumulated: &'a Value,
    /// User-pinned literal values, keyed by top-level field key.
    pub seeds: &'a Map<String, Value>,
    pub draft_word_ceiling: u32,
    pub few_shot_limit: usize,
}

/// Inputs for a single-call refinement of an existing payload.
pub struct RefinePromptInputs<'a> {
    pub schema: &'a CharacterSchema,
    pub current: &'a Value,
    pub brief: &'a str,
    pub instruction: &'a str,
    /// Empty means "revise the whole profile".
    pub target_keys: &'a [String],
    pub locked_keys: &'a [String],
    pub constraint_patch: Option<&'a Value>,
}

/// Builds the prompt for one generation pass.
pub fn compose_pass_prompt(inputs: &PassPromptInputs<'_>) -> ComposedPrompt {
    let contract = contract_for_fields(inputs.fields);
    let final_pass = inputs.pass_index + 1 >= inputs.pass_total;

    let mut system = vec![
        ROLE_PREAMBLE.to_string(),
        format!("## Quality rules\n{QUALITY_RULES}"),
        specificity_policy(inputs.schema.specificity).to_string(),
    ];
    if !final_pass {
        system.push(brevity_ceiling(inputs.draft_word_ceiling));
    }

    let mut user = vec![format!("## Brief\n{}", inputs.brief)];

    if inputs.pass_index > 0 {
        user.push(format!(
            "## Profile so far\nThese fields are already final. Treat them as canon and stay \
consistent with them.\n{}",
            pretty(inputs.accumulated)
        ));
    } else if !inputs.schema.examples.is_empty() {
        // Few-shot anchors ride only on the first pass to bound payload growth.
        let mut block = String::from("## Example profiles\nMatch the register and depth of these completed examples.");
        for example in inputs.schema.examples.iter().take(inputs.few_shot_limit) {
            block.push('\n');
            block.push_str(&pretty(example));
        }
        user.push(block);
    }

    user.push(field_briefing(inputs.fields));

    let pinned = seeds_for_pass(inputs.fields, inputs.seeds);
    if !pinned.is_empty() {
        user.push(format!(
            "## Fixed values\nThe user pinned these values. Repeat them verbatim in your output.\n{}",
            pretty(&Value::Object(pinned))
        ));
    }

    user.push(format!(
        "## Output contract\nRespond with a single JSON object matching this schema exactly.\n{}",
        pretty(&contract)
    ));

    ComposedPrompt {
        system: system.join("\n\n"),
        user: user.join("\n\n"),
        contract,
    }
}

/// Builds the single prompt for a refine operation.
pub fn compose_refine_prompt(inputs: &RefinePromptInputs<'_>) -> ComposedPrompt {
    let targeted = !inputs.target_keys.is_empty();
    let contract_fields: Vec<Field> = if targeted {
        inputs
            .target_keys
            .iter()
            .filter_map(|key| inputs.schema.field(key).cloned())
            .collect()
    } else {
        inputs.schema.fields.clone()
    };
    let contract = contract_for_fields(&contract_fields);

    let system = vec![
        ROLE_PREAMBLE.to_string(),
        format!("## Quality rules\n{QUALITY_RULES}"),
        specificity_policy(inputs.schema.specificity).to_string(),
        "Change only what the instruction requires; keep everything else exactly as it is."
            .to_string(),
    ];

    let mut user = vec![
        format!("## Original brief\n{}", inputs.brief),
        format!("## Current profile\n{}", pretty(inputs.current)),
        format!("## Refinement instruction\n{}", inputs.instruction),
    ];

    if targeted {
        user.push(format!(
            "## Scope\nRevise only these fields: {}. Return a JSON object containing exactly \
the targeted fields and nothing else.",
            inputs.target_keys.join(", ")
        ));
    } else {
        user.push(
            "## Scope\nRevise the whole profile. Return the complete profile object.".to_string(),
        );
    }

    if !inputs.locked_keys.is_empty() {
        user.push(format!(
            "## Locked fields\nThese fields must come back unchanged: {}.",
            inputs.locked_keys.join(", ")
        ));
    }

    if let Some(patch) = inputs.constraint_patch {
        user.push(format!(
            "## Additional constraints\n{}",
            pretty(patch)
        ));
    }

    user.push(format!(
        "## Output contract\nRespond with a single JSON object matching this schema exactly.\n{}",
        pretty(&contract)
    ));

    ComposedPrompt {
        system: system.join("\n\n"),
        user: user.join("\n\n"),
        contract,
    }
}

/// One bullet per field: label, guidance, hint policy, dependency note.
fn field_briefing(fields: &[Field]) -> String {
    let mut block = String::from("## Fields to produce");
    for field in fields {
        block.push_str(&format!("\n- `{}` ({})", field.key, field.label));
        let description = field.description.trim();
        if !description.is_empty() {
            block.push_str(&format!(": {description}"));
        }
        if let Some(hint) = field.generation_hint {
            block.push_str(&format!("\n  {}", hint_guidance(hint)));
        }
        if !field.depends_on.is_empty() {
            block.push_str(&format!(
                "\n  `{}` must be causally derived from and consistent with: {}.",
                field.key,
                field.depends_on.join(", ")
            ));
        }
    }
    block
}

fn seeds_for_pass(fields: &[Field], seeds: &Map<String, Value>) -> Map<String, Value> {
    let mut pinned = Map::new();
    for field in fields {
        if !field.seedable {
            continue;
        }
        if let Some(value) = seeds.get(&field.key) {
            pinned.insert(field.key.clone(), value.clone());
        }
    }
    pinned
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
