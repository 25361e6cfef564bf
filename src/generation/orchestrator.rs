//! Drives multi-pass generation and single-call refinement against a
//! completion provider.
//!
//! Generation is a state machine over the resolved pass plan:
//! PLAN → (COMPOSE → CALL → MERGE)* → DONE, failing the whole run on any
//! pass error. Nothing accumulated by earlier passes survives a failure;
//! partial progress is never handed back to callers. Passes are strictly
//! sequential because each pass's prompt embeds the literal output of all
//! earlier passes. Mutual exclusion across runs for the same profile is a
//! caller responsibility.

use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::library::config::GenerationSettings;
use crate::prompt::composer::{
    compose_pass_prompt, compose_refine_prompt, PassPromptInputs, RefinePromptInputs,
};
use crate::schema::model::{CharacterSchema, Field};
use crate::schema::passes::{pass_keys, resolve_passes};

use super::parse::parse_object_payload;
use super::provider::{CompletionProvider, CompletionRequest};

/// Where a payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub provider: String,
    pub model: String,
}

/// Progress events reported while a generation runs.
///
/// `Token` is advisory and may be dropped or coalesced by observers without
/// affecting correctness; only `PassCompleted` payloads are authoritative.
#[derive(Debug)]
pub enum GenerationEvent<'a> {
    PassStarted {
        index: usize,
        total: usize,
        field_keys: &'a [String],
    },
    Token {
        text: &'a str,
    },
    PassCompleted {
        index: usize,
        accumulated: &'a Value,
    },
    Completed {
        payload: &'a Value,
        raw_text: &'a str,
        provenance: &'a Provenance,
    },
}

/// Caller-supplied inputs for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    pub brief: String,
    /// User-pinned literal values keyed by top-level field key. Seeded
    /// fields are exempt from AI generation: their pinned value wins over
    /// whatever the provider returns.
    pub seeds: Map<String, Value>,
    pub temperature: Option<f64>,
    pub model: Option<String>,
}

/// Result of a successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub payload: Value,
    /// Raw provider text of the final pass.
    pub raw_text: String,
    pub provenance: Provenance,
    pub pass_count: usize,
}

/// Inputs for a single-call refinement.
pub struct RefineRequest<'a> {
    pub schema: &'a CharacterSchema,
    pub current: &'a Value,
    pub brief: &'a str,
    pub instruction: &'a str,
    /// Empty means "revise the whole profile".
    pub target_keys: &'a [String],
    pub locked_keys: &'a [String],
    pub constraint_patch: Option<&'a Value>,
    pub temperature: Option<f64>,
    pub model: Option<String>,
}

/// Result of a refinement call: a full candidate payload ready for
/// diff/merge, never a fragment.
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    pub candidate: Value,
    pub raw_text: String,
    pub provenance: Provenance,
}

pub struct Orchestrator<'a> {
    provider: &'a dyn CompletionProvider,
    settings: GenerationSettings,
}

impl<'a> Orchestrator<'a> {
    pub fn new(provider: &'a dyn CompletionProvider, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Runs every pass of the schema's plan and returns the accumulated
    /// payload. Any pass failure aborts the whole run.
    pub fn run(
        &self,
        schema: &CharacterSchema,
        input: &GenerationInput,
        observer: &mut dyn FnMut(GenerationEvent<'_>),
    ) -> Result<GenerationOutcome, EngineError> {
        let passes = resolve_passes(schema);
        let total = passes.len();
        let temperature = input
            .temperature
            .unwrap_or(self.settings.default_temperature);
        let model = input
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string());

        let mut accumulated = Value::Object(Map::new());
        let mut last_raw = String::new();

        for (index, pass) in passes.iter().enumerate() {
            let field_keys = pass_keys(pass);
            observer(GenerationEvent::PassStarted {
                index,
                total,
                field_keys: &field_keys,
            });

            let prompt = compose_pass_prompt(&PassPromptInputs {
                schema,
                fields: pass,
                pass_index: index,
                pass_total: total,
                brief: &input.brief,
                accumulated: &accumulated,
                seeds: &input.seeds,
                draft_word_ceiling: self.settings.draft_word_ceiling,
                few_shot_limit: self.settings.few_shot_limit as usize,
            });
            let request = CompletionRequest {
                system_prompt: prompt.system,
                user_prompt: prompt.user,
                contract: prompt.contract,
                temperature,
                model: model.clone(),
            };

            let raw = {
                let mut forward = |text: &str| observer(GenerationEvent::Token { text });
                self.provider
                    .complete(&request, &mut forward)
                    .map_err(|err| EngineError::Provider(err.to_string()))?
            };
            let parsed = parse_object_payload(&raw)?;
            merge_pass_output(&mut accumulated, pass, parsed, &input.seeds);
            last_raw = raw;

            observer(GenerationEvent::PassCompleted {
                index,
                accumulated: &accumulated,
            });
        }

        let provenance = Provenance {
            provider: self.provider.provider_id().to_string(),
            model,
        };
        observer(GenerationEvent::Completed {
            payload: &accumulated,
            raw_text: &last_raw,
            provenance: &provenance,
        });
        Ok(GenerationOutcome {
            payload: accumulated,
            raw_text: last_raw,
            provenance,
            pass_count: total,
        })
    }

    /// Composes and runs the single refine call, returning a full candidate
    /// payload. Targeted responses are overlaid onto the current payload so
    /// downstream diff/merge always sees two complete trees.
    pub fn refine(
        &self,
        request: &RefineRequest<'_>,
        on_token: &mut dyn FnMut(&str),
    ) -> Result<RefineOutcome, EngineError> {
        let prompt = compose_refine_prompt(&RefinePromptInputs {
            schema: request.schema,
            current: request.current,
            brief: request.brief,
            instruction: request.instruction,
            target_keys: request.target_keys,
            locked_keys: request.locked_keys,
            constraint_patch: request.constraint_patch,
        });
        let call = CompletionRequest {
            system_prompt: prompt.system,
            user_prompt: prompt.user,
            contract: prompt.contract,
            temperature: request
                .temperature
                .unwrap_or(self.settings.default_temperature),
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.provider.default_model().to_string()),
        };

        let raw = self
            .provider
            .complete(&call, on_token)
            .map_err(|err| EngineError::Provider(err.to_string()))?;
        let parsed = parse_object_payload(&raw)?;

        let candidate = if request.target_keys.is_empty() {
            Value::Object(parsed)
        } else {
            // Targeted response: overlay returned fields on the current
            // payload, ignoring any keys outside the requested subset.
            let mut merged = request.current.clone();
            if let Some(object) = merged.as_object_mut() {
                for key in request.target_keys {
                    if let Some(value) = parsed.get(key) {
                        object.insert(key.clone(), value.clone());
                    }
                }
            }
            merged
        };

        Ok(RefineOutcome {
            candidate,
            raw_text: raw,
            provenance: Provenance {
                provider: self.provider.provider_id().to_string(),
                model: call.model,
            },
        })
    }
}

/// Shallow-merges one pass's parsed output into the accumulated payload.
///
/// Only keys belonging to the pass are taken, earlier-pass keys are never
/// overwritten (the pass partition keeps key sets disjoint), and seeded
/// fields are pinned to their user-supplied values.
fn merge_pass_output(
    accumulated: &mut Value,
    pass: &[Field],
    parsed: Map<String, Value>,
    seeds: &Map<String, Value>,
) {
    let Some(target) = accumulated.as_object_mut() else {
        return;
    };
    for field in pass {
        if target.contains_key(&field.key) {
            continue;
        }
        let pinned = if field.seedable {
            seeds.get(&field.key).cloned()
        } else {
            None
        };
        if let Some(value) = pinned.or_else(|| parsed.get(&field.key).cloned()) {
            target.insert(field.key.clone(), value);
        }
    }
}
