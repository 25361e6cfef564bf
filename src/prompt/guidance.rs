//! Canned policy text folded into generation and refinement prompts.

use crate::schema::model::{GenerationHint, Specificity};

/// Baseline quality rules attached to every system prompt.
pub const QUALITY_RULES: &str = "\
- Stay strictly inside the requested output contract; emit no keys it does not name.
- Keep every value internally consistent with every other value in the profile.
- Never emit placeholder text such as 'TBD', 'N/A', or 'unknown'; commit to concrete details.
- Write in third person and present tense unless a field's guidance says otherwise.";

/// Verbosity policy text for the schema's specificity setting.
pub fn specificity_policy(specificity: Specificity) -> &'static str {
    match specificity {
        Specificity::Low => {
            "Keep values terse: single words or short phrases, no embellishment."
        }
        Specificity::Medium => {
            "Use moderately detailed values: one to two sentences wherever prose is called for."
        }
        Specificity::High => {
            "Use richly specific values: concrete names, places, and sensory detail wherever prose is called for."
        }
    }
}

/// Extra guidance attached to a field carrying a generation hint.
pub fn hint_guidance(hint: GenerationHint) -> &'static str {
    match hint {
        GenerationHint::Identity => {
            "This field anchors who the character fundamentally is. Favor distinctive, memorable choices over safe generic ones, and keep it stable enough for every later field to build on."
        }
        GenerationHint::Narrative => {
            "This field is story material. Give it cause and effect: concrete events, motivations, and consequences that could seed scenes."
        }
        GenerationHint::Behavioral => {
            "This field describes how the character acts, under pressure and in ordinary life. Ground it in observable behavior rather than inner monologue."
        }
        GenerationHint::Calibration => {
            "This field tunes a numeric or scaled judgment. Pick the value deliberately relative to an ordinary person, and keep it consistent with every trait already established."
        }
    }
}

/// Length ceiling applied to every pass except the final one.
pub fn brevity_ceiling(word_ceiling: u32) -> String {
    format!(
        "Earlier passes feed later ones as context. Keep each value under roughly {word_ceiling} words so the running context stays small."
    )
}
