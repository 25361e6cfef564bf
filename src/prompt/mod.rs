pub mod composer;
pub mod guidance;

pub use composer::{
    compose_pass_prompt, compose_refine_prompt, ComposedPrompt, PassPromptInputs,
    RefinePromptInputs,
};
