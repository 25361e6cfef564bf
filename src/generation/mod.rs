pub mod orchestrator;
pub mod parse;
pub mod provider;

pub use orchestrator::{
    GenerationEvent, GenerationInput, GenerationOutcome, Orchestrator, Provenance, RefineOutcome,
    RefineRequest,
};
pub use parse::parse_object_payload;
pub use provider::{CompletionProvider, CompletionRequest};
