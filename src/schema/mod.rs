pub mod contract;
pub mod model;
pub mod passes;

pub use contract::contract_for_fields;
pub use model::{CharacterSchema, Field, FieldKind, GenerationHint, Specificity};
pub use passes::{is_multi_pass, pass_keys, resolve_passes};
