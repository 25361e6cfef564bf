use personabase::library::LibraryManager;
use personabase::schema::{CharacterSchema, Field, FieldKind, GenerationHint};

use crate::IntegrationHarness;

/// Temp workspace plus an opened library manager.
pub struct StudioFixture {
    harness: IntegrationHarness,
    pub library: LibraryManager,
}

impl StudioFixture {
    pub fn new() -> Self {
        let harness = IntegrationHarness::new();
        let library = harness.library();
        Self { harness, library }
    }

    pub fn workspace(&self) -> &std::path::Path {
        self.harness.workspace_path()
    }

    /// Saves a schema into the workspace and returns it.
    pub fn seed_schema(&self, schema: CharacterSchema) -> CharacterSchema {
        self.library
            .save_schema(&schema)
            .expect("failed to save schema fixture");
        schema
    }
}

/// Single-pass schema: name (seedable), age, traits.
pub fn basic_schema() -> CharacterSchema {
    CharacterSchema::new(
        "Companion",
        vec![
            Field::new("name", "Name", FieldKind::ShortText)
                .with_description("The character's full name")
                .with_hint(GenerationHint::Identity)
                .seedable(),
            Field::new("age", "Age", FieldKind::Number)
                .with_description("Age in years")
                .with_hint(GenerationHint::Calibration),
            Field::new("traits", "Core traits", FieldKind::TraitList).with_count(4),
        ],
    )
}

/// Two-pass schema: pass 0 produces `name`, pass 1 produces `backstory`.
pub fn two_pass_schema() -> CharacterSchema {
    let mut schema = CharacterSchema::new(
        "Protagonist",
        vec![
            Field::new("name", "Name", FieldKind::ShortText)
                .with_hint(GenerationHint::Identity)
                .seedable(),
            Field::new("backstory", "Backstory", FieldKind::ShortText)
                .with_hint(GenerationHint::Narrative)
                .with_depends_on(["name"]),
        ],
    );
    schema.generation_order = vec![vec!["name".into()], vec!["backstory".into()]];
    schema
}
