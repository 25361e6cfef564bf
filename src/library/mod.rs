//! Studio workspace management: configuration, layout, and schema/profile
//! persistence through the document store.

pub mod config;
pub mod layout;

pub use config::{workspace_root, AppConfig, GenerationSettings, LedgerSettings};
pub use layout::{StudioLayout, EXPORTS_SUBDIR, PROFILES_SUBDIR, SCHEMAS_SUBDIR};

use anyhow::Result;
use rand::{distributions::Alphanumeric, Rng};
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::EngineError;
use crate::orchestration::{log_event, EventType};
use crate::profiles::model::CharacterProfile;
use crate::profiles::storage::{
    read_typed, write_typed, DocumentStore, DocumentWriteOutcome, FsDocumentStore,
};
use crate::schema::model::CharacterSchema;

/// Manages the workspace: config, layout, and schema/profile CRUD.
///
/// Holds no global mutable state; everything flows through the instance a
/// caller constructs, so tests can point separate managers at separate
/// temp workspaces.
pub struct LibraryManager {
    pub config: AppConfig,
    pub layout: StudioLayout,
    store: FsDocumentStore,
}

impl LibraryManager {
    /// Opens (creating if necessary) the default workspace.
    pub fn new() -> Result<Self> {
        Self::at(workspace_root()?)
    }

    /// Opens a workspace rooted at an explicit directory.
    pub fn at(root: PathBuf) -> Result<Self> {
        let layout = StudioLayout::new(root);
        layout.ensure()?;
        let config = config::load_or_default(&layout.root)?;
        let store = FsDocumentStore::new(layout.root.clone());
        Ok(Self {
            config,
            layout,
            store,
        })
    }

    pub fn store(&self) -> &FsDocumentStore {
        &self.store
    }

    pub fn save_config(&self) -> Result<()> {
        config::save(&self.layout.root, &self.config)
    }

    // ── Schemas ─────────────────────────────────────────────────────────

    pub fn save_schema(&self, schema: &CharacterSchema) -> Result<DocumentWriteOutcome> {
        let outcome = write_typed(&self.store, SCHEMAS_SUBDIR, &schema.id.to_string(), schema)?;
        log_event(
            &self.layout,
            EventType::SchemaSaved,
            serde_json::json!({ "schema_id": schema.id, "name": schema.name }),
        )?;
        Ok(outcome)
    }

    pub fn load_schema(&self, id: Uuid) -> Result<Option<CharacterSchema>> {
        read_typed(&self.store, SCHEMAS_SUBDIR, &id.to_string())
    }

    /// Loads a schema or fails with a schema-resolution error.
    pub fn require_schema(&self, id: Uuid) -> Result<CharacterSchema> {
        self.load_schema(id)?.ok_or_else(|| {
            EngineError::SchemaResolution(format!("Schema {id} no longer exists")).into()
        })
    }

    pub fn list_schemas(&self) -> Result<Vec<CharacterSchema>> {
        let mut schemas = Vec::new();
        for id in self.store.list_documents(SCHEMAS_SUBDIR)? {
            if let Some(schema) = read_typed(&self.store, SCHEMAS_SUBDIR, &id)? {
                schemas.push(schema);
            }
        }
        Ok(schemas)
    }

    pub fn delete_schema(&self, id: Uuid) -> Result<()> {
        self.store.delete_document(SCHEMAS_SUBDIR, &id.to_string())?;
        log_event(
            &self.layout,
            EventType::SchemaDeleted,
            serde_json::json!({ "schema_id": id }),
        )?;
        Ok(())
    }

    // ── Profiles ────────────────────────────────────────────────────────

    pub fn save_profile(&self, profile: &CharacterProfile) -> Result<DocumentWriteOutcome> {
        write_typed(&self.store, PROFILES_SUBDIR, &profile.id.to_string(), profile)
    }

    pub fn load_profile(&self, id: Uuid) -> Result<Option<CharacterProfile>> {
        read_typed(&self.store, PROFILES_SUBDIR, &id.to_string())
    }

    pub fn require_profile(&self, id: Uuid) -> Result<CharacterProfile> {
        self.load_profile(id)?.ok_or_else(|| {
            EngineError::SchemaResolution(format!("Profile {id} no longer exists")).into()
        })
    }

    pub fn list_profiles(&self) -> Result<Vec<CharacterProfile>> {
        let mut profiles = Vec::new();
        for id in self.store.list_documents(PROFILES_SUBDIR)? {
            if let Some(profile) = read_typed(&self.store, PROFILES_SUBDIR, &id)? {
                profiles.push(profile);
            }
        }
        Ok(profiles)
    }

    pub fn delete_profile_document(&self, id: Uuid) -> Result<()> {
        self.store.delete_document(PROFILES_SUBDIR, &id.to_string())
    }

    /// Filesystem-friendly slug for export archive names.
    pub fn export_slug(&self, name: &str) -> String {
        let base: String = name
            .to_ascii_lowercase()
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '-' })
            .collect();
        let base = base.trim_matches('-').to_string();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(|byte| (byte as char).to_ascii_lowercase())
            .collect();
        if base.is_empty() {
            suffix
        } else {
            format!("{base}-{suffix}")
        }
    }
}
