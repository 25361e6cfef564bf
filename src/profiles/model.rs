//! Data structures backing character profiles and their revision history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::storage::compute_hash;

/// What produced a revision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RevisionKind {
    Generate,
    Refine,
    Edit,
    Revert,
    Fork,
}

/// Derived completeness/validity summary for a payload against its schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceReport {
    pub schema_valid: bool,
    pub fields_complete: bool,
    pub pass_count: usize,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// One immutable entry in a profile's history.
///
/// A revision's snapshot is always a complete, independently valid payload,
/// never a delta. The revision list is append-only: reverting and forking
/// add entries rather than rewriting what came before.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub kind: RevisionKind,
    /// Instruction or brief that produced this snapshot.
    pub instruction: String,
    pub snapshot: Value,
    /// SHA-256 of the canonical snapshot bytes, for integrity display.
    pub snapshot_hash: String,
    /// Field keys the producing operation targeted, when it was scoped.
    #[serde(default)]
    pub target_keys: Vec<String>,
    /// Field paths locked while producing this snapshot.
    #[serde(default)]
    pub locked_keys: Vec<String>,
    pub parent_id: Option<Uuid>,
    pub confidence: Option<ConfidenceReport>,
}

impl Revision {
    pub fn new(kind: RevisionKind, instruction: impl Into<String>, snapshot: Value) -> Self {
        let snapshot_hash = serde_json::to_vec(&snapshot)
            .map(|bytes| compute_hash(&bytes))
            .unwrap_or_default();
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            kind,
            instruction: instruction.into(),
            snapshot,
            snapshot_hash,
            target_keys: Vec::new(),
            locked_keys: Vec::new(),
            parent_id: None,
            confidence: None,
        }
    }

    pub fn with_targets<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locked<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locked_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_confidence(mut self, confidence: ConfidenceReport) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// One generated/edited character with its full revision history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: Uuid,
    pub schema_id: Uuid,
    /// Denormalized so the profile stays displayable if its schema is
    /// renamed or deleted.
    pub schema_name: String,
    /// Free-text brief the profile was generated from.
    pub brief: String,
    /// Current working payload; kept in lockstep with the active revision.
    pub payload: Value,
    pub revisions: Vec<Revision>,
    pub active_revision_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CharacterProfile {
    /// Seeds a new profile from its first revision.
    pub fn from_revision(
        schema_id: Uuid,
        schema_name: impl Into<String>,
        brief: impl Into<String>,
        revision: Revision,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            schema_id,
            schema_name: schema_name.into(),
            brief: brief.into(),
            payload: revision.snapshot.clone(),
            active_revision_id: revision.id,
            revisions: vec![revision],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn revision(&self, id: Uuid) -> Option<&Revision> {
        self.revisions.iter().find(|revision| revision.id == id)
    }

    pub fn active_revision(&self) -> Option<&Revision> {
        self.revision(self.active_revision_id)
    }
}
