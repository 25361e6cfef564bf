//! Append-only revision history operations: append, revert, fork, audit.
//!
//! History length is monotonically increasing. Reverting appends a new
//! revision holding a copy of the target snapshot; forking copies the whole
//! history into a brand-new profile. Past revisions are never removed or
//! reordered, and forking never mutates the source profile.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::model::{CharacterProfile, Revision, RevisionKind};

/// Appends one revision and repoints the profile's working state at it.
pub fn append_revision(profile: &mut CharacterProfile, revision: Revision) {
    profile.payload = revision.snapshot.clone();
    profile.active_revision_id = revision.id;
    profile.updated_at = Utc::now();
    profile.revisions.push(revision);
}

/// Appends a revert-kind revision carrying a copy of the target snapshot.
/// Returns the new revision's id.
pub fn revert(profile: &mut CharacterProfile, revision_id: Uuid) -> Result<Uuid> {
    let target = profile.revision(revision_id).ok_or_else(|| {
        anyhow!(
            "No revision {revision_id} in profile {} to revert to",
            profile.id
        )
    })?;
    let revision = Revision::new(
        RevisionKind::Revert,
        format!("Revert to revision {revision_id}"),
        target.snapshot.clone(),
    )
    .with_parent(revision_id);
    let new_id = revision.id;
    append_revision(profile, revision);
    Ok(new_id)
}

/// Creates a new profile seeded from a copy of the source history plus one
/// fork-kind revision pointing at the forked-from snapshot.
pub fn fork(source: &CharacterProfile, revision_id: Uuid) -> Result<CharacterProfile> {
    let target = source.revision(revision_id).ok_or_else(|| {
        anyhow!(
            "No revision {revision_id} in profile {} to fork from",
            source.id
        )
    })?;
    let revision = Revision::new(
        RevisionKind::Fork,
        format!("Fork of profile {} at revision {revision_id}", source.id),
        target.snapshot.clone(),
    )
    .with_parent(revision_id);

    let mut profile = CharacterProfile {
        id: Uuid::new_v4(),
        schema_id: source.schema_id,
        schema_name: source.schema_name.clone(),
        brief: source.brief.clone(),
        payload: revision.snapshot.clone(),
        active_revision_id: revision.id,
        revisions: source.revisions.clone(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    profile.revisions.push(revision);
    Ok(profile)
}

/// Flattened history entry for audit display.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionAuditEntry {
    pub revision_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: RevisionKind,
    pub instruction: String,
    pub snapshot_hash: String,
    pub parent_id: Option<Uuid>,
    pub active: bool,
}

/// Flattens the ledger into display entries, oldest first.
pub fn revision_audit(profile: &CharacterProfile) -> Vec<RevisionAuditEntry> {
    profile
        .revisions
        .iter()
        .map(|revision| RevisionAuditEntry {
            revision_id: revision.id,
            timestamp: revision.created_at,
            kind: revision.kind,
            instruction: revision.instruction.clone(),
            snapshot_hash: revision.snapshot_hash.clone(),
            parent_id: revision.parent_id,
            active: revision.id == profile.active_revision_id,
        })
        .collect()
}
