//! UI-facing entry points for generation, refinement, and history
//! operations.
//!
//! Every mutating operation appends exactly one revision, recomputes the
//! confidence report, persists the profile through the document store, and
//! logs one audit event. Generation and refinement are single-flight per
//! profile: the caller must not start a new run while one is in flight for
//! the same target; the service holds no cross-request lock of its own.

use anyhow::Result;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::generation::orchestrator::{
    GenerationEvent, GenerationInput, Orchestrator, Provenance, RefineRequest,
};
use crate::generation::provider::CompletionProvider;
use crate::library::LibraryManager;
use crate::orchestration::{log_event, log_profile_event, EventType, ProfileEventDetails};

use super::confidence::evaluate;
use super::diff::diff_paths;
use super::ledger::{self, RevisionAuditEntry};
use super::merge::{apply_path_selections, enforce_locked_paths};
use super::model::{CharacterProfile, ConfidenceReport, Revision, RevisionKind};

/// Result of a fresh generation.
#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub profile: CharacterProfile,
    pub raw_text: String,
    pub provenance: Provenance,
    pub confidence: ConfidenceReport,
}

/// An AI-proposed refinement awaiting user selection.
///
/// Nothing is persisted until the proposal is accepted; discarding it is
/// free.
#[derive(Debug, Clone)]
pub struct RefinementProposal {
    pub profile_id: Uuid,
    pub instruction: String,
    pub target_keys: Vec<String>,
    pub locked_keys: Vec<String>,
    pub candidate: Value,
    /// Paths at which the candidate differs from the current payload.
    pub changed_paths: Vec<String>,
    pub raw_text: String,
    pub provenance: Provenance,
}

/// Result of a persisted profile mutation.
#[derive(Debug, Clone)]
pub struct ProfileUpdateOutput {
    pub profile: CharacterProfile,
    pub revision_id: Uuid,
    pub changed_paths: Vec<String>,
    pub confidence: ConfidenceReport,
}

pub struct ProfileService<'a> {
    library: &'a LibraryManager,
    provider: &'a dyn CompletionProvider,
}

impl<'a> ProfileService<'a> {
    pub fn new(library: &'a LibraryManager, provider: &'a dyn CompletionProvider) -> Self {
        Self { library, provider }
    }

    /// Generates a new profile from a brief. A failed pass aborts the whole
    /// run; nothing already accumulated is persisted.
    pub fn generate(
        &self,
        schema_id: Uuid,
        brief: &str,
        seeds: Map<String, Value>,
        observer: &mut dyn FnMut(GenerationEvent<'_>),
    ) -> Result<GenerateOutput> {
        let schema = self.library.require_schema(schema_id)?;
        let orchestrator = Orchestrator::new(self.provider, self.library.config.generation.clone());
        let input = GenerationInput {
            brief: brief.to_string(),
            seeds,
            temperature: None,
            model: None,
        };

        let outcome = match orchestrator.run(&schema, &input, observer) {
            Ok(outcome) => outcome,
            Err(err) => {
                log_event(
                    &self.library.layout,
                    EventType::GenerationFailed,
                    serde_json::json!({ "schema_id": schema_id, "message": err.to_string() }),
                )?;
                return Err(err.into());
            }
        };

        let confidence = evaluate(&schema, &outcome.payload, outcome.pass_count);
        let revision = Revision::new(RevisionKind::Generate, brief, outcome.payload.clone())
            .with_confidence(confidence.clone());
        let revision_id = revision.id;
        let revision_hash = revision.snapshot_hash.clone();
        let profile =
            CharacterProfile::from_revision(schema.id, schema.name.clone(), brief, revision);

        self.library.save_profile(&profile)?;
        log_profile_event(
            &self.library.layout,
            EventType::ProfileGenerated,
            ProfileEventDetails::new(profile.id)
                .with_revision(revision_id, RevisionKind::Generate)
                .with_hashes(None, Some(revision_hash))
                .with_payload(serde_json::json!({
                    "schema_id": schema.id,
                    "passes": outcome.pass_count,
                    "provider": outcome.provenance.provider.clone(),
                    "model": outcome.provenance.model.clone(),
                })),
        )?;

        Ok(GenerateOutput {
            profile,
            raw_text: outcome.raw_text,
            provenance: outcome.provenance,
            confidence,
        })
    }

    /// Asks the provider for a refinement candidate without persisting
    /// anything. The caller diffs, selects, then calls
    /// [`accept_refinement`](Self::accept_refinement).
    pub fn propose_refinement(
        &self,
        profile_id: Uuid,
        instruction: &str,
        target_keys: &[String],
        locked_keys: &[String],
        constraint_patch: Option<&Value>,
    ) -> Result<RefinementProposal> {
        let profile = self.library.require_profile(profile_id)?;
        let schema = self.library.require_schema(profile.schema_id)?;
        for key in target_keys {
            if schema.field(key).is_none() {
                return Err(crate::error::EngineError::SchemaResolution(format!(
                    "Field '{key}' no longer exists in schema '{}'",
                    schema.name
                ))
                .into());
            }
        }
        let orchestrator = Orchestrator::new(self.provider, self.library.config.generation.clone());

        let outcome = orchestrator.refine(
            &RefineRequest {
                schema: &schema,
                current: &profile.payload,
                brief: &profile.brief,
                instruction,
                target_keys,
                locked_keys,
                constraint_patch,
                temperature: None,
                model: None,
            },
            &mut |_| {},
        )?;

        let changed_paths = diff_paths(&profile.payload, &outcome.candidate);
        Ok(RefinementProposal {
            profile_id,
            instruction: instruction.to_string(),
            target_keys: target_keys.to_vec(),
            locked_keys: locked_keys.to_vec(),
            candidate: outcome.candidate,
            changed_paths,
            raw_text: outcome.raw_text,
            provenance: outcome.provenance,
        })
    }

    /// Merges the selected paths of a proposal into the profile and appends
    /// one refine-kind revision. An empty selection accepts the whole
    /// candidate. Locked paths always come back from the pre-merge payload,
    /// regardless of what the provider returned.
    pub fn accept_refinement(
        &self,
        proposal: &RefinementProposal,
        selected_paths: &[String],
    ) -> Result<ProfileUpdateOutput> {
        let mut profile = self.library.require_profile(proposal.profile_id)?;
        let schema = self.library.require_schema(profile.schema_id)?;

        let merged = apply_path_selections(&profile.payload, &proposal.candidate, selected_paths);
        let merged = enforce_locked_paths(&profile.payload, &merged, &proposal.locked_keys);
        let changed_paths = diff_paths(&profile.payload, &merged);

        let confidence = evaluate(&schema, &merged, base_pass_count(&profile));
        let revision = Revision::new(RevisionKind::Refine, proposal.instruction.clone(), merged)
            .with_targets(proposal.target_keys.iter().cloned())
            .with_locked(proposal.locked_keys.iter().cloned())
            .with_parent(profile.active_revision_id)
            .with_confidence(confidence.clone());

        self.persist_update(
            &mut profile,
            revision,
            EventType::RefinementApplied,
            changed_paths,
            confidence,
        )
    }

    /// Records a manual edit of the payload as one edit-kind revision.
    pub fn edit(
        &self,
        profile_id: Uuid,
        payload: Value,
        note: &str,
    ) -> Result<ProfileUpdateOutput> {
        let mut profile = self.library.require_profile(profile_id)?;
        let schema = self.library.require_schema(profile.schema_id)?;

        let changed_paths = diff_paths(&profile.payload, &payload);
        let confidence = evaluate(&schema, &payload, base_pass_count(&profile));
        let revision = Revision::new(RevisionKind::Edit, note, payload)
            .with_parent(profile.active_revision_id)
            .with_confidence(confidence.clone());

        self.persist_update(
            &mut profile,
            revision,
            EventType::ProfileEdited,
            changed_paths,
            confidence,
        )
    }

    /// Appends a revert-kind revision restoring an earlier snapshot.
    pub fn revert(&self, profile_id: Uuid, revision_id: Uuid) -> Result<ProfileUpdateOutput> {
        let mut profile = self.library.require_profile(profile_id)?;
        let hash_before = active_hash(&profile);
        let before = profile.payload.clone();

        let new_revision_id = ledger::revert(&mut profile, revision_id)?;
        let changed_paths = diff_paths(&before, &profile.payload);
        self.library.save_profile(&profile)?;
        log_profile_event(
            &self.library.layout,
            EventType::ProfileReverted,
            ProfileEventDetails::new(profile.id)
                .with_revision(new_revision_id, RevisionKind::Revert)
                .with_hashes(hash_before, active_hash(&profile))
                .with_diff_summary(changed_paths.iter().cloned()),
        )?;

        let confidence = profile
            .active_revision()
            .and_then(|revision| revision.confidence.clone())
            .unwrap_or(ConfidenceReport {
                schema_valid: true,
                fields_complete: true,
                pass_count: base_pass_count(&profile),
                warnings: Vec::new(),
            });
        Ok(ProfileUpdateOutput {
            profile,
            revision_id: new_revision_id,
            changed_paths,
            confidence,
        })
    }

    /// Forks a new profile from one revision. The source profile is never
    /// mutated.
    pub fn fork(&self, profile_id: Uuid, revision_id: Uuid) -> Result<CharacterProfile> {
        let source = self.library.require_profile(profile_id)?;
        let forked = ledger::fork(&source, revision_id)?;
        self.library.save_profile(&forked)?;
        log_profile_event(
            &self.library.layout,
            EventType::ProfileForked,
            ProfileEventDetails::new(forked.id)
                .with_revision(forked.active_revision_id, RevisionKind::Fork)
                .with_payload(serde_json::json!({
                    "source_profile_id": source.id,
                    "source_revision_id": revision_id,
                })),
        )?;
        Ok(forked)
    }

    /// Deletes the whole profile entity. Revisions are never deleted
    /// individually.
    pub fn delete_profile(&self, profile_id: Uuid) -> Result<()> {
        self.library.delete_profile_document(profile_id)?;
        log_profile_event(
            &self.library.layout,
            EventType::ProfileDeleted,
            ProfileEventDetails::new(profile_id),
        )?;
        Ok(())
    }

    /// Flattened revision history for audit display.
    pub fn audit(&self, profile_id: Uuid) -> Result<Vec<RevisionAuditEntry>> {
        let profile = self.library.require_profile(profile_id)?;
        Ok(ledger::revision_audit(&profile))
    }

    fn persist_update(
        &self,
        profile: &mut CharacterProfile,
        revision: Revision,
        event_type: EventType,
        changed_paths: Vec<String>,
        confidence: ConfidenceReport,
    ) -> Result<ProfileUpdateOutput> {
        let hash_before = active_hash(profile);
        let revision_id = revision.id;
        let kind = revision.kind;
        let hash_after = revision.snapshot_hash.clone();
        ledger::append_revision(profile, revision);

        self.library.save_profile(profile)?;
        log_profile_event(
            &self.library.layout,
            event_type,
            ProfileEventDetails::new(profile.id)
                .with_revision(revision_id, kind)
                .with_hashes(hash_before, Some(hash_after))
                .with_diff_summary(changed_paths.iter().cloned()),
        )?;

        Ok(ProfileUpdateOutput {
            profile: profile.clone(),
            revision_id,
            changed_paths,
            confidence,
        })
    }
}

fn active_hash(profile: &CharacterProfile) -> Option<String> {
    profile
        .active_revision()
        .map(|revision| revision.snapshot_hash.clone())
}

/// Pass count of the originating generation, carried through refinements.
fn base_pass_count(profile: &CharacterProfile) -> usize {
    profile
        .revisions
        .first()
        .and_then(|revision| revision.confidence.as_ref())
        .map_or(1, |confidence| confidence.pass_count)
}
