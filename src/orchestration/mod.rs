//! Append-only audit log for studio operations.
//!
//! Every mutating operation appends one JSONL event. The log is the crate's
//! observability surface: it is never read back to drive behavior, only for
//! audit views and debugging.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

use crate::library::layout::StudioLayout;
use crate::profiles::model::RevisionKind;

/// Type of studio events that can be logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SchemaSaved,
    SchemaDeleted,
    ProfileGenerated,
    GenerationFailed,
    RefinementApplied,
    ProfileEdited,
    ProfileReverted,
    ProfileForked,
    ProfileExported,
    ProfileImported,
    ProfileDeleted,
}

/// General-purpose studio event stored as JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioEvent {
    pub event_id: Uuid,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub details: Value,
}

/// Structured payload logged for every profile mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileEventDetails {
    pub profile_id: Uuid,
    #[serde(default)]
    pub revision_id: Option<Uuid>,
    #[serde(default)]
    pub revision_kind: Option<RevisionKind>,
    #[serde(default)]
    pub diff_summary: Vec<String>,
    pub hash_before: Option<String>,
    pub hash_after: Option<String>,
    #[serde(default)]
    pub payload: Value,
}

impl ProfileEventDetails {
    pub fn new(profile_id: Uuid) -> Self {
        Self {
            profile_id,
            revision_id: None,
            revision_kind: None,
            diff_summary: Vec::new(),
            hash_before: None,
            hash_after: None,
            payload: Value::Null,
        }
    }

    pub fn with_revision(mut self, revision_id: Uuid, kind: RevisionKind) -> Self {
        self.revision_id = Some(revision_id);
        self.revision_kind = Some(kind);
        self
    }

    pub fn with_diff_summary<I, S>(mut self, summary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.diff_summary = summary.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hashes(mut self, before: Option<String>, after: Option<String>) -> Self {
        self.hash_before = before;
        self.hash_after = after;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Wraps the append-only event log for a workspace.
pub struct StudioLog {
    events_path: PathBuf,
}

impl StudioLog {
    pub fn for_layout(layout: &StudioLayout) -> Self {
        Self {
            events_path: layout.events_path(),
        }
    }

    pub fn append_event(&self, event: &StudioEvent) -> Result<()> {
        if let Some(parent) = self.events_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)?;
        file.write_all(serde_json::to_string(event)?.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    pub fn load_events(&self) -> Result<Vec<StudioEvent>> {
        if !self.events_path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.events_path)?;
        let mut events = Vec::new();
        for line in data.lines().filter(|line| !line.trim().is_empty()) {
            let event: StudioEvent = serde_json::from_str(line)?;
            events.push(event);
        }
        Ok(events)
    }

    pub fn load_events_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<StudioEvent>> {
        Ok(self
            .load_events()?
            .into_iter()
            .filter(|event| event.timestamp >= cutoff)
            .collect())
    }
}

/// Appends a simple event with free-form details.
pub fn log_event(layout: &StudioLayout, event_type: EventType, details: Value) -> Result<Uuid> {
    let event = StudioEvent {
        event_id: Uuid::new_v4(),
        event_type,
        timestamp: Utc::now(),
        details,
    };
    StudioLog::for_layout(layout).append_event(&event)?;
    Ok(event.event_id)
}

/// Appends a structured profile mutation event.
pub fn log_profile_event(
    layout: &StudioLayout,
    event_type: EventType,
    details: ProfileEventDetails,
) -> Result<Uuid> {
    let event = StudioEvent {
        event_id: Uuid::new_v4(),
        event_type,
        timestamp: Utc::now(),
        details: serde_json::to_value(details)?,
    };
    StudioLog::for_layout(layout).append_event(&event)?;
    Ok(event.event_id)
}
