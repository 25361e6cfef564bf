pub mod confidence;
pub mod diff;
pub mod export;
pub mod ledger;
pub mod merge;
pub mod model;
pub mod service;
pub mod storage;

pub use confidence::evaluate;
pub use diff::diff_paths;
pub use export::{export_profile, import_profile, ProfileExportResult};
pub use ledger::{revision_audit, RevisionAuditEntry};
pub use merge::{apply_path_selections, enforce_locked_paths};
pub use model::{CharacterProfile, ConfidenceReport, Revision, RevisionKind};
pub use service::{GenerateOutput, ProfileService, ProfileUpdateOutput, RefinementProposal};
pub use storage::{compute_hash, DocumentStore, DocumentWriteOutcome, FsDocumentStore};
