//! Shared filesystem layout for the studio workspace.
//!
//! Centralizing the subdirectory constants here keeps string literals out of
//! the storage and service modules.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

/// Collection directory storing schema JSON documents.
pub const SCHEMAS_SUBDIR: &str = "schemas";
/// Collection directory storing profile JSON documents.
pub const PROFILES_SUBDIR: &str = "profiles";
/// Directory receiving export archives.
pub const EXPORTS_SUBDIR: &str = "exports";
/// Append-only audit event log file.
pub const EVENTS_FILE: &str = "events.jsonl";

/// Convenience wrapper for locating workspace paths.
#[derive(Debug, Clone)]
pub struct StudioLayout {
    pub root: PathBuf,
}

impl StudioLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn schemas_dir(&self) -> PathBuf {
        self.root.join(SCHEMAS_SUBDIR)
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join(PROFILES_SUBDIR)
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.root.join(EXPORTS_SUBDIR)
    }

    pub fn events_path(&self) -> PathBuf {
        self.root.join(EVENTS_FILE)
    }

    /// Creates every workspace directory that does not yet exist.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(self.schemas_dir())?;
        fs::create_dir_all(self.profiles_dir())?;
        fs::create_dir_all(self.exports_dir())?;
        Ok(())
    }
}
