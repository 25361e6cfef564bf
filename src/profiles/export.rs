//! ZIP archive export/import for profiles and their schemas.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use uuid::Uuid;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::library::LibraryManager;
use crate::orchestration::{log_event, EventType};

use super::model::CharacterProfile;
use super::storage::compute_hash;

const PROFILE_ENTRY: &str = "profile.json";
const SCHEMA_ENTRY: &str = "schema.json";

/// Result of writing an export archive.
#[derive(Debug, Clone)]
pub struct ProfileExportResult {
    pub profile_id: Uuid,
    pub archive_path: PathBuf,
    pub hash: String,
    pub event_id: Uuid,
}

/// Exports a profile (and its schema, when it still exists) as a ZIP
/// archive. With no destination, the archive lands in the workspace
/// exports directory under a slugged name.
pub fn export_profile(
    library: &LibraryManager,
    profile_id: Uuid,
    destination: Option<PathBuf>,
) -> Result<ProfileExportResult> {
    let profile = library.require_profile(profile_id)?;
    let schema = library.load_schema(profile.schema_id)?;

    let archive_path = match destination {
        Some(path) => path,
        None => {
            let slug = library.export_slug(&profile.schema_name);
            library.layout.exports_dir().join(format!("{slug}.zip"))
        }
    };
    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating export directory {}", parent.display()))?;
    }

    let file = File::create(&archive_path)
        .with_context(|| format!("Failed creating archive {}", archive_path.display()))?;
    let mut archive = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    archive.start_file(PROFILE_ENTRY, options)?;
    archive.write_all(&serde_json::to_vec_pretty(&profile)?)?;
    if let Some(schema) = &schema {
        archive.start_file(SCHEMA_ENTRY, options)?;
        archive.write_all(&serde_json::to_vec_pretty(schema)?)?;
    }
    archive.finish()?;

    let hash = compute_hash(&fs::read(&archive_path)?);
    prune_exports(library)?;
    let event_id = log_event(
        &library.layout,
        EventType::ProfileExported,
        serde_json::json!({
            "profile_id": profile.id,
            "archive": archive_path,
            "hash": hash,
            "includes_schema": schema.is_some(),
        }),
    )?;

    Ok(ProfileExportResult {
        profile_id: profile.id,
        archive_path,
        hash,
        event_id,
    })
}

/// Imports a profile archive back into the workspace, restoring its schema
/// when the archive carries one and the workspace does not already have it.
pub fn import_profile(library: &LibraryManager, archive_path: &Path) -> Result<CharacterProfile> {
    if !archive_path.exists() {
        bail!(
            "Archive {} not found. Export a profile first.",
            archive_path.display()
        );
    }
    let file = File::open(archive_path)
        .with_context(|| format!("Failed opening {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)?;

    let profile: CharacterProfile = {
        let mut entry = archive
            .by_name(PROFILE_ENTRY)
            .with_context(|| format!("Archive missing {PROFILE_ENTRY}"))?;
        let mut contents = String::new();
        entry.read_to_string(&mut contents)?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed parsing {PROFILE_ENTRY}"))?
    };

    if let Ok(mut entry) = archive.by_name(SCHEMA_ENTRY) {
        let mut contents = String::new();
        entry.read_to_string(&mut contents)?;
        let schema: crate::schema::model::CharacterSchema = serde_json::from_str(&contents)
            .with_context(|| format!("Failed parsing {SCHEMA_ENTRY}"))?;
        if library.load_schema(schema.id)?.is_none() {
            library.save_schema(&schema)?;
        }
    }

    library.save_profile(&profile)?;
    log_event(
        &library.layout,
        EventType::ProfileImported,
        serde_json::json!({
            "profile_id": profile.id,
            "archive": archive_path,
        }),
    )?;
    Ok(profile)
}

/// Keeps the exports directory below the configured retention count,
/// removing oldest archives first.
fn prune_exports(library: &LibraryManager) -> Result<()> {
    let dir = library.layout.exports_dir();
    if !dir.exists() {
        return Ok(());
    }
    let retention = library.config.ledger.export_retention as usize;
    let mut entries: Vec<_> = fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|kind| kind.is_file()).unwrap_or(false))
        .collect();
    if entries.len() <= retention {
        return Ok(());
    }
    entries.sort_by_key(|entry| entry.metadata().and_then(|meta| meta.modified()).ok());
    while entries.len() > retention {
        let entry = entries.remove(0);
        let _ = fs::remove_file(entry.path());
    }
    Ok(())
}
