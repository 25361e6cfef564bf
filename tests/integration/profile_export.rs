use personabase::profiles::export::{export_profile, import_profile};
use personabase::profiles::ProfileService;
use serde_json::Map;

use crate::support::provider::ScriptedProvider;
use crate::support::studio::{basic_schema, StudioFixture};

#[test]
fn export_writes_an_archive_into_the_exports_dir() {
    let fixture = StudioFixture::new();
    let schema = fixture.seed_schema(basic_schema());
    let provider = ScriptedProvider::new([
        r#"{"name": "Kara Voss", "age": 34, "traits": "wry, loyal, tired, sharp"}"#,
    ]);
    let service = ProfileService::new(&fixture.library, &provider);
    let generated = service
        .generate(schema.id, "brief", Map::new(), &mut |_| {})
        .expect("generation should succeed");

    let exported = export_profile(&fixture.library, generated.profile.id, None)
        .expect("export should succeed");

    assert!(exported.archive_path.exists());
    assert!(exported
        .archive_path
        .starts_with(fixture.library.layout.exports_dir()));
    assert!(!exported.hash.is_empty());
}

#[test]
fn export_then_import_restores_profile_and_schema() {
    let fixture = StudioFixture::new();
    let schema = fixture.seed_schema(basic_schema());
    let provider = ScriptedProvider::new([
        r#"{"name": "Kara Voss", "age": 34, "traits": "wry, loyal, tired, sharp"}"#,
    ]);
    let service = ProfileService::new(&fixture.library, &provider);
    let generated = service
        .generate(schema.id, "brief", Map::new(), &mut |_| {})
        .expect("generation should succeed");

    let exported = export_profile(&fixture.library, generated.profile.id, None)
        .expect("export should succeed");

    // Wipe both entities, then restore from the archive.
    service
        .delete_profile(generated.profile.id)
        .expect("delete profile");
    fixture
        .library
        .delete_schema(schema.id)
        .expect("delete schema");

    let imported = import_profile(&fixture.library, &exported.archive_path)
        .expect("import should succeed");

    assert_eq!(imported.id, generated.profile.id);
    assert_eq!(imported.payload["name"], "Kara Voss");
    assert_eq!(imported.revisions.len(), 1);

    let restored_schema = fixture
        .library
        .load_schema(schema.id)
        .expect("load schema")
        .expect("schema restored from archive");
    assert_eq!(restored_schema.name, schema.name);

    let stored = fixture
        .library
        .load_profile(imported.id)
        .expect("load profile")
        .expect("profile persisted");
    assert_eq!(stored.active_revision_id, imported.active_revision_id);
}

#[test]
fn importing_a_missing_archive_fails_cleanly() {
    let fixture = StudioFixture::new();
    let missing = fixture.workspace().join("exports/absent.zip");
    let result = import_profile(&fixture.library, &missing);
    assert!(result.is_err());
}
