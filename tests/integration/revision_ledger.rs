use personabase::profiles::ledger::{append_revision, fork, revert, revision_audit};
use personabase::profiles::{diff_paths, CharacterProfile, Revision, RevisionKind};
use serde_json::json;
use uuid::Uuid;

fn seeded_profile() -> CharacterProfile {
    let revision = Revision::new(
        RevisionKind::Generate,
        "A smuggler with a conscience",
        json!({ "name": "Kara Voss", "age": 34 }),
    );
    CharacterProfile::from_revision(
        Uuid::new_v4(),
        "Protagonist",
        "A smuggler with a conscience",
        revision,
    )
}

#[test]
fn appending_repoints_payload_and_active_revision() {
    let mut profile = seeded_profile();
    let edit = Revision::new(
        RevisionKind::Edit,
        "bump age",
        json!({ "name": "Kara Voss", "age": 35 }),
    )
    .with_parent(profile.active_revision_id);
    let edit_id = edit.id;
    append_revision(&mut profile, edit);

    assert_eq!(profile.revisions.len(), 2);
    assert_eq!(profile.active_revision_id, edit_id);
    assert_eq!(profile.payload["age"], 35);
}

#[test]
fn revert_appends_a_copy_and_diff_against_target_is_empty() {
    let mut profile = seeded_profile();
    let first_id = profile.active_revision_id;
    append_revision(
        &mut profile,
        Revision::new(
            RevisionKind::Edit,
            "rename",
            json!({ "name": "Mara Voss", "age": 41 }),
        ),
    );

    let revert_id = revert(&mut profile, first_id).expect("revert should succeed");

    // History grows; nothing is removed or reordered.
    assert_eq!(profile.revisions.len(), 3);
    assert_eq!(profile.revisions[0].id, first_id);
    assert_eq!(profile.active_revision_id, revert_id);
    let reverted = profile.active_revision().expect("active revision exists");
    assert_eq!(reverted.kind, RevisionKind::Revert);
    assert_eq!(reverted.parent_id, Some(first_id));

    let target = profile.revision(first_id).expect("target still present");
    assert!(diff_paths(&profile.payload, &target.snapshot).is_empty());
}

#[test]
fn revert_to_unknown_revision_fails_without_mutating() {
    let mut profile = seeded_profile();
    let before_len = profile.revisions.len();
    let result = revert(&mut profile, Uuid::new_v4());
    assert!(result.is_err());
    assert_eq!(profile.revisions.len(), before_len);
}

#[test]
fn fork_never_mutates_the_source_profile() {
    let mut source = seeded_profile();
    append_revision(
        &mut source,
        Revision::new(
            RevisionKind::Edit,
            "rename",
            json!({ "name": "Mara Voss", "age": 41 }),
        ),
    );
    let source_len = source.revisions.len();
    let source_active = source.active_revision_id;
    let fork_from = source.revisions[0].id;

    let forked = fork(&source, fork_from).expect("fork should succeed");

    assert_eq!(source.revisions.len(), source_len);
    assert_eq!(source.active_revision_id, source_active);

    assert_ne!(forked.id, source.id);
    assert_eq!(forked.revisions.len(), source_len + 1);
    let tip = forked.active_revision().expect("fork tip exists");
    assert_eq!(tip.kind, RevisionKind::Fork);
    assert_eq!(tip.parent_id, Some(fork_from));
    assert_eq!(forked.payload["name"], "Kara Voss");
}

#[test]
fn audit_flattens_history_with_the_active_flag() {
    let mut profile = seeded_profile();
    append_revision(
        &mut profile,
        Revision::new(
            RevisionKind::Edit,
            "bump age",
            json!({ "name": "Kara Voss", "age": 35 }),
        ),
    );

    let entries = revision_audit(&profile);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, RevisionKind::Generate);
    assert!(!entries[0].active);
    assert!(entries[1].active);
    assert!(!entries[1].snapshot_hash.is_empty());
}
