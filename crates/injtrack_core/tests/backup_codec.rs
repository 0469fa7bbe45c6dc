use chrono::NaiveDate;
use injtrack_core::service::backup::{read_backup_file, write_backup_file, REQUIRED_KEYS};
use injtrack_core::{
    default_site_labels, export_document, import_document, BackupError, Gender, InjectionSite,
    MemoryKvStore, NewInjection, NewMeasurement, NewSideEffect, NewWeightEntry, RecordKind,
    RepoError, TrackerConfig, TrackerData, TrackerRepository, UserProfile, WeightEntry,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn populated(store: &MemoryKvStore) -> TrackerRepository<&MemoryKvStore> {
    let mut repo = TrackerRepository::open(store, &TrackerConfig::default()).unwrap();
    repo.add_injection(NewInjection {
        date: day(2024, 1, 1),
        dose: 0.25,
        site: InjectionSite::AbdomenRight,
        comment: Some("first dose".to_string()),
    })
    .unwrap();
    repo.add_injection(NewInjection {
        date: day(2024, 1, 8),
        dose: 0.5,
        site: InjectionSite::ArmLeft,
        comment: None,
    })
    .unwrap();
    repo.add_weight(NewWeightEntry {
        date: day(2024, 1, 2),
        weight: 97.3,
    })
    .unwrap();
    repo.add_side_effect(NewSideEffect {
        date: day(2024, 1, 3),
        description: "mild nausea".to_string(),
    })
    .unwrap();
    repo.add_measurement(NewMeasurement {
        date: day(2024, 1, 4),
        neck: Some(41.5),
        hips: Some(112.0),
        ..NewMeasurement::default()
    })
    .unwrap();
    repo.set_profile(UserProfile {
        name: "Ira".to_string(),
        gender: Gender::Female,
        age: Some(38.0),
        height: Some(168.0),
        start_weight: Some(98.0),
        goal_weight: Some(75.0),
        medication: "semaglutide".to_string(),
        daily_calories: Some(1850),
        rotation_sites: vec![InjectionSite::ArmLeft, InjectionSite::AbdomenRight],
    })
    .unwrap();
    repo
}

fn minimal_document() -> Value {
    json!({
        "injections": [],
        "weights": [],
        "sideEffects": [],
        "measurements": [],
        "profile": {},
        "injectionSites": default_site_labels(),
    })
}

#[test]
fn export_then_import_reproduces_the_aggregate() {
    let store = MemoryKvStore::new();
    let repo = populated(&store);

    let document = repo.export_document().unwrap();
    let restored = import_document(&document).unwrap();

    assert_eq!(restored, *repo.data());
}

#[test]
fn export_is_indented_and_uses_stable_field_names() {
    let store = MemoryKvStore::new();
    let repo = populated(&store);

    let document = export_document(repo.data()).unwrap();
    assert!(document.contains("\n  \"injections\": ["));

    let value: Value = serde_json::from_str(&document).unwrap();
    for key in REQUIRED_KEYS {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["injections"][0]["site"], "abdomen_right");
    assert_eq!(value["injections"][0]["date"], "2024-01-01");
    assert_eq!(value["profile"]["startWeight"], 98.0);
    assert_eq!(value["injectionSites"]["arm_left"], "Рука слева");
}

#[test]
fn each_missing_required_key_is_a_format_error() {
    for key in REQUIRED_KEYS {
        let mut document = minimal_document();
        document.as_object_mut().unwrap().remove(key);

        let err = import_document(&document.to_string()).unwrap_err();
        assert!(
            matches!(err, BackupError::MissingKey(missing) if missing == key),
            "unexpected error for {key}: {err}"
        );
        assert!(err.is_format_error());
    }
}

#[test]
fn import_missing_profile_leaves_repository_untouched() {
    let store = MemoryKvStore::new();
    let mut repo = populated(&store);
    let before = repo.snapshot();
    let writes = store.write_count();

    let mut document = minimal_document();
    document.as_object_mut().unwrap().remove("profile");
    let err = repo.import_document(&document.to_string()).unwrap_err();

    assert!(matches!(err, RepoError::Backup(BackupError::MissingKey("profile"))));
    assert!(Arc::ptr_eq(&repo.snapshot(), &before));
    assert_eq!(store.write_count(), writes);
}

#[test]
fn unparseable_and_non_object_documents_are_rejected() {
    assert!(matches!(
        import_document("{ not json").unwrap_err(),
        BackupError::Parse(_)
    ));
    assert!(matches!(
        import_document("[1, 2, 3]").unwrap_err(),
        BackupError::NotAnObject
    ));
}

#[test]
fn invalid_record_shape_fails_the_whole_import() {
    let mut document = minimal_document();
    document["weights"] = json!([{ "id": "w1", "date": "2024-01-01", "weight": 90 }]);
    document["injections"] = json!([
        { "id": "i1", "date": "2024-01-01", "dose": 0.5, "site": "leg_left" }
    ]);

    let err = import_document(&document.to_string()).unwrap_err();
    assert!(matches!(err, BackupError::InvalidSection { key: "injections", .. }));
}

#[test]
fn duplicate_ids_within_a_collection_are_rejected() {
    let mut document = minimal_document();
    document["sideEffects"] = json!([
        { "id": "dup", "date": "2024-01-01", "description": "a" },
        { "id": "dup", "date": "2024-01-02", "description": "b" }
    ]);

    let err = import_document(&document.to_string()).unwrap_err();
    match err {
        BackupError::DuplicateId { kind, id } => {
            assert_eq!(kind, RecordKind::SideEffect);
            assert_eq!(id, "dup");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn legacy_profile_is_merged_over_defaults() {
    let mut document = minimal_document();
    document["profile"] = json!({
        "name": "Max",
        "gender": "male",
        "age": "",
        "height": 181,
        "unknownFutureField": true
    });

    let data = import_document(&document.to_string()).unwrap();
    assert_eq!(data.profile.name, "Max");
    assert_eq!(data.profile.gender, Gender::Male);
    assert_eq!(data.profile.age, None);
    assert_eq!(data.profile.height, Some(181.0));
    assert_eq!(data.profile.daily_calories, None);
    assert_eq!(data.profile.rotation_sites, InjectionSite::ALL.to_vec());
}

#[test]
fn null_profile_fields_fall_back_to_defaults() {
    let mut document = minimal_document();
    document["profile"] = json!({
        "name": "A",
        "medication": null,
        "rotationSites": null
    });

    let data = import_document(&document.to_string()).unwrap();
    assert_eq!(data.profile.name, "A");
    assert_eq!(data.profile.medication, "");
    assert_eq!(data.profile.rotation_sites, InjectionSite::ALL.to_vec());
}

#[test]
fn export_refuses_non_finite_numbers() {
    let data = TrackerData {
        weights: vec![WeightEntry {
            id: "w1".to_string(),
            date: day(2024, 2, 1),
            weight: f64::NAN,
        }],
        ..TrackerData::default()
    };

    let err = export_document(&data).unwrap_err();
    assert!(matches!(err, BackupError::Encode(_)), "{err}");
    assert!(!err.is_format_error());
}

#[test]
fn site_labels_restored_verbatim_or_regenerated_when_null() {
    let mut document = minimal_document();
    document["injectionSites"] = json!({ "abdomen_left": "Belly left", "arm_left": "Left arm" });
    let data = import_document(&document.to_string()).unwrap();
    assert_eq!(data.injection_sites.len(), 2);
    assert_eq!(data.injection_sites["abdomen_left"], "Belly left");

    document["injectionSites"] = Value::Null;
    let data = import_document(&document.to_string()).unwrap();
    assert_eq!(data.injection_sites, default_site_labels());
}

#[test]
fn successful_import_replaces_aggregate_and_persists() {
    let source_store = MemoryKvStore::new();
    let document = populated(&source_store).export_document().unwrap();

    let target_store = MemoryKvStore::new();
    let mut target = TrackerRepository::open(&target_store, &TrackerConfig::default()).unwrap();
    let before = target.snapshot();
    let imported = target.import_document(&document).unwrap();

    assert!(!Arc::ptr_eq(&imported, &before));
    assert_eq!(imported.injections.len(), 2);
    assert_eq!(target_store.write_count(), 1);

    let reopened = TrackerRepository::open(&target_store, &TrackerConfig::default()).unwrap();
    assert_eq!(*reopened.snapshot(), *imported);
}

#[test]
fn backup_file_round_trip_uses_dated_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrackerConfig::default();
    let store = MemoryKvStore::new();
    let repo = populated(&store);

    let path = write_backup_file(dir.path(), &config, repo.data(), day(2024, 6, 30)).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "injection-tracker-backup-2024-06-30.json"
    );

    let text = read_backup_file(&path).unwrap();
    let restored: TrackerData = import_document(&text).unwrap();
    assert_eq!(restored, *repo.data());
}

#[test]
fn reading_missing_backup_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_backup_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, BackupError::Io(_)));
    assert!(!err.is_format_error());
}
