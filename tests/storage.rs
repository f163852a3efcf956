use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use studyplan_lib::models::{Confidence, ErrorRecord, ErrorType};
use studyplan_lib::{run_pipeline, Database, SettingsStore};

fn record(id: &str, topic: &str, day: i64) -> ErrorRecord {
    ErrorRecord {
        id: id.into(),
        timestamp: Utc.with_ymd_and_hms(2025, 2, 3, 7, 0, 0).unwrap() + Duration::days(day),
        description: "missed it".into(),
        system: "respiratory".into(),
        topic: topic.into(),
        error_type: ErrorType::Process,
        confidence: Confidence::VeryLow,
        cognitive_level: None,
        remediation: vec![],
        source: None,
    }
}

#[test]
fn test_records_and_plan_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("studyplan.sqlite3");
    let now = Utc.with_ymd_and_hms(2025, 2, 10, 7, 0, 0).unwrap();

    {
        let db = Database::new(db_path.clone()).unwrap();
        db.insert_error_record(&record("a", "V/Q mismatch", 0)).unwrap();
        db.insert_error_record(&record("b", "V/Q mismatch", 2)).unwrap();
        db.insert_error_record(&record("c", "Spirometry", 4)).unwrap();

        let settings = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        settings.update_exam_date(Some("2025-03-01".into())).unwrap();

        let errors = db.list_error_records().unwrap();
        let snapshot = settings.snapshot();
        let output = run_pipeline(
            &errors,
            snapshot.exam_date(),
            now,
            &snapshot,
            &mut StdRng::seed_from_u64(11),
        );
        db.save_study_plan(&output.plan).unwrap();
    }

    let db = Database::new(db_path).unwrap();
    let errors = db.list_error_records().unwrap();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0].id, "a");

    let plan = db.latest_study_plan().unwrap().unwrap();
    assert_eq!(plan.days_until_exam, Some(19));
    assert_eq!(plan.topic_count(), 2);
    assert_eq!(plan.blocks[0].topic, "V/Q mismatch");
}
