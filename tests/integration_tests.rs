use school_feedback::aggregate::aggregate_records;
use school_feedback::model::SchemaVariant;
use school_feedback::store::FeedbackStore;
use school_feedback::validate::validate_submission;
use serde_json::json;
use std::env;
use std::fs;

fn temp_path(name: &str) -> String {
    format!("{}/{}", env::temp_dir().display(), name)
}

#[tokio::test]
async fn test_full_pipeline() {
    let path = temp_path("school_feedback_test_pipeline.csv");
    let _ = fs::remove_file(&path);

    let store = FeedbackStore::open(&path, SchemaVariant::SchoolTeacher).unwrap();

    let submissions = [
        json!({
            "feedback_for": "school",
            "school": "Hilltop",
            "feedback": "great campus",
            "rating": "4",
            "date": "2025-03-01",
        }),
        json!({
            "feedback_for": "school",
            "school": "Hilltop",
            "feedback": "supportive staff",
            "rating": "5 star",
            "date": "2025-03-05",
        }),
        json!({
            "feedback_for": "teacher",
            "school": "Hilltop",
            "teacher": "Ms. Reyes",
            "feedback": "clear lectures",
            "rating": 4,
            "date": "2025-03-02",
        }),
    ];

    for (i, payload) in submissions.iter().enumerate() {
        let record = validate_submission(payload, store.variant()).unwrap();
        let id = store.append_new(record).await.unwrap();
        assert_eq!(id, i as u64 + 1);
    }

    let records = store.read_all().unwrap();
    assert_eq!(records.len(), 3);

    let result = aggregate_records(&records, SchemaVariant::SchoolTeacher);
    assert_eq!(result.len(), 2);

    let school = &result["Hilltop"];
    assert_eq!(school.rating, "4.5/5");
    assert_eq!(school.count, 2);
    // Newest first.
    assert_eq!(school.feedbacks[0].feedback, "supportive staff");
    assert_eq!(school.feedbacks[1].feedback, "great campus");

    let teacher = &result["Ms. Reyes (Hilltop)"];
    assert_eq!(teacher.rating, "4.0/5");
    assert_eq!(teacher.count, 1);

    fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_pipeline_survives_restart() {
    let path = temp_path("school_feedback_test_restart.csv");
    let _ = fs::remove_file(&path);

    {
        let store = FeedbackStore::open(&path, SchemaVariant::SchoolTeacher).unwrap();
        let payload = json!({
            "feedback_for": "school",
            "school": "Hilltop",
            "rating": "3",
            "date": "2025-03-01",
        });
        let record = validate_submission(&payload, store.variant()).unwrap();
        store.append_new(record).await.unwrap();
    }

    // Re-opening the same file keeps prior records and continues the ids.
    let store = FeedbackStore::open(&path, SchemaVariant::SchoolTeacher).unwrap();
    let payload = json!({
        "feedback_for": "school",
        "school": "Hilltop",
        "rating": "5",
        "date": "2025-03-02",
    });
    let record = validate_submission(&payload, store.variant()).unwrap();
    let id = store.append_new(record).await.unwrap();
    assert_eq!(id, 2);

    let result = aggregate_records(&store.read_all().unwrap(), SchemaVariant::SchoolTeacher);
    assert_eq!(result["Hilltop"].rating, "4.0/5");
    assert_eq!(result["Hilltop"].total_rating, 8.0);

    fs::remove_file(&path).unwrap();
}
