//! # Feedback Service Module
//!
//! Routes incoming HTTP requests under the `/feedback` path to the handler
//! logic in its sub-modules.
//!
//! ## Registered Routes:
//!
//! *   **`GET /feedback/read`**:
//!     - **Handler**: `read::process`
//!     - **Description**: Reads every stored record, aggregates them per
//!       entity (school or teacher), and returns a JSON object mapping
//!       entity name to average rating, feedback list, count, and rating
//!       total. An empty store yields `{}`.
//!
//! *   **`POST /feedback/submit`**:
//!     - **Handler**: `submit::process`
//!     - **Description**: Validates a JSON submission, assigns the next
//!       record id, appends the record to the CSV store, and returns the
//!       assigned id with status 201.

mod read;
mod submit;

use actix_web::Scope;
use actix_web::web::{get, post, scope};

/// The base path for all feedback-related endpoints.
const API_PATH: &str = "/feedback";

/// Configures and returns the Actix `Scope` for the feedback routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/read", get().to(read::process))
        .route("/submit", post().to(submit::process))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SchemaVariant;
    use crate::store::FeedbackStore;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    macro_rules! request_app {
        ($path:expr, $variant:expr) => {{
            let store = FeedbackStore::open($path, $variant).unwrap();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(store))
                    .service(configure_routes()),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_read_empty_store_returns_empty_object() {
        let path = temp_path("school_feedback_test_http_empty.csv");
        let _ = fs::remove_file(&path);

        let app = request_app!(&path, SchemaVariant::SchoolTeacher);
        let req = test::TestRequest::get().uri("/feedback/read").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({}));

        fs::remove_file(&path).unwrap();
    }

    #[actix_web::test]
    async fn test_submit_then_read_round_trip() {
        let path = temp_path("school_feedback_test_http_round_trip.csv");
        let _ = fs::remove_file(&path);

        let app = request_app!(&path, SchemaVariant::SchoolTeacher);

        let req = test::TestRequest::post()
            .uri("/feedback/submit")
            .set_json(json!({
                "feedback_for": "school",
                "school": "Hilltop",
                "feedback": "great campus",
                "rating": "4",
                "date": "2025-03-01",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["message"], "Feedback submitted successfully!");

        let req = test::TestRequest::get().uri("/feedback/read").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["Hilltop"]["rating"], "4.0/5");
        assert_eq!(body["Hilltop"]["count"], 1);

        fs::remove_file(&path).unwrap();
    }

    #[actix_web::test]
    async fn test_submit_assigns_sequential_ids() {
        let path = temp_path("school_feedback_test_http_ids.csv");
        let _ = fs::remove_file(&path);

        let app = request_app!(&path, SchemaVariant::SchoolTeacher);

        for expected in 1..=3 {
            let req = test::TestRequest::post()
                .uri("/feedback/submit")
                .set_json(json!({ "feedback_for": "school", "school": "Hilltop", "rating": 4 }))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["id"], expected);
        }

        fs::remove_file(&path).unwrap();
    }

    #[actix_web::test]
    async fn test_empty_payload_returns_400() {
        let path = temp_path("school_feedback_test_http_empty_payload.csv");
        let _ = fs::remove_file(&path);

        let app = request_app!(&path, SchemaVariant::SchoolTeacher);
        let req = test::TestRequest::post()
            .uri("/feedback/submit")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No data provided");

        fs::remove_file(&path).unwrap();
    }

    #[actix_web::test]
    async fn test_out_of_range_rating_returns_400() {
        let path = temp_path("school_feedback_test_http_range.csv");
        let _ = fs::remove_file(&path);

        let app = request_app!(&path, SchemaVariant::SchoolTeacher);
        let req = test::TestRequest::post()
            .uri("/feedback/submit")
            .set_json(json!({ "feedback_for": "school", "school": "Hilltop", "rating": "7" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Rating must be between 1 and 5");

        fs::remove_file(&path).unwrap();
    }

    #[actix_web::test]
    async fn test_school_only_accepts_out_of_range_rating() {
        let path = temp_path("school_feedback_test_http_school_only.csv");
        let _ = fs::remove_file(&path);

        let app = request_app!(&path, SchemaVariant::SchoolOnly);
        let req = test::TestRequest::post()
            .uri("/feedback/submit")
            .set_json(json!({
                "feedback_for": "school",
                "school": "Hilltop",
                "rating": "7",
                "date": "01/03/2025",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        fs::remove_file(&path).unwrap();
    }
}
