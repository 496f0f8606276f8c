use actix_web::{HttpResponse, Responder, web};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::store::FeedbackStore;
use crate::validate::{SubmitError, validate_submission};

/// HTTP handler: validates and persists one feedback submission.
///
/// - On success: `201 Created` with the assigned record id.
/// - On validation failure: `400` with the message verbatim.
/// - On anything unexpected: `500` with a generic error body.
pub async fn process(store: web::Data<FeedbackStore>, payload: web::Json<Value>) -> impl Responder {
    match submit_feedback(&store, &payload).await {
        Ok(id) => HttpResponse::Created().json(json!({
            "message": "Feedback submitted successfully!",
            "id": id,
        })),
        Err(SubmitError::Validation(message)) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        Err(SubmitError::Internal(e)) => {
            error!(error = %e, "Feedback submit failed");
            HttpResponse::InternalServerError()
                .json(json!({ "error": format!("Internal server error: {e}") }))
        }
    }
}

async fn submit_feedback(store: &FeedbackStore, payload: &Value) -> Result<u64, SubmitError> {
    let record = validate_submission(payload, store.variant())?;
    let id = store.append_new(record).await?;
    info!(id, "Feedback stored");
    Ok(id)
}
