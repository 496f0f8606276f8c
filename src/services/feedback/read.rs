use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, error};

use crate::aggregate::aggregate_records;
use crate::model::AggregatedEntity;
use crate::store::FeedbackStore;

/// HTTP handler: aggregates all stored feedback per entity.
///
/// - On success: `200 OK` with the entity map as JSON (`{}` when empty).
/// - On failure: `500` with a generic error body.
pub async fn process(store: web::Data<FeedbackStore>) -> impl Responder {
    match read_feedback(&store) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            error!(error = %e, "Feedback read failed");
            HttpResponse::InternalServerError()
                .json(json!({ "error": format!("Internal server error: {e}") }))
        }
    }
}

fn read_feedback(store: &FeedbackStore) -> anyhow::Result<HashMap<String, AggregatedEntity>> {
    let records = store.read_all()?;
    debug!(records = records.len(), "Aggregating feedback");
    Ok(aggregate_records(&records, store.variant()))
}
