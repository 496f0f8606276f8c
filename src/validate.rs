//! Submission validation and normalization.
//!
//! Turns a raw JSON payload into a [`FeedbackRecord`] ready for
//! persistence, or a validation error the caller renders as HTTP 400.

use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{FeedbackRecord, SchemaVariant};
use crate::rating::{canonical_rating, try_parse_rating};

/// Failures surfaced by the submit endpoint.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Client problem, rendered as HTTP 400 with the message verbatim.
    #[error("{0}")]
    Validation(String),
    /// Anything unexpected, rendered as HTTP 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// The submit request body. Every field is optional on the wire; `rating`
/// stays a raw [`Value`] because clients send both numbers and strings.
#[derive(Debug, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub feedback_for: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub rating: Value,
    #[serde(default)]
    pub date: Option<String>,
}

/// Validates a payload and builds the record to persist.
///
/// The returned record carries a placeholder id of 0; the store assigns
/// the real one on append.
pub fn validate_submission(
    payload: &Value,
    variant: SchemaVariant,
) -> Result<FeedbackRecord, SubmitError> {
    let empty = match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Err(SubmitError::Validation("No data provided".to_string()));
    }

    let submission: Submission = serde_json::from_value(payload.clone())
        .map_err(|e| SubmitError::Validation(format!("Malformed payload: {e}")))?;

    let rating = normalize_rating(&submission.rating, variant)?;
    let date = normalize_date(submission.date.as_deref(), variant)?;

    Ok(FeedbackRecord {
        id: 0,
        feedback_for: submission.feedback_for,
        school: submission.school,
        teacher: match variant {
            SchemaVariant::SchoolOnly => String::new(),
            SchemaVariant::SchoolTeacher => submission.teacher,
        },
        feedback: submission.feedback,
        rating,
        date,
    })
}

/// Canonicalizes the rating field into its stored textual form.
///
/// School-teacher rejects unparsable or out-of-range ratings. School-only
/// never rejects: star strings are stored verbatim and parse failures
/// soft-default to `"0"`.
fn normalize_rating(raw: &Value, variant: SchemaVariant) -> Result<String, SubmitError> {
    let raw = match raw {
        Value::Null => "0".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    match variant {
        SchemaVariant::SchoolOnly => {
            if raw.to_lowercase().contains("star") {
                return Ok(raw);
            }
            Ok(match raw.trim().parse::<f64>() {
                Ok(value) => canonical_rating(value),
                Err(_) => "0".to_string(),
            })
        }
        SchemaVariant::SchoolTeacher => {
            let value = try_parse_rating(&raw, variant)
                .ok_or_else(|| SubmitError::Validation("Invalid rating format".to_string()))?;
            if !(1.0..=5.0).contains(&value) {
                return Err(SubmitError::Validation(
                    "Rating must be between 1 and 5".to_string(),
                ));
            }
            Ok(canonical_rating(value))
        }
    }
}

/// Checks a provided date against the schema's literal format, or
/// substitutes today's date when the field is absent or empty.
fn normalize_date(given: Option<&str>, variant: SchemaVariant) -> Result<String, SubmitError> {
    match given {
        Some(date) if !date.is_empty() => {
            NaiveDate::parse_from_str(date, variant.date_format()).map_err(|_| {
                SubmitError::Validation(format!(
                    "Invalid date format. Use {}",
                    variant.date_format_hint()
                ))
            })?;
            Ok(date.to_string())
        }
        _ => Ok(Local::now().format(variant.date_format()).to_string()),
    }
}
