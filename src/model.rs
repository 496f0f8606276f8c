//! Data types used by the feedback pipeline.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Record schema and validation rules for one service deployment.
///
/// The two deployments share the same endpoints but differ in the CSV
/// columns they persist, the date format they accept, and how strictly
/// they treat ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaVariant {
    /// Feedback is keyed by school only; ratings are unconstrained.
    SchoolOnly,
    /// Feedback targets a school or a teacher; ratings must lie in [1,5].
    SchoolTeacher,
}

impl SchemaVariant {
    /// CSV header columns, in persisted order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            SchemaVariant::SchoolOnly => {
                &["id", "feedback_for", "school", "feedback", "rating", "date"]
            }
            SchemaVariant::SchoolTeacher => &[
                "id",
                "feedback_for",
                "school",
                "teacher",
                "feedback",
                "rating",
                "date",
            ],
        }
    }

    /// `chrono` format string for dates in this schema.
    pub fn date_format(self) -> &'static str {
        match self {
            SchemaVariant::SchoolOnly => "%d/%m/%Y",
            SchemaVariant::SchoolTeacher => "%Y-%m-%d",
        }
    }

    /// Human-readable date format, used in validation error messages.
    pub fn date_format_hint(self) -> &'static str {
        match self {
            SchemaVariant::SchoolOnly => "DD/MM/YYYY",
            SchemaVariant::SchoolTeacher => "YYYY-MM-DD",
        }
    }
}

/// A single persisted feedback row.
///
/// `rating` keeps the raw textual form the client sent (e.g. `"4.0"` or
/// `"4 star"`); parsing happens on read. `teacher` is always empty in the
/// school-only schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: u64,
    pub feedback_for: String,
    pub school: String,
    pub teacher: String,
    pub feedback: String,
    pub rating: String,
    pub date: String,
}

/// One feedback comment attached to an aggregated entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub feedback: String,
    pub date: String,
}

/// Per-entity aggregation result, recomputed from scratch on every read.
#[derive(Debug, Serialize)]
pub struct AggregatedEntity {
    /// Average rating rendered as `"X.X/5"`.
    pub rating: String,
    pub feedbacks: Vec<FeedbackEntry>,
    pub count: u64,
    pub total_rating: f64,
}
