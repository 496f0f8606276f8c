//! Per-entity aggregation of feedback records.
//!
//! Groups records by a schema-derived entity key, accumulates rating sums
//! and counts, then renders averages and orders feedback lists. Results
//! are derived on every read and never cached.

use std::collections::{HashMap, HashSet};

use crate::model::{AggregatedEntity, FeedbackEntry, FeedbackRecord, SchemaVariant};
use crate::rating::parse_rating;

/// Aggregates the full record sequence into a map keyed by entity name.
///
/// Empty input yields an empty map. Skip rules, rating filtering, and
/// feedback-list ordering all follow the schema variant; see
/// [`SchemaVariant`] for the two rule sets.
pub fn aggregate_records(
    records: &[FeedbackRecord],
    variant: SchemaVariant,
) -> HashMap<String, AggregatedEntity> {
    let mut buckets: HashMap<String, Accumulator> = HashMap::new();

    for record in records {
        let Some(key) = entity_key(record, variant) else {
            continue;
        };

        let rating = parse_rating(&record.rating, variant);
        // School-teacher drops out-of-range records entirely; school-only
        // lets a soft-parsed 0.0 drag the average down instead.
        if variant == SchemaVariant::SchoolTeacher && !(1.0..=5.0).contains(&rating) {
            continue;
        }

        let bucket = buckets.entry(key).or_default();
        if keeps_feedback(record, variant) {
            bucket.feedbacks.push(FeedbackEntry {
                feedback: record.feedback.clone(),
                date: record.date.clone(),
            });
        }
        bucket.total_rating += rating;
        bucket.count += 1;
    }

    buckets
        .into_iter()
        .map(|(key, bucket)| (key, bucket.finish(variant)))
        .collect()
}

/// Derives the aggregation bucket for a record, or `None` to skip it.
fn entity_key(record: &FeedbackRecord, variant: SchemaVariant) -> Option<String> {
    match variant {
        SchemaVariant::SchoolOnly => {
            let name = record.school.trim();
            if name.is_empty() {
                return None;
            }
            let lowered = name.to_lowercase();
            if lowered == "none" || lowered == "null" {
                return None;
            }
            Some(name.to_string())
        }
        SchemaVariant::SchoolTeacher => {
            let school = record.school.trim();
            match record.feedback_for.trim().to_lowercase().as_str() {
                "school" => Some(school.to_string()),
                "teacher" => {
                    let teacher = record.teacher.trim();
                    if teacher.is_empty() {
                        None
                    } else {
                        Some(format!("{teacher} ({school})"))
                    }
                }
                _ => None,
            }
        }
    }
}

fn keeps_feedback(record: &FeedbackRecord, variant: SchemaVariant) -> bool {
    match variant {
        // Pandas round-trips empty cells as the literal "nan".
        SchemaVariant::SchoolOnly => !record.feedback.is_empty() && record.feedback != "nan",
        SchemaVariant::SchoolTeacher => true,
    }
}

#[derive(Default)]
struct Accumulator {
    feedbacks: Vec<FeedbackEntry>,
    count: u64,
    total_rating: f64,
}

impl Accumulator {
    // A bucket only exists once count >= 1, so the division is safe.
    fn finish(mut self, variant: SchemaVariant) -> AggregatedEntity {
        if variant == SchemaVariant::SchoolTeacher {
            // Newest first; an absent date sorts last.
            self.feedbacks.sort_by(|a, b| date_key(b).cmp(date_key(a)));

            let mut seen = HashSet::new();
            self.feedbacks
                .retain(|fb| seen.insert((fb.feedback.clone(), fb.date.clone())));
        }

        let average = (self.total_rating / self.count as f64 * 10.0).round() / 10.0;

        AggregatedEntity {
            rating: format!("{average:.1}/5"),
            feedbacks: self.feedbacks,
            count: self.count,
            total_rating: self.total_rating,
        }
    }
}

fn date_key(entry: &FeedbackEntry) -> &str {
    if entry.date.is_empty() {
        "0"
    } else {
        &entry.date
    }
}
