//! CSV persistence for feedback records.
//!
//! One flat file per deployment, header row written on first use,
//! append-only. Reads are full scans; rows are parsed by header name with
//! missing cells defaulting to empty strings.

use anyhow::Result;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::model::{FeedbackRecord, SchemaVariant};

/// Handle to the record file, constructed once at startup.
pub struct FeedbackStore {
    path: PathBuf,
    variant: SchemaVariant,
    // Serializes the read-ids-then-append sequence in `append_new`.
    write_lock: Mutex<()>,
}

impl FeedbackStore {
    /// Opens the store, creating the file with its header row if absent.
    pub fn open(path: impl Into<PathBuf>, variant: SchemaVariant) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            debug!(path = %path.display(), "Creating record file with header");
            let mut writer = WriterBuilder::new().from_path(&path)?;
            writer.write_record(variant.columns())?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            variant,
            write_lock: Mutex::new(()),
        })
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// Reads every persisted record in insertion order.
    ///
    /// A missing file yields an empty vec, not an error. Cells are looked
    /// up by header name so rows written under an older schema still read,
    /// with absent fields normalized to `""`.
    pub fn read_all(&self) -> Result<Vec<FeedbackRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new().flexible(true).from_path(&self.path)?;
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(record_from_row(&headers, &row));
        }

        debug!(count = records.len(), "Records read");
        Ok(records)
    }

    /// Appends one record as a CSV row.
    ///
    /// Writes the header first if the file is empty, and never touches
    /// prior rows.
    pub fn append(&self, record: &FeedbackRecord) -> Result<()> {
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        debug!(path = %self.path.display(), needs_header, "Appending CSV record");

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(false) // IMPORTANT when appending
            .from_writer(file);

        if needs_header {
            writer.write_record(self.variant.columns())?;
        }
        writer.write_record(row_for(record, self.variant))?;
        writer.flush()?;

        Ok(())
    }

    /// Next id to assign: `1 + max(existing ids)`, so the first record
    /// gets id 1. Ids are never reused.
    pub fn next_id(records: &[FeedbackRecord]) -> u64 {
        records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    /// Assigns the next id and appends, holding a lock across the
    /// read-then-append sequence so concurrent submissions cannot claim
    /// the same id.
    pub async fn append_new(&self, mut record: FeedbackRecord) -> Result<u64> {
        let _guard = self.write_lock.lock().await;

        let existing = self.read_all()?;
        record.id = Self::next_id(&existing);
        self.append(&record)?;

        Ok(record.id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn row_for(record: &FeedbackRecord, variant: SchemaVariant) -> Vec<String> {
    let mut row = vec![
        record.id.to_string(),
        record.feedback_for.clone(),
        record.school.clone(),
    ];
    if variant == SchemaVariant::SchoolTeacher {
        row.push(record.teacher.clone());
    }
    row.extend([
        record.feedback.clone(),
        record.rating.clone(),
        record.date.clone(),
    ]);
    row
}

fn record_from_row(headers: &StringRecord, row: &StringRecord) -> FeedbackRecord {
    let field = |name: &str| -> String {
        headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| row.get(i))
            .unwrap_or("")
            .to_string()
    };

    FeedbackRecord {
        id: field("id").trim().parse().unwrap_or(0),
        feedback_for: field("feedback_for"),
        school: field("school"),
        teacher: field("teacher"),
        feedback: field("feedback"),
        rating: field("rating"),
        date: field("date"),
    }
}
