//! Append-only log of evaluation results
//!
//! Records get ids counting up from 1 that are never reused, not even after
//! [`ResultRecorder::clear`]. History is listed newest first.

mod csv_file;
mod memory;

pub use csv_file::CsvRecorder;
pub use memory::MemoryRecorder;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::EvaluationResult;

/// Format of [`Record::timestamp`]
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub category: String,
    pub result: String,
    pub timestamp: String,
}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Recorder lock poisoned")]
    Poisoned,
}

pub trait ResultRecorder: Send + Sync {
    /// Store a new record and return it with its assigned id
    fn append(&self, category: &str, result: &str, timestamp: &str) -> Result<Record, RecordError>;

    /// Every stored record, newest first
    fn history(&self) -> Result<Vec<Record>, RecordError>;

    /// Delete every record
    fn clear(&self) -> Result<(), RecordError>;
}

/// Current local time in [`TIMESTAMP_FORMAT`]
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Log `result` under its category with the current local time
pub fn record_evaluation(
    recorder: &dyn ResultRecorder,
    result: &EvaluationResult,
) -> Result<Record, RecordError> {
    let record = recorder.append(result.category(), &result.summary(), &timestamp_now())?;
    tracing::info!(
        id = record.id,
        category = %record.category,
        result = %record.result,
        "recorded evaluation"
    );
    Ok(record)
}
