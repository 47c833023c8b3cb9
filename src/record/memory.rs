use std::sync::Mutex;

use super::{Record, RecordError, ResultRecorder};

#[derive(Debug, Default)]
struct Log {
    last_id: u64,
    records: Vec<Record>,
}

/// In-process recorder; contents are lost when it is dropped
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    log: Mutex<Log>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultRecorder for MemoryRecorder {
    fn append(&self, category: &str, result: &str, timestamp: &str) -> Result<Record, RecordError> {
        let mut log = self.log.lock().map_err(|_| RecordError::Poisoned)?;
        log.last_id += 1;
        let record = Record {
            id: log.last_id,
            category: category.to_string(),
            result: result.to_string(),
            timestamp: timestamp.to_string(),
        };
        log.records.push(record.clone());
        Ok(record)
    }

    fn history(&self) -> Result<Vec<Record>, RecordError> {
        let log = self.log.lock().map_err(|_| RecordError::Poisoned)?;
        Ok(log.records.iter().rev().cloned().collect())
    }

    fn clear(&self) -> Result<(), RecordError> {
        let mut log = self.log.lock().map_err(|_| RecordError::Poisoned)?;
        log.records.clear();
        Ok(())
    }
}
