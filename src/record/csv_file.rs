//! Result log persisted as a CSV file

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{Record, RecordError, ResultRecorder};

const HEADER: [&str; 4] = ["id", "category", "result", "timestamp"];

/// Recorder backed by a CSV file with an `id,category,result,timestamp` header
///
/// Opening an existing log continues numbering after its highest id. Ids are
/// only guaranteed not to repeat within one process after [`ResultRecorder::clear`].
#[derive(Debug)]
pub struct CsvRecorder {
    path: PathBuf,
    last_id: Mutex<u64>,
}

impl CsvRecorder {
    /// Open `path`, writing the header if the file is missing or empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref().to_path_buf();
        let has_content = match fs::metadata(&path) {
            Ok(meta) => meta.len() > 0,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => return Err(err.into()),
        };
        let last_id = if has_content {
            read_records(&path)?.iter().map(|r| r.id).max().unwrap_or(0)
        } else {
            write_header(&path)?;
            0
        };
        tracing::debug!(path = %path.display(), last_id, "opened result log");
        Ok(Self {
            path,
            last_id: Mutex::new(last_id),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_header(path: &Path) -> Result<(), RecordError> {
    let mut writer = csv::Writer::from_writer(File::create(path)?);
    writer.write_record(HEADER)?;
    writer.flush()?;
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<Record>, RecordError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize::<Record>() {
        records.push(record?);
    }
    Ok(records)
}

impl ResultRecorder for CsvRecorder {
    fn append(&self, category: &str, result: &str, timestamp: &str) -> Result<Record, RecordError> {
        let mut last_id = self.last_id.lock().map_err(|_| RecordError::Poisoned)?;
        let record = Record {
            id: *last_id + 1,
            category: category.to_string(),
            result: result.to_string(),
            timestamp: timestamp.to_string(),
        };

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(&record)?;
        writer.flush()?;

        *last_id = record.id;
        Ok(record)
    }

    fn history(&self) -> Result<Vec<Record>, RecordError> {
        let _guard = self.last_id.lock().map_err(|_| RecordError::Poisoned)?;
        let mut records = read_records(&self.path)?;
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }

    fn clear(&self) -> Result<(), RecordError> {
        let _guard = self.last_id.lock().map_err(|_| RecordError::Poisoned)?;
        write_header(&self.path)?;
        tracing::info!(path = %self.path.display(), "cleared result log");
        Ok(())
    }
}
