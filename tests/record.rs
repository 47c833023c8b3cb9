//! Result log behaviour for the CSV-backed recorder

use hospital_calculus::prelude::*;
use std::sync::Arc;
use std::thread;

fn recorder(dir: &tempfile::TempDir) -> CsvRecorder {
    CsvRecorder::open(dir.path().join("simulations.csv")).unwrap()
}

#[test]
fn test_new_log_has_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let log = recorder(&dir);
    assert!(log.history().unwrap().is_empty());
    let contents = std::fs::read_to_string(log.path()).unwrap();
    assert_eq!(contents, "id,category,result,timestamp\n");
}

#[test]
fn test_existing_empty_file_gets_header() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let log = CsvRecorder::open(file.path()).unwrap();
    log.append("Patient flow", "178.15 patients in 8h", "2024-03-01 09:00:00").unwrap();
    log.append("Tank volume", "54.98 m3", "2024-03-01 09:01:00").unwrap();

    let history = log.history().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, 2);
    let contents = std::fs::read_to_string(file.path()).unwrap();
    assert!(contents.starts_with("id,category,result,timestamp\n"));
}

#[test]
fn test_append_and_history_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let log = recorder(&dir);
    log.append("Patient flow", "178.15 patients in 8h", "2024-03-01 09:00:00").unwrap();
    log.append("Ambulance route", "4.02 km", "2024-03-01 09:05:00").unwrap();
    log.append("Drug kinetics", "4.93 mg·h/L", "2024-03-01 09:10:00").unwrap();

    let history = log.history().unwrap();
    let ids: Vec<u64> = history.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(history[0].category, "Drug kinetics");
    assert_eq!(history[0].result, "4.93 mg·h/L");
    assert_eq!(history[2].timestamp, "2024-03-01 09:00:00");
}

#[test]
fn test_reopen_continues_numbering() {
    let dir = tempfile::tempdir().unwrap();
    {
        let log = recorder(&dir);
        log.append("Tank volume", "54.98 m3", "2024-03-01 10:00:00").unwrap();
        log.append("Tank volume", "60.00 m3", "2024-03-01 10:01:00").unwrap();
    }
    let log = recorder(&dir);
    let record = log.append("Tank volume", "61.00 m3", "2024-03-01 10:02:00").unwrap();
    assert_eq!(record.id, 3);
    assert_eq!(log.history().unwrap().len(), 3);
}

#[test]
fn test_clear_keeps_counting() {
    let dir = tempfile::tempdir().unwrap();
    let log = recorder(&dir);
    log.append("Patient flow", "10.00 patients in 2h", "2024-03-01 11:00:00").unwrap();
    log.clear().unwrap();
    assert!(log.history().unwrap().is_empty());
    let record = log.append("Patient flow", "12.00 patients in 2h", "2024-03-01 11:01:00").unwrap();
    assert_eq!(record.id, 2);
}

#[test]
fn test_fields_with_commas_survive() {
    let dir = tempfile::tempdir().unwrap();
    let log = recorder(&dir);
    log.append("Drug kinetics, custom", "1,234.50 mg·h/L", "2024-03-01 12:00:00").unwrap();
    let history = log.history().unwrap();
    assert_eq!(history[0].category, "Drug kinetics, custom");
    assert_eq!(history[0].result, "1,234.50 mg·h/L");
}

#[test]
fn test_concurrent_appends_get_unique_ids() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(recorder(&dir));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for j in 0..10 {
                    log.append("Patient flow", &format!("{i}-{j}"), "2024-03-01 13:00:00")
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut ids: Vec<u64> = log.history().unwrap().iter().map(|r| r.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=80).collect::<Vec<u64>>());
}

#[test]
fn test_record_evaluation_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let log = recorder(&dir);
    let result = evaluate_request(
        &EvaluationRequest::defaults(ModelKind::ArrivalRate),
        &EvaluationOptions::default(),
    )
    .unwrap();
    let record = record_evaluation(&log, &result).unwrap();
    assert_eq!(record.category, "Patient flow");
    assert_eq!(record.result, "178.15 patients in 8h");
    assert_eq!(log.history().unwrap()[0], record);
}
