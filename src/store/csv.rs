//! Spreadsheet-style ledger kept in a CSV file with the sheet's header row.

use super::{LedgerStore, StoreError};
use crate::domain::{TransactionRow, LEDGER_HEADER};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug)]
pub struct CsvLedgerStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialize rows to CSV bytes, optionally preceded by the header row.
pub fn encode_rows(rows: &[TransactionRow], with_header: bool) -> Result<Vec<u8>, StoreError> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    if with_header {
        writer.write_record(LEDGER_HEADER)?;
    }
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))
}

fn read_file(path: &Path) -> Result<Vec<TransactionRow>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if line == 0 && record.get(0).map(str::trim) == Some(LEDGER_HEADER[0]) {
            continue;
        }
        let cells: Vec<&str> = record.iter().collect();
        match TransactionRow::from_record(&cells) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    line = line + 1,
                    error = %e,
                    "Skipping unreadable ledger row"
                );
            }
        }
    }
    Ok(rows)
}

fn append_file(path: &Path, rows: &[TransactionRow]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;
    let bytes = encode_rows(rows, needs_header)?;

    // One write per batch so a failure cannot leave half a submission behind.
    file.write_all(&bytes)?;
    file.sync_data()?;
    Ok(())
}

#[async_trait]
impl LedgerStore for CsvLedgerStore {
    async fn read_all(&self) -> Result<Vec<TransactionRow>, StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_file(&path))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }

    async fn append(&self, row: &TransactionRow) -> Result<(), StoreError> {
        self.append_batch(std::slice::from_ref(row)).await
    }

    async fn append_batch(&self, rows: &[TransactionRow]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        let rows = rows.to_vec();
        tokio::task::spawn_blocking(move || append_file(&path, &rows))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}
