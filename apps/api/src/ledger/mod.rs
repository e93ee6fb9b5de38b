#![allow(dead_code)]

//! Sponsor ledger — the single persisted CSV file holding every accepted
//! submission as one row.
//!
//! The backing format has no native append, so every write is a full
//! read-modify-write cycle: parse the whole file, push the new record,
//! rewrite everything. `LedgerStore` is the only component that touches
//! the file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

/// Default on-disk location of the sponsor ledger.
pub const LEDGER_PATH: &str = "sponsor_data.csv";

/// One accepted sponsor submission, serialized under the canonical column
/// headers. All fields are opaque text; absent form fields are stored empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorRecord {
    #[serde(rename = "Company Name")]
    pub company_name: String,
    #[serde(rename = "Contact Name")]
    pub contact_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read ledger: {0}")]
    Read(#[source] anyhow::Error),

    #[error("failed to write ledger: {0}")]
    Write(#[source] anyhow::Error),
}

/// Owns the ledger file. Records are only ever appended; nothing updates or
/// deletes a stored row, and row order is append order.
///
/// The mutex serializes the read-modify-write cycle within this process so
/// concurrent submissions cannot lose each other's rows. Concurrent writers
/// in *other* processes remain unguarded; the deployment is single-process.
pub struct LedgerStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Appends one record after everything already stored.
    pub async fn append(&self, record: SponsorRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut records = read_records(&path)?;
            records.push(record);
            write_records(&path, &records)
        })
        .await
        .map_err(|e| StoreError::Write(anyhow::Error::new(e).context("ledger writer task failed")))?
    }

    /// Reads the full ordered record sequence; an absent file is empty.
    pub async fn read_all(&self) -> Result<Vec<SponsorRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_records(&path))
            .await
            .map_err(|e| {
                StoreError::Read(anyhow::Error::new(e).context("ledger reader task failed"))
            })?
    }
}

fn read_records(path: &Path) -> Result<Vec<SponsorRecord>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))
        .map_err(StoreError::Read)?;

    reader
        .deserialize()
        .collect::<Result<Vec<SponsorRecord>, _>>()
        .with_context(|| format!("parsing {}", path.display()))
        .map_err(StoreError::Read)
}

fn write_records(path: &Path, records: &[SponsorRecord]) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    // Serialize into a temp file in the same directory, then rename over the
    // target, so a torn write can never leave a half-written ledger behind.
    let tmp = tempfile::NamedTempFile::new_in(dir)
        .context("creating temp ledger file")
        .map_err(StoreError::Write)?;

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file());
        for record in records {
            writer
                .serialize(record)
                .context("serializing sponsor record")
                .map_err(StoreError::Write)?;
        }
        writer
            .flush()
            .context("flushing ledger")
            .map_err(StoreError::Write)?;
    }

    tmp.persist(path)
        .map_err(|e| StoreError::Write(anyhow::Error::new(e.error).context("renaming ledger")))?;
    Ok(())
}
