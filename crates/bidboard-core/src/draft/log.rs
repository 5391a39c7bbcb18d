// Append-only CSV record of completed picks.
//
// The header and column order are the on-disk contract that undo and resume
// read back, so they must not change.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DraftError, Result};

/// Column headers of the draft log, in order.
pub const LOG_HEADER: [&str; 7] = [
    "Name",
    "Position",
    "Team",
    "Pick",
    "Nominating Owner",
    "Buying Owner",
    "Price",
];

/// Nominator field value that older logs used for "no nominator".
pub const NO_OWNER: &str = "None";

/// One completed pick as written to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRecord {
    #[serde(rename = "Name")]
    pub player: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Pick")]
    pub pick: u32,
    #[serde(rename = "Nominating Owner", with = "optional_owner")]
    pub nominating_owner: Option<String>,
    #[serde(rename = "Buying Owner")]
    pub buying_owner: String,
    #[serde(rename = "Price")]
    pub price: u32,
}

/// Absent nominators are written as an empty field. Older logs wrote the
/// literal `None`, which reads back as absent too.
mod optional_owner {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() || raw == super::NO_OWNER {
            Ok(None)
        } else {
            Ok(Some(raw))
        }
    }
}

/// File-backed draft log.
#[derive(Debug)]
pub struct DraftLog {
    path: PathBuf,
}

impl DraftLog {
    /// Start a fresh log at `path`, replacing whatever was there.
    ///
    /// A previous log that still holds picks is copied aside first (see
    /// [`archive_path`]) so a restart never discards a draft.
    pub fn create(path: &Path) -> Result<Self> {
        let log = DraftLog {
            path: path.to_path_buf(),
        };
        let holds_picks = path.exists() && !matches!(log.records(), Ok(r) if r.is_empty());
        if holds_picks {
            let archive = archive_path(path);
            std::fs::copy(path, &archive).map_err(|source| log.io_error(source))?;
            info!(
                "Archived previous draft log {} to {}",
                path.display(),
                archive.display()
            );
        }
        log.rewrite(&[])?;
        info!("Started draft log at {}", path.display());
        Ok(log)
    }

    /// Open an existing log without truncating it. The header is checked.
    pub fn open(path: &Path) -> Result<Self> {
        let log = DraftLog {
            path: path.to_path_buf(),
        };
        let mut reader = log.reader()?;
        let headers = reader.headers().map_err(|source| log.csv_error(source))?;
        let found: Vec<&str> = headers.iter().map(str::trim).collect();
        if found != LOG_HEADER {
            return Err(DraftError::MalformedLog {
                path: log.path.clone(),
                message: format!("unexpected header {found:?}"),
            });
        }
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and flush it to disk before returning.
    pub fn append(&self, record: &PickRecord) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(record)
            .map_err(|source| self.csv_error(source))?;
        writer.flush().map_err(|source| self.io_error(source))?;
        let file = writer
            .into_inner()
            .map_err(|e| self.io_error(std::io::Error::other(e.to_string())))?;
        file.sync_data().map_err(|source| self.io_error(source))?;
        debug!("Logged pick {} ({})", record.pick, record.player);
        Ok(())
    }

    /// All records in the order they were appended.
    pub fn records(&self) -> Result<Vec<PickRecord>> {
        let mut reader = self.reader()?;
        let mut records = Vec::new();
        for (line, result) in reader.deserialize::<PickRecord>().enumerate() {
            let record = result.map_err(|e| DraftError::MalformedLog {
                path: self.path.clone(),
                message: format!("record {}: {e}", line + 1),
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// The most recently appended record, if any.
    pub fn last(&self) -> Result<Option<PickRecord>> {
        Ok(self.records()?.pop())
    }

    /// Remove and return the most recently appended record.
    pub fn truncate_last(&self) -> Result<PickRecord> {
        let mut records = self.records()?;
        let last = records.pop().ok_or(DraftError::EmptyLog)?;
        self.rewrite(&records)?;
        debug!("Removed pick {} ({}) from log", last.pick, last.player);
        Ok(last)
    }

    /// Replace the file contents with the header plus `records`, through a
    /// temporary sibling and a rename.
    fn rewrite(&self, records: &[PickRecord]) -> Result<()> {
        let tmp = self.path.with_extension("csv.tmp");
        let file = File::create(&tmp).map_err(|source| self.io_error(source))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(LOG_HEADER)
            .map_err(|source| self.csv_error(source))?;
        for record in records {
            writer
                .serialize(record)
                .map_err(|source| self.csv_error(source))?;
        }
        writer.flush().map_err(|source| self.io_error(source))?;
        let file = writer
            .into_inner()
            .map_err(|e| self.io_error(std::io::Error::other(e.to_string())))?;
        file.sync_all().map_err(|source| self.io_error(source))?;
        std::fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))?;
        Ok(())
    }

    fn reader(&self) -> Result<csv::Reader<File>> {
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        Ok(csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(file))
    }

    fn io_error(&self, source: std::io::Error) -> DraftError {
        DraftError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> DraftError {
        DraftError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

/// Where a replaced log is copied: `draft_results.csv` becomes
/// `draft_results.20260918_193005.csv`.
pub fn archive_path(path: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "draft_results".to_string());
    path.with_file_name(format!("{stem}.{stamp}.csv"))
}
