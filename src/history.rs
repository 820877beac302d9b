//! Calculation history: where commits are stored and read back.
//!
//! The engine only emits [`CommitEvent`]s. Stores turn them into
//! [`HistoryEntry`] records with an id and a timestamp and list them
//! newest first.

use crate::engine::CommitEvent;
use crate::error::{CalcError, Result};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Column layout of the history CSV file.
const HEADER: [&str; 4] = ["id", "timestamp", "operation", "result"];

/// A stored calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier (v4 UUID).
    pub id: Uuid,

    /// When the calculation was committed.
    pub timestamp: DateTime<Utc>,

    /// Transcript of the expression, e.g. `"7 + 5"`.
    pub operation: String,

    /// Rendered result, e.g. `"12"`.
    pub result: String,
}

impl HistoryEntry {
    /// Stamps a commit with a fresh id and the current time.
    pub fn from_commit(commit: &CommitEvent) -> Self {
        HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            operation: commit.transcript.clone(),
            result: commit.result.clone(),
        }
    }
}

/// Receives finished calculations.
pub trait HistorySink {
    /// Stores a commit and returns the entry created for it.
    fn record(&mut self, commit: &CommitEvent) -> Result<HistoryEntry>;
}

/// Lists stored calculations.
pub trait HistorySource {
    /// All entries, newest first.
    fn recent(&self) -> Result<Vec<HistoryEntry>>;

    /// Deletes every entry.
    fn clear(&mut self) -> Result<()>;
}

/// Sorts entries stored in insertion order so the newest comes first.
///
/// Entries sharing a timestamp keep the later insertion first.
fn newest_first(mut entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    entries.reverse();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

/// History kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
}

impl MemoryHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistorySink for MemoryHistory {
    fn record(&mut self, commit: &CommitEvent) -> Result<HistoryEntry> {
        let entry = HistoryEntry::from_commit(commit);
        self.entries.push(entry.clone());
        Ok(entry)
    }
}

impl HistorySource for MemoryHistory {
    fn recent(&self) -> Result<Vec<HistoryEntry>> {
        Ok(newest_first(self.entries.clone()))
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// History persisted to an append-only CSV file.
///
/// The file is created on the first commit. An existing file must carry
/// the history header; rows are never appended to any other CSV. Rows that
/// cannot be read back are logged at warn level and skipped.
#[derive(Debug, Clone)]
pub struct CsvHistory {
    path: PathBuf,
}

impl CsvHistory {
    /// Uses the CSV file at `path`, which need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvHistory { path: path.into() }
    }

    /// Uses the CSV file at `path`, failing early if it exists but is not a
    /// history file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let history = Self::new(path);
        history.reader()?;
        Ok(history)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file positioned after a validated header.
    ///
    /// Returns `None` when the file is missing or empty.
    fn reader(&self) -> Result<Option<csv::Reader<BufReader<File>>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = reader.headers()?;
        if headers.is_empty() {
            return Ok(None);
        }
        if !headers.iter().eq(HEADER.iter().copied()) {
            return Err(CalcError::BadHistoryHeader {
                path: self.path.display().to_string(),
                found: headers.iter().collect::<Vec<_>>().join(","),
            });
        }

        Ok(Some(reader))
    }

    /// Reads all entries in file order.
    fn load(&self) -> Result<Vec<HistoryEntry>> {
        let Some(mut reader) = self.reader()? else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::new();
        for (row_idx, result) in reader.deserialize::<HistoryEntry>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Row {}: skipping unreadable history entry: {}", row_num, e),
            }
        }

        Ok(entries)
    }
}

impl HistorySink for CsvHistory {
    fn record(&mut self, commit: &CommitEvent) -> Result<HistoryEntry> {
        let needs_header = self.reader()?.is_none();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // serialize() writes the header from the struct fields when enabled
        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        let entry = HistoryEntry::from_commit(commit);
        writer.serialize(&entry)?;
        writer.flush()?;

        debug!(
            "Recorded {} = {} in {}",
            entry.operation,
            entry.result,
            self.path.display()
        );
        Ok(entry)
    }
}

impl HistorySource for CsvHistory {
    fn recent(&self) -> Result<Vec<HistoryEntry>> {
        Ok(newest_first(self.load()?))
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
