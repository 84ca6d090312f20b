//! Capped, append-only wellness history

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::calculator::Category;
use crate::error::PersistenceError;

/// Default number of records kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Number of most recent records the trend looks at
pub const TREND_WINDOW: usize = 5;

/// One completed analysis, as stored in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessRecord {
    pub timestamp: String,
    pub stress_score: u8,
    pub fatigue_score: u8,
    pub wellness_index: f64,
    pub category: Category,
}

/// Ordered record log with an append/read/trim contract
///
/// `append` always keeps the record in memory; an `Err` only means the
/// durable copy could not be updated.
pub trait HistoryStore: Send {
    fn records(&self) -> Vec<WellnessRecord>;

    fn append(&mut self, record: WellnessRecord) -> Result<(), PersistenceError>;

    fn capacity(&self) -> usize;
}

/// History held only in memory
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    records: VecDeque<WellnessRecord>,
    capacity: usize,
}

impl MemoryHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Seed with existing records, keeping only the newest `capacity`
    pub fn from_records(records: Vec<WellnessRecord>, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        for record in records {
            history.push(record);
        }
        history
    }

    fn push(&mut self, record: WellnessRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HistoryStore for MemoryHistory {
    fn records(&self) -> Vec<WellnessRecord> {
        self.records.iter().cloned().collect()
    }

    fn append(&mut self, record: WellnessRecord) -> Result<(), PersistenceError> {
        self.push(record);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

/// History persisted as a pretty-printed JSON array
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers never observe a partially written document.
#[derive(Debug)]
pub struct JsonFileHistory {
    path: PathBuf,
    memory: MemoryHistory,
}

impl JsonFileHistory {
    /// Load existing history; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let records = match Self::read(&path) {
            Ok(records) => {
                info!("Loaded {} history records from {}", records.len(), path.display());
                records
            }
            Err(e) => {
                warn!("{}; starting with empty history", e);
                Vec::new()
            }
        };

        Self {
            memory: MemoryHistory::from_records(records, capacity),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<Vec<WellnessRecord>, PersistenceError> {
        if !path.exists() {
            debug!("No history file at {}", path.display());
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| PersistenceError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn save(&self) -> Result<(), PersistenceError> {
        let write_err = |detail: String| PersistenceError::Write {
            path: self.path.display().to_string(),
            detail,
        };

        let json = serde_json::to_string_pretty(&self.memory.records())
            .map_err(|e| write_err(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| write_err(e.to_string()))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| write_err(e.to_string()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| write_err(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| write_err(e.error.to_string()))?;

        Ok(())
    }
}

impl HistoryStore for JsonFileHistory {
    fn records(&self) -> Vec<WellnessRecord> {
        self.memory.records()
    }

    fn append(&mut self, record: WellnessRecord) -> Result<(), PersistenceError> {
        self.memory.push(record);
        self.save()
    }

    fn capacity(&self) -> usize {
        self.memory.capacity
    }
}

/// Direction of the wellness index across the trend window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Summary of recent history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendReport {
    NotEnoughData { message: String },
    Summary {
        average_wellness: f64,
        trend: Trend,
        sessions_count: usize,
    },
}

impl TrendReport {
    /// Average index and direction over the last [`TREND_WINDOW`] records
    pub fn from_records(records: &[WellnessRecord]) -> Self {
        if records.is_empty() {
            return TrendReport::NotEnoughData {
                message: "Not enough data yet".to_string(),
            };
        }

        let window = &records[records.len().saturating_sub(TREND_WINDOW)..];
        let average = window.iter().map(|r| r.wellness_index).sum::<f64>() / window.len() as f64;

        let first = window[0].wellness_index;
        let last = window[window.len() - 1].wellness_index;
        let trend = if last > first {
            Trend::Up
        } else if last < first {
            Trend::Down
        } else {
            Trend::Flat
        };

        TrendReport::Summary {
            average_wellness: (average * 100.0).round_ties_even() / 100.0,
            trend,
            sessions_count: records.len(),
        }
    }
}
