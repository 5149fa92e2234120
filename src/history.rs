use crate::error::Result;
use crate::metrics::Score;
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io;

/// Most recent entries kept in the log.
pub const HISTORY_CAP: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub lesson_id: String,
    pub wpm: f64,
    pub accuracy: u32,
    /// Completion time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl HistoryEntry {
    pub fn new(lesson_id: impl Into<String>, score: Score, timestamp: i64) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            wpm: score.wpm,
            accuracy: score.accuracy,
            timestamp,
        }
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.timestamp).single()
    }
}

/// Append-only log of finished lessons, oldest evicted past [`HISTORY_CAP`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = HistoryEntry>) -> Self {
        let mut log = Self::new();
        for entry in entries {
            log.push(entry);
        }
        log
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > HISTORY_CAP {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest_for(&self, lesson_id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().rev().find(|e| e.lesson_id == lesson_id)
    }

    pub fn best_wpm(&self, lesson_id: &str) -> Option<f64> {
        self.entries
            .iter()
            .filter(|e| e.lesson_id == lesson_id)
            .map(|e| e.wpm)
            .reduce(f64::max)
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            csv.serialize(entry)?;
        }
        csv.flush()?;
        Ok(())
    }
}
