// Per-symbol bar history persisted as one CSV file.
use crate::data::atomic_file::{remove_stale_temp_files, replace_atomically};
use crate::data::csv_parser::HistoryCsv;
use crate::error::EngineError;
use shared::models::Bar;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

/// Stores the full history of each symbol at `{data_dir}/{SYMBOL}.csv`.
///
/// Every write is a read-modify-write of the whole file followed by an atomic
/// replace, so readers see either the previous history or the new one. Writes
/// to the same symbol from several tasks must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    data_dir: PathBuf,
}

impl HistoryStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        HistoryStore { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Removes temp files left by writes that were interrupted by a crash.
    /// Run once at startup, before any writer is active.
    pub fn clean_up_interrupted_writes(&self) -> Result<usize, EngineError> {
        let removed = remove_stale_temp_files(&self.data_dir)?;
        if removed > 0 {
            tracing::warn!(removed, data_dir = %self.data_dir.display(), "Removed leftover temp files");
        }
        Ok(removed)
    }

    /// Path of the history file for a symbol. The symbol must already be validated.
    pub fn history_path(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }

    /// Full stored history, newest first, or `None` when nothing usable is stored.
    ///
    /// A missing file is the normal "no data yet" case. Any other failure is
    /// logged and also reported as `None`.
    pub fn read(&self, symbol: &str) -> Option<Vec<Bar>> {
        match self.try_read(symbol) {
            Ok(bars) => bars,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Failed to read cached history, treating as no data");
                None
            }
        }
    }

    fn try_read(&self, symbol: &str) -> Result<Option<Vec<Bar>>, EngineError> {
        let path = self.history_path(symbol);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(EngineError::StorageReadError(format!("Failed to open '{}': {}", path.display(), e)))
            }
        };
        let mut bars = HistoryCsv::read_bars(BufReader::new(file))?;
        sort_descending(&mut bars);
        Ok(Some(bars))
    }

    /// Merges `new_bars` into the stored history and atomically persists it.
    ///
    /// Later rows win on a date conflict: a new bar replaces the stored one,
    /// and within `new_bars` the last bar for a date wins. Returns the number
    /// of rows in the persisted history. On error the previous file is intact.
    pub fn merge_and_persist(&self, symbol: &str, new_bars: Vec<Bar>) -> Result<usize, EngineError> {
        let result = self.try_merge_and_persist(symbol, new_bars);
        let path = self.history_path(symbol);
        match &result {
            Ok(rows) => tracing::info!(symbol = %symbol, rows = *rows, path = %path.display(), "Saved history"),
            Err(e) => tracing::error!(symbol = %symbol, error = %e, "Failed to save history"),
        }
        result
    }

    fn try_merge_and_persist(&self, symbol: &str, new_bars: Vec<Bar>) -> Result<usize, EngineError> {
        let existing = match self.try_read(symbol) {
            Ok(bars) => bars.unwrap_or_default(),
            // An unreadable file must not be silently replaced by the new batch alone.
            Err(e) => return Err(EngineError::StorageWriteError(format!("Existing history is unreadable: {}", e))),
        };

        let merged = merge_bars(existing, new_bars);
        if merged.is_empty() {
            return Ok(0);
        }

        fs::create_dir_all(&self.data_dir).map_err(|e| {
            EngineError::StorageWriteError(format!("Failed to create data dir '{}': {}", self.data_dir.display(), e))
        })?;
        replace_atomically(&self.history_path(symbol), |writer| HistoryCsv::write_bars(writer, &merged))?;
        Ok(merged.len())
    }
}

/// Concatenates `existing` and `new_bars`, keeps the last bar seen for each
/// date, and sorts newest first.
pub fn merge_bars(existing: Vec<Bar>, new_bars: Vec<Bar>) -> Vec<Bar> {
    let mut by_date: HashMap<_, Bar> = HashMap::with_capacity(existing.len() + new_bars.len());
    for bar in existing.into_iter().chain(new_bars) {
        by_date.insert(bar.date, bar);
    }
    let mut merged: Vec<Bar> = by_date.into_values().collect();
    sort_descending(&mut merged);
    merged
}

fn sort_descending(bars: &mut [Bar]) {
    bars.sort_by(|a, b| b.date.cmp(&a.date));
}
