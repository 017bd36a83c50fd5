//! Storage layer for toolbelt
//!
//! All utilities keep their state as small flat files in one data directory.
//!
//! # Directory Structure
//!
//! ```text
//! <data dir>/
//!   toolbelt.toml              # Optional configuration
//!   tasks.json                 # To-do list (JSON array)
//!   contacts.json              # Contact book (JSON array)
//!   rps_statistics.json        # Rounds, session scores, capped history
//!   rps_high_score.txt         # Bare integer
//!   password_history.jsonl     # One generated password per line
//! ```
//!
//! A missing file is the empty initial state, never an error. Whole-file
//! rewrites go through [`lock::write_atomic`] under a [`FileLock`].

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TOOLBELT_DATA_DIR";

/// Fallback directory when the platform has no data dir
pub const FALLBACK_DIR: &str = ".toolbelt";

pub const CONFIG_FILE: &str = "toolbelt.toml";
pub const TASKS_FILE: &str = "tasks.json";
pub const CONTACTS_FILE: &str = "contacts.json";
pub const RPS_STATS_FILE: &str = "rps_statistics.json";
pub const RPS_HIGH_SCORE_FILE: &str = "rps_high_score.txt";
pub const PASSWORD_HISTORY_FILE: &str = "password_history.jsonl";

/// Storage manager for toolbelt state
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve the data directory: explicit path, then the platform data
    /// directory, then `./.toolbelt`.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        let data_dir = explicit.unwrap_or_else(default_data_dir);
        tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");
        Self::new(data_dir)
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    pub fn contacts_file(&self) -> PathBuf {
        self.data_dir.join(CONTACTS_FILE)
    }

    pub fn rps_stats_file(&self) -> PathBuf {
        self.data_dir.join(RPS_STATS_FILE)
    }

    pub fn rps_high_score_file(&self) -> PathBuf {
        self.data_dir.join(RPS_HIGH_SCORE_FILE)
    }

    pub fn password_history_file(&self) -> PathBuf {
        self.data_dir.join(PASSWORD_HISTORY_FILE)
    }

    // =========================================================================
    // JSON documents
    // =========================================================================

    /// Read a JSON document, or `T::default()` if the file does not exist.
    pub fn read_json_or_default<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "state file missing, using empty state");
            return Ok(T::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&content).map_err(|err| Error::CorruptState {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Write a JSON document atomically (pretty-printed).
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Locked read-modify-write of a JSON document.
    ///
    /// The document is only written back when `f` succeeds, so a rejected
    /// action leaves the file untouched.
    pub fn update_json<T, R, F>(&self, path: &Path, f: F) -> Result<R>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _lock = FileLock::acquire(lock::lock_path_for(path), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut doc: T = self.read_json_or_default(path)?;
        let result = f(&mut doc)?;
        self.write_json(path, &doc)?;
        tracing::debug!(path = %path.display(), "state file updated");
        Ok(result)
    }

    // =========================================================================
    // Bare integer files
    // =========================================================================

    /// Read a file holding a single non-negative integer; missing means 0.
    pub fn read_counter(&self, path: &Path) -> Result<u64> {
        if !path.exists() {
            return Ok(0);
        }
        let raw = fs::read_to_string(path)?;
        raw.trim().parse::<u64>().map_err(|err| Error::CorruptState {
            path: path.to_path_buf(),
            reason: format!("expected a non-negative integer: {err}"),
        })
    }

    pub fn write_counter(&self, path: &Path, value: u64) -> Result<()> {
        lock::write_atomic_str(path, &value.to_string())
    }

    // =========================================================================
    // JSONL logs
    // =========================================================================

    /// Append one record to a JSONL file.
    ///
    /// Appends of a single short line are not torn in practice, but the
    /// lock keeps them ordered against [`Storage::truncate`].
    pub fn append_jsonl<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        let _lock = FileLock::acquire(lock::lock_path_for(path), DEFAULT_LOCK_TIMEOUT_MS)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(record)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", json)?;
        file.sync_all()?;

        Ok(())
    }

    /// Read all records from a JSONL file; missing file is empty.
    pub fn read_jsonl<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|err| Error::CorruptState {
                path: path.to_path_buf(),
                reason: format!("line {}: {err}", idx + 1),
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// Empty a log file. Returns whether anything was removed.
    pub fn truncate(&self, path: &Path) -> Result<bool> {
        let _lock = FileLock::acquire(lock::lock_path_for(path), DEFAULT_LOCK_TIMEOUT_MS)?;
        if !path.exists() {
            return Ok(false);
        }
        let had_content = fs::metadata(path)?.len() > 0;
        lock::write_atomic(path, b"")?;
        Ok(had_content)
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "toolbelt")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
}
