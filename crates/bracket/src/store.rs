//! Local persistence of the current bracket.
//!
//! State is kept as a JSON envelope `{ "timestamp": <ms>, "data": <state> }`.
//! Loaded data goes through the same validation as shared links.

use bracket_core::BracketState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::share::{parse_state, ShareError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(String),

    #[error("stored bracket rejected: {0}")]
    Invalid(#[from] ShareError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Where a session keeps its bracket between runs
pub trait BracketStore {
    fn save(&self, state: &BracketState) -> StoreResult<()>;

    /// The saved bracket, or `None` if nothing has been saved
    fn load(&self) -> StoreResult<Option<BracketState>>;

    fn clear(&self) -> StoreResult<()>;

    /// When the saved bracket was written
    fn last_modified(&self) -> StoreResult<Option<DateTime<Utc>>>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    /// Milliseconds since the Unix epoch
    timestamp: i64,
    data: Value,
}

impl Envelope {
    fn wrap(state: &BracketState) -> StoreResult<Self> {
        let data =
            serde_json::to_value(state).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Self {
            timestamp: Utc::now().timestamp_millis(),
            data,
        })
    }

    fn modified(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// JSON file on disk, replaced atomically on save
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }

    fn read_envelope(&self) -> StoreResult<Option<Envelope>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let envelope = serde_json::from_reader(reader)
            .map_err(|e| StoreError::Serialization(format!("failed to parse saved bracket: {e}")))?;
        Ok(Some(envelope))
    }
}

impl BracketStore for FileStore {
    fn save(&self, state: &BracketState) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let envelope = Envelope::wrap(state)?;
        let tmp_path = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, &envelope)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "saved bracket");
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<BracketState>> {
        match self.read_envelope()? {
            Some(envelope) => Ok(Some(parse_state(envelope.data)?)),
            None => Ok(None),
        }
    }

    fn clear(&self) -> StoreResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn last_modified(&self) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(self.read_envelope()?.and_then(|e| e.modified()))
    }
}

/// In-process store, mostly for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: RefCell<Option<Envelope>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BracketStore for MemoryStore {
    fn save(&self, state: &BracketState) -> StoreResult<()> {
        *self.saved.borrow_mut() = Some(Envelope::wrap(state)?);
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<BracketState>> {
        match self.saved.borrow().as_ref() {
            Some(envelope) => Ok(Some(parse_state(envelope.data.clone())?)),
            None => Ok(None),
        }
    }

    fn clear(&self) -> StoreResult<()> {
        self.saved.borrow_mut().take();
        Ok(())
    }

    fn last_modified(&self) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(self.saved.borrow().as_ref().and_then(Envelope::modified))
    }
}
