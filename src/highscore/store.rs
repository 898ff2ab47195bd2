use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::HighScoreError;
use crate::highscore::record::HighScoreRecord;

const DEFAULT_FILE_NAME: &str = ".tile-fusion";

/// Configuration for high-score persistence.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HighScoreConfig {
    /// Record location; `$HOME/.tile-fusion` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub username: String,
}

/// Where the best score lives between sessions.
pub trait HighScoreStore {
    /// Load the stored high score, `0` when nothing has been stored yet.
    fn load(&mut self) -> Result<u32, HighScoreError>;

    /// Persist a new high score.
    fn save(&mut self, hi_score: u32) -> Result<(), HighScoreError>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// High score kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    hi_score: u32,
}

impl MemoryStore {
    pub fn new(hi_score: u32) -> Self {
        MemoryStore { hi_score }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u32, HighScoreError> {
        Ok(self.hi_score)
    }

    fn save(&mut self, hi_score: u32) -> Result<(), HighScoreError> {
        self.hi_score = hi_score;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// High score stored as a small JSON record on disk.
///
/// A missing file is created with default values on first load. A file that
/// does not parse is treated as "no record" and is overwritten by the next save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    record: HighScoreRecord,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, username: impl Into<String>) -> Self {
        JsonFileStore {
            path: path.into(),
            record: HighScoreRecord {
                username: username.into(),
                hi_score: 0,
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self) -> &HighScoreRecord {
        &self.record
    }

    /// Read the record from disk. `Ok(None)` when the file does not exist.
    pub fn read_record(&self) -> Result<Option<HighScoreRecord>, HighScoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HighScoreError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        let record = serde_json::from_str(&json).map_err(|e| HighScoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(record))
    }

    /// Write the current record, going through a temporary file and a rename.
    pub fn write_record(&self) -> Result<(), HighScoreError> {
        let mut json = serde_json::to_string(&self.record)?;
        json.push('\n');

        let tmp_path = self.path.with_extension("tmp");
        let write_err = |e: std::io::Error| HighScoreError::Write {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&tmp_path, json).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<u32, HighScoreError> {
        match self.read_record() {
            Ok(Some(record)) => {
                if !record.username.is_empty() {
                    self.record.username = record.username;
                }
                self.record.hi_score = record.hi_score;
            }
            Ok(None) => {
                info!(path = %self.path.display(), "no high score record, creating one");
                self.record.hi_score = 0;
                self.write_record()?;
            }
            Err(HighScoreError::Parse { path, source }) => {
                warn!(path = %path.display(), error = %source, "ignoring unreadable high score record");
                self.record.hi_score = 0;
            }
            Err(e) => return Err(e),
        }
        Ok(self.record.hi_score)
    }

    fn save(&mut self, hi_score: u32) -> Result<(), HighScoreError> {
        self.record.hi_score = hi_score;
        self.write_record()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// `.tile-fusion` in the user's home directory.
pub fn default_path() -> Result<PathBuf, HighScoreError> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_FILE_NAME))
        .ok_or(HighScoreError::NoHomeDir)
}

/// Build the store described by `config`, falling back to memory when no
/// location can be determined.
pub fn open_store(config: &HighScoreConfig) -> Box<dyn HighScoreStore> {
    let path = match &config.path {
        Some(path) => Ok(path.clone()),
        None => default_path(),
    };
    match path {
        Ok(path) => Box::new(JsonFileStore::new(path, config.username.clone())),
        Err(e) => {
            warn!(error = %e, "high score will not be persisted");
            Box::new(MemoryStore::default())
        }
    }
}
