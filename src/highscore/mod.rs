//! High-score persistence: the JSON record format and the stores that keep it.

mod record;
mod store;

pub use record::HighScoreRecord;
pub use store::{default_path, open_store, HighScoreConfig, HighScoreStore, JsonFileStore, MemoryStore};
