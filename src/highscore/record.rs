use serde::{Deserialize, Serialize};

/// On-disk high-score record, `{"Username": "...", "HiScore": 1234}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    #[serde(rename = "Username", default)]
    pub username: String,
    #[serde(rename = "HiScore", default)]
    pub hi_score: u32,
}
