//! Error types for Docker Quest.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuestError {
    #[error("Storage backend unavailable in this context")]
    StorageUnavailable,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Chapter not found: {0}")]
    ChapterNotFound(u32),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store worker stopped")]
    WorkerStopped,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuestError {
    /// Stable numeric code, used as the CLI exit status
    pub fn code(&self) -> i32 {
        match self {
            QuestError::StorageUnavailable => 10,
            QuestError::Storage(_) => 11,
            QuestError::ChapterNotFound(_) => 20,
            QuestError::Catalog(_) => 21,
            QuestError::Config(_) => 30,
            QuestError::WorkerStopped => 40,
            QuestError::Io(_) => 50,
            QuestError::Json(_) => 51,
        }
    }

    /// Whether the failure only affects the current view
    pub fn is_view_local(&self) -> bool {
        matches!(self, QuestError::ChapterNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, QuestError>;
