use thiserror::Error;

/// Errors surfaced by lesson generation, catalog loading and persistence
#[derive(Error, Debug)]
pub enum KeydrillError {
    #[error("unknown lesson type: {0}")]
    UnknownLessonType(String),

    #[error("lesson {lesson_id} has an empty pool")]
    EmptyPool { lesson_id: String },

    #[error("lesson not found: {0}")]
    LessonNotFound(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, KeydrillError>;
