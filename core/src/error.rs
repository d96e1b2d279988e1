use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid date value in store: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    #[error("Unrecognized task value '{0}' in store")]
    UnknownTask(String),

    #[error("Schedule generation already in flight")]
    GenerationInFlight,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RosterResult<T> = Result<T, RosterError>;
