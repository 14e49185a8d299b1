use thiserror::Error;

/// Faults of the machinery around the simulation. Player actions are
/// never represented here: a bad or unaffordable action degrades to a
/// no-op (plus an in-state message), it does not error.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session '{id}' not found")]
    SessionNotFound { id: String },

    #[error("Unknown catalog id '{id}'")]
    UnknownCatalogId { id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
