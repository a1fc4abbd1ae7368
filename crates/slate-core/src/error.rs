use thiserror::Error;

/// Unified error type for the core and storage layers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("dataset not found: {0}")]
    NotFound(String),
    #[error("malformed date string: {0}")]
    MalformedDate(String),
    #[error("version conflict on `{dataset}`: expected {expected}, found {found}")]
    Conflict {
        dataset: &'static str,
        expected: u64,
        found: u64,
    },
    #[error("corrupt dataset `{0}`: {1}")]
    Corrupt(String, String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
