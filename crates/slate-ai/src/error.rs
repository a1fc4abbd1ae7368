use thiserror::Error;

/// Structured failures of the estimation adapter.
///
/// Each case carries a distinct message; the parse-stage cases retain the
/// raw model output for diagnostics. Nothing here is retried or silently
/// defaulted.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("no API key configured for the generative model")]
    MissingApiKey,
    #[error("empty response from the generative model")]
    EmptyResponse,
    #[error("no JSON object found in the model response")]
    NoJsonObject { raw: String },
    #[error("failed to decode model JSON: {message}")]
    InvalidJson { message: String, raw: String },
    #[error("model request failed: {0}")]
    Request(String),
}

impl AiError {
    /// The raw model output, when the failure happened after a response
    /// arrived.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AiError::NoJsonObject { raw } | AiError::InvalidJson { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
