//! The pluggable generative-model seam.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AiError;

const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Anything that can answer a prompt with raw text.
///
/// Implementations: [`GeminiModel`] for the real network call and
/// [`ReplayModel`] for recorded fixtures; tests add their own canned
/// implementations.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Gemini REST client.
///
/// Constructed without a key it stays usable and reports
/// [`AiError::MissingApiKey`] at call time, mirroring how a missing
/// credential degrades the whole adapter rather than crashing startup.
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiModel {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    pub fn with_model(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_ENDPOINT, self.model, api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.to_string() }],
            }],
        };

        debug!(model = %self.model, "calling generative model");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| AiError::Request(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Request(format!("{status}: {detail}")));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|err| AiError::Request(err.to_string()))?;
        let text: String = reply
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Replays recorded model responses in order; exhausting the recording
/// behaves like an empty reply.
pub struct ReplayModel {
    responses: Mutex<VecDeque<String>>,
}

impl ReplayModel {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    /// Loads a fixture file containing a JSON array of recorded responses.
    pub fn from_file(path: &Path) -> Result<Self, AiError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| AiError::Request(format!("fixture {}: {err}", path.display())))?;
        let responses: Vec<String> = serde_json::from_str(&raw)
            .map_err(|err| AiError::Request(format!("fixture {}: {err}", path.display())))?;
        Ok(Self::new(responses))
    }
}

#[async_trait]
impl GenerativeModel for ReplayModel {
    async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        self.responses
            .lock()
            .expect("replay lock")
            .pop_front()
            .ok_or(AiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keyless_gemini_reports_missing_key() {
        let model = GeminiModel::new(None);
        let err = model.generate("prompt").await.unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey));

        let blank = GeminiModel::new(Some("   ".into()));
        assert!(matches!(
            blank.generate("prompt").await.unwrap_err(),
            AiError::MissingApiKey
        ));
    }

    #[tokio::test]
    async fn replay_model_returns_responses_in_order() {
        let model = ReplayModel::new(vec!["one".into(), "two".into()]);
        assert_eq!(model.generate("p").await.unwrap(), "one");
        assert_eq!(model.generate("p").await.unwrap(), "two");
        assert!(matches!(
            model.generate("p").await.unwrap_err(),
            AiError::EmptyResponse
        ));
    }

    #[tokio::test]
    async fn replay_model_loads_fixture_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.json");
        std::fs::write(&path, r#"["{\"2024-03-01\": {}}"]"#).unwrap();
        let model = ReplayModel::from_file(&path).unwrap();
        assert!(model.generate("p").await.unwrap().contains("2024-03-01"));
    }
}
