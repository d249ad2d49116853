use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GenerationRequest, GenerativeModel, ModelError};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ERROR_BODY_LIMIT: usize = 512;

/// Connection settings for the hosted Gemini `generateContent` API.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// `GenerativeModel` backed by the Gemini REST API.
pub struct GeminiClient {
    settings: GeminiSettings,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("chowk-screening/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ModelError::Transport(err.to_string()))?;

        Ok(Self { settings, http })
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ModelError::MissingCredential)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        };

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LIMIT {
                let cut = (0..=ERROR_BODY_LIMIT)
                    .rev()
                    .find(|index| body.is_char_boundary(*index))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|err| {
            if err.is_timeout() {
                ModelError::Timeout
            } else {
                ModelError::Decode(err.to_string())
            }
        })?;

        let text = payload.text();
        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        Ok(text)
    }
}

fn transport_error(err: reqwest::Error) -> ModelError {
    if err.is_timeout() {
        ModelError::Timeout
    } else {
        ModelError::Transport(err.to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}
