mod gemini;
mod parse;
mod prompt;

pub use gemini::{GeminiClient, GeminiSettings};
pub use parse::{extract_first_json_object, parse_verdict};
pub use prompt::build_prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::super::domain::ApplicationAnswers;
use super::policy::{is_approved, FLAGGED_SINCERITY};
use super::{ApplicationEvaluator, EvaluationResult, EvaluatorKind, ScoreBreakdown};

pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

const FALLBACK_SCORE: u8 = 5;
const FALLBACK_COMMENTS: &str = "Unable to evaluate with AI. Manual review required.";

/// Single prompt plus sampling parameters sent to a text-generation backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Network seam for hosted text generation; tests substitute a stub.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ModelError>;
}

/// Failures talking to the generative backend.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("generative model API key is not configured")]
    MissingCredential,
    #[error("generative model request timed out")]
    Timeout,
    #[error("generative model transport failure: {0}")]
    Transport(String),
    #[error("generative model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generative model response could not be decoded: {0}")]
    Decode(String),
    #[error("generative model returned no text")]
    EmptyResponse,
}

/// Why a remote evaluation did not produce a verdict.
#[derive(Debug, thiserror::Error)]
pub enum RemoteEvaluationError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("no JSON object found in model response")]
    MissingJson,
    #[error("model response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("model response field '{field}' is missing or has the wrong type")]
    InvalidShape { field: &'static str },
}

/// Validated, clamped model output. Serializes in the model's own wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVerdict {
    pub score: u8,
    pub flagged_as_ai: bool,
    pub comments: String,
}

impl ModelVerdict {
    /// Neutral verdict used whenever the remote path fails.
    pub fn fallback() -> Self {
        Self {
            score: FALLBACK_SCORE,
            flagged_as_ai: false,
            comments: FALLBACK_COMMENTS.to_string(),
        }
    }

    pub fn into_result(self) -> EvaluationResult {
        let score = f32::from(self.score);

        EvaluationResult {
            score,
            approved: is_approved(score, self.flagged_as_ai),
            feedback: self.comments,
            ai_detected: self.flagged_as_ai,
            breakdown: ScoreBreakdown {
                depth: score,
                sincerity: if self.flagged_as_ai {
                    FLAGGED_SINCERITY
                } else {
                    score
                },
                creative_clarity: score,
                community_mindset: score,
            },
        }
    }
}

/// Evaluator delegating to a hosted generative model.
pub struct RemoteModelEvaluator<M> {
    model: M,
    temperature: f32,
    max_output_tokens: u32,
}

impl<M> RemoteModelEvaluator<M>
where
    M: GenerativeModel,
{
    pub fn new(model: M) -> Self {
        Self {
            model,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    pub fn with_generation(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// One request, no retry. Failures are returned so callers can observe them.
    pub async fn verdict(
        &self,
        answers: &ApplicationAnswers,
    ) -> Result<ModelVerdict, RemoteEvaluationError> {
        let request = GenerationRequest {
            prompt: build_prompt(answers),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        };

        let raw = self.model.generate(&request).await?;
        parse_verdict(&raw)
    }

    /// Same as [`Self::verdict`], with every failure replaced by [`ModelVerdict::fallback`].
    pub async fn verdict_or_fallback(&self, answers: &ApplicationAnswers) -> ModelVerdict {
        match self.verdict(answers).await {
            Ok(verdict) => {
                info!(
                    score = verdict.score,
                    flagged_as_ai = verdict.flagged_as_ai,
                    "remote model evaluation complete"
                );
                verdict
            }
            Err(err) => {
                warn!(error = %err, "remote model evaluation failed; using fallback verdict");
                ModelVerdict::fallback()
            }
        }
    }
}

#[async_trait]
impl<M> ApplicationEvaluator for RemoteModelEvaluator<M>
where
    M: GenerativeModel,
{
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::RemoteModel
    }

    async fn evaluate(&self, answers: &ApplicationAnswers) -> EvaluationResult {
        self.verdict_or_fallback(answers).await.into_result()
    }
}
