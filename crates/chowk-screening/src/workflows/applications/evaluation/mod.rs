//! Applicant scoring.
//!
//! Two interchangeable strategies sit behind [`ApplicationEvaluator`]: a deterministic keyword and
//! length heuristic, and a remote generative model that falls back to a neutral verdict whenever
//! the call fails. Both always return an [`EvaluationResult`].

pub mod heuristic;
mod policy;
pub mod remote;
mod rules;
pub mod tables;

pub use heuristic::HeuristicEvaluator;
pub use policy::{
    is_approved, FeedbackBand, AI_DETECTION_THRESHOLD, AI_SCORE_PENALTY, APPROVAL_THRESHOLD,
    FLAGGED_SINCERITY,
};
pub use remote::{
    GeminiClient, GeminiSettings, GenerationRequest, GenerativeModel, ModelError, ModelVerdict,
    RemoteEvaluationError, RemoteModelEvaluator,
};
pub use rules::{AiSignals, QuestionScores};
pub use tables::{ScoringTables, ScoringTablesError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::ApplicationAnswers;

/// Scoring strategy contract. Implementations never fail: every call yields a result.
#[async_trait]
pub trait ApplicationEvaluator: Send + Sync {
    fn kind(&self) -> EvaluatorKind;

    async fn evaluate(&self, answers: &ApplicationAnswers) -> EvaluationResult;
}

/// Which strategy produced an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    Heuristic,
    RemoteModel,
}

impl EvaluatorKind {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluatorKind::Heuristic => "heuristic",
            EvaluatorKind::RemoteModel => "remote_model",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "heuristic" | "local" => Some(Self::Heuristic),
            "remote" | "remote_model" | "gemini" | "llm" => Some(Self::RemoteModel),
            _ => None,
        }
    }
}

/// Named sub-scores reported alongside the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub depth: f32,
    pub sincerity: f32,
    pub creative_clarity: f32,
    pub community_mindset: f32,
}

/// Outcome of a single evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub score: f32,
    pub approved: bool,
    pub feedback: String,
    pub ai_detected: bool,
    pub breakdown: ScoreBreakdown,
}
