use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::debug;

use super::super::domain::ApplicationAnswers;
use super::policy::{
    is_approved, penalized_score, round_tenths, FeedbackBand, FLAGGED_SINCERITY,
};
use super::rules::{detect_ai_generated, score_answers, AiSignals, QuestionScores};
use super::tables::{CompiledTables, ScoringTables};
use super::{ApplicationEvaluator, EvaluationResult, EvaluatorKind, ScoreBreakdown};

/// Deterministic evaluator built on keyword, length, and AI-pattern heuristics.
#[derive(Debug, Clone)]
pub struct HeuristicEvaluator {
    tables: Arc<CompiledTables>,
}

impl HeuristicEvaluator {
    pub fn new(tables: CompiledTables) -> Self {
        Self {
            tables: Arc::new(tables),
        }
    }

    /// Evaluator over the built-in scoring tables.
    pub fn standard() -> Self {
        static STANDARD: OnceLock<Arc<CompiledTables>> = OnceLock::new();
        let tables = STANDARD.get_or_init(|| {
            Arc::new(
                ScoringTables::default()
                    .compile()
                    .expect("built-in scoring tables compile"),
            )
        });
        Self {
            tables: Arc::clone(tables),
        }
    }

    pub fn tables(&self) -> &ScoringTables {
        self.tables.source()
    }

    pub fn question_scores(&self, answers: &ApplicationAnswers) -> QuestionScores {
        score_answers(answers, &self.tables)
    }

    pub fn ai_signals(&self, answers: &ApplicationAnswers) -> AiSignals {
        detect_ai_generated(&answers.combined(), &self.tables)
    }

    /// Score an answer set synchronously.
    pub fn assess(&self, answers: &ApplicationAnswers) -> EvaluationResult {
        let scores = self.question_scores(answers);
        let signals = self.ai_signals(answers);
        let ai_detected = signals.detected;

        let final_score = penalized_score(scores.average(), ai_detected);
        let approved = is_approved(final_score, ai_detected);
        let band = FeedbackBand::classify(final_score, ai_detected);

        debug!(
            ?scores,
            ai_points = signals.points,
            final_score,
            approved,
            "heuristic evaluation complete"
        );

        EvaluationResult {
            score: round_tenths(final_score),
            approved,
            feedback: band.message().to_string(),
            ai_detected,
            breakdown: breakdown(&scores, ai_detected),
        }
    }
}

impl Default for HeuristicEvaluator {
    fn default() -> Self {
        Self::standard()
    }
}

#[async_trait]
impl ApplicationEvaluator for HeuristicEvaluator {
    fn kind(&self) -> EvaluatorKind {
        EvaluatorKind::Heuristic
    }

    async fn evaluate(&self, answers: &ApplicationAnswers) -> EvaluationResult {
        self.assess(answers)
    }
}

fn breakdown(scores: &QuestionScores, ai_detected: bool) -> ScoreBreakdown {
    let pair = |a: u8, b: u8| round_tenths((f32::from(a) + f32::from(b)) / 2.0);

    ScoreBreakdown {
        depth: pair(scores.collaboration, scores.growth),
        sincerity: if ai_detected {
            FLAGGED_SINCERITY
        } else {
            pair(scores.motivation, scores.community)
        },
        creative_clarity: f32::from(scores.growth),
        community_mindset: pair(scores.community, scores.values),
    }
}
