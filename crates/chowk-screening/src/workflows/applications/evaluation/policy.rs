use serde::{Deserialize, Serialize};

/// Minimum score for approval, inclusive.
pub const APPROVAL_THRESHOLD: f32 = 7.0;
/// Subtracted from the heuristic average when the answers look machine-written.
pub const AI_SCORE_PENALTY: f32 = 3.0;
/// AI-signal points needed to raise the flag.
pub const AI_DETECTION_THRESHOLD: u8 = 3;
/// Sincerity reported for flagged answer sets, regardless of the sub-scores.
pub const FLAGGED_SINCERITY: f32 = 2.0;

pub const MIN_SCORE: f32 = 0.0;
pub const MAX_SCORE: f32 = 10.0;

/// Approval is a function of the score and the AI flag only; the flag is a veto.
pub fn is_approved(score: f32, ai_detected: bool) -> bool {
    score >= APPROVAL_THRESHOLD && !ai_detected
}

pub(crate) fn penalized_score(average: f32, ai_detected: bool) -> f32 {
    let score = if ai_detected {
        (average - AI_SCORE_PENALTY).max(MIN_SCORE)
    } else {
        average
    };
    clamp_score(score)
}

pub(crate) fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        return MIN_SCORE;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}

pub(crate) fn round_tenths(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Canned feedback ladder used by the heuristic evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackBand {
    AiGenerated,
    LacksDepth,
    NeedsSpecificity,
    StrongAlignment,
}

impl FeedbackBand {
    pub fn classify(score: f32, ai_detected: bool) -> Self {
        if ai_detected {
            FeedbackBand::AiGenerated
        } else if score < 4.0 {
            FeedbackBand::LacksDepth
        } else if score < APPROVAL_THRESHOLD {
            FeedbackBand::NeedsSpecificity
        } else {
            FeedbackBand::StrongAlignment
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            FeedbackBand::AiGenerated => {
                "Application appears to contain AI-generated content. Orange Chowk values authentic, personal responses."
            }
            FeedbackBand::LacksDepth => {
                "Application lacks depth and community alignment. Consider reflecting more on what creative community means to you."
            }
            FeedbackBand::NeedsSpecificity => {
                "Good intent shown, but responses need more specificity and emotional depth to align with Orange Chowk values."
            }
            FeedbackBand::StrongAlignment => {
                "Strong alignment with Orange Chowk values. Welcome to the community!"
            }
        }
    }
}
