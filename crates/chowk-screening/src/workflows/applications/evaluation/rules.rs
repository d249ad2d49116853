use super::super::domain::{ApplicationAnswers, QuestionId};
use super::policy::AI_DETECTION_THRESHOLD;
use super::tables::{CompiledRubric, CompiledTables};

const NEUTRAL_SCORE: i16 = 5;
const MAX_SUB_SCORE: i16 = 10;
const LONG_SENTENCE_CHARS: f32 = 120.0;
const TYPO_CHECK_MIN_CHARS: usize = 200;

/// Clamped 0-10 rating for each of the five answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionScores {
    pub motivation: u8,
    pub community: u8,
    pub collaboration: u8,
    pub growth: u8,
    pub values: u8,
}

impl QuestionScores {
    pub fn get(&self, question: QuestionId) -> u8 {
        match question {
            QuestionId::Motivation => self.motivation,
            QuestionId::Community => self.community,
            QuestionId::Collaboration => self.collaboration,
            QuestionId::Growth => self.growth,
            QuestionId::Values => self.values,
        }
    }

    pub fn average(&self) -> f32 {
        let total: u16 = QuestionId::ALL
            .iter()
            .map(|question| u16::from(self.get(*question)))
            .sum();
        f32::from(total) / QuestionId::ALL.len() as f32
    }
}

/// Accumulated evidence that the answer set was machine-written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiSignals {
    pub points: u8,
    pub detected: bool,
}

pub(crate) fn score_answers(answers: &ApplicationAnswers, tables: &CompiledTables) -> QuestionScores {
    let score = |question| score_answer(answers.answer(question), tables.rubric(question), tables);

    QuestionScores {
        motivation: score(QuestionId::Motivation),
        community: score(QuestionId::Community),
        collaboration: score(QuestionId::Collaboration),
        growth: score(QuestionId::Growth),
        values: score(QuestionId::Values),
    }
}

fn score_answer(answer: &str, rubric: &CompiledRubric, tables: &CompiledTables) -> u8 {
    let lowered = answer.to_lowercase();
    let chars = answer.chars().count();
    let mut score = NEUTRAL_SCORE;

    for rule in &rubric.adjustments {
        if rule.applies(&lowered) {
            score += i16::from(rule.delta);
        }
    }

    if rubric.promotional_penalty != 0 {
        let hits = tables
            .promotional
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .count() as i16;
        score += hits * i16::from(rubric.promotional_penalty);
    }

    if chars < rubric.minimum_chars {
        score += i16::from(rubric.short_penalty);
    }

    if let Some(elaboration) = rubric.elaboration {
        if chars > elaboration.min_chars && answer.split('.').count() >= elaboration.min_segments {
            score += i16::from(elaboration.bonus);
        }
    }

    score.clamp(0, MAX_SUB_SCORE) as u8
}

pub(crate) fn detect_ai_generated(text: &str, tables: &CompiledTables) -> AiSignals {
    let lowered = text.to_lowercase();
    let mut points: u8 = 0;

    for flag in &tables.ai_flags {
        if lowered.contains(flag.as_str()) {
            points = points.saturating_add(2);
        }
    }

    if average_sentence_chars(text).is_some_and(|average| average > LONG_SENTENCE_CHARS) {
        points = points.saturating_add(1);
    }

    if !tables.first_person.is_match(&lowered) {
        points = points.saturating_add(2);
    }

    if !tables.human_typos.is_match(&lowered) && text.chars().count() > TYPO_CHECK_MIN_CHARS {
        points = points.saturating_add(1);
    }

    AiSignals {
        points,
        detected: points >= AI_DETECTION_THRESHOLD,
    }
}

/// Mean length of the non-blank `.`-separated sentences, untrimmed.
fn average_sentence_chars(text: &str) -> Option<f32> {
    let lengths: Vec<usize> = text
        .split('.')
        .filter(|sentence| !sentence.trim().is_empty())
        .map(|sentence| sentence.chars().count())
        .collect();

    if lengths.is_empty() {
        return None;
    }

    Some(lengths.iter().sum::<usize>() as f32 / lengths.len() as f32)
}
