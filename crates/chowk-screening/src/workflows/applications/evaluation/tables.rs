use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::super::domain::QuestionId;

const AI_FLAGS: &[&str] = &[
    "leverage",
    "optimize",
    "synergy",
    "holistic",
    "paradigm",
    "elevate",
    "amplify",
    "foster",
    "cultivate",
    "ecosystem",
    "innovative solutions",
    "cutting-edge",
    "next level",
    "game-changer",
    "thought leader",
    "best practices",
];

const PROMOTIONAL: &[&str] = &[
    "startup",
    "founder",
    "ceo",
    "brand",
    "followers",
    "clients",
    "revenue",
    "scale",
    "market",
    "funding",
];

const FIRST_PERSON: &[&str] = &["i", "me", "my", "myself"];

const HUMAN_TYPOS: &[&str] = &["teh", "adn", "hte", "recieve", "seperate"];

/// How a keyword list is matched against a lowercased answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain containment; a keyword inside a longer word still matches.
    #[default]
    Substring,
    WholeWord,
}

/// Applies `delta` once when any `any_of` keyword is present and no `unless` keyword is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub any_of: Vec<String>,
    #[serde(default)]
    pub unless: Vec<String>,
    #[serde(default)]
    pub match_mode: MatchMode,
    pub delta: i8,
}

impl KeywordRule {
    fn new(any_of: &[&str], delta: i8) -> Self {
        Self {
            any_of: owned(any_of),
            unless: Vec::new(),
            match_mode: MatchMode::Substring,
            delta,
        }
    }

    fn unless(mut self, unless: &[&str]) -> Self {
        self.unless = owned(unless);
        self
    }

    fn whole_word(mut self) -> Self {
        self.match_mode = MatchMode::WholeWord;
        self
    }
}

/// Bonus for answers that are long enough and split into several `.`-separated pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElaborationRule {
    /// The answer must be strictly longer than this many characters.
    pub min_chars: usize,
    /// Minimum number of pieces produced by splitting on `.`, empty pieces included.
    pub min_segments: usize,
    pub bonus: i8,
}

/// Scoring rules for a single question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionRubric {
    #[serde(default)]
    pub adjustments: Vec<KeywordRule>,
    /// Applied once per promotional keyword found in the answer.
    #[serde(default)]
    pub promotional_penalty: i8,
    #[serde(default)]
    pub minimum_chars: usize,
    #[serde(default)]
    pub short_penalty: i8,
    #[serde(default)]
    pub elaboration: Option<ElaborationRule>,
}

impl QuestionRubric {
    fn motivation() -> Self {
        Self {
            adjustments: vec![
                KeywordRule::new(&["network"], -2).unless(&["meaningful"]),
                KeywordRule::new(&["build", "contribute"], 2),
                KeywordRule::new(&["grow together", "community"], 1),
            ],
            promotional_penalty: -1,
            minimum_chars: 50,
            short_penalty: -2,
            elaboration: Some(ElaborationRule {
                min_chars: 150,
                min_segments: 3,
                bonus: 1,
            }),
        }
    }

    fn community() -> Self {
        Self {
            adjustments: vec![
                KeywordRule::new(&["collaboration", "share"], 2),
                KeywordRule::new(&["vulnerability", "authentic"], 2),
                KeywordRule::new(&["support", "help"], 1),
                KeywordRule::new(&["networking"], -2).unless(&["meaningful"]),
                KeywordRule::new(&["platform", "opportunity"], -1),
            ],
            promotional_penalty: 0,
            minimum_chars: 40,
            short_penalty: -2,
            elaboration: Some(ElaborationRule {
                min_chars: 0,
                min_segments: 3,
                bonus: 1,
            }),
        }
    }

    fn collaboration() -> Self {
        Self {
            adjustments: vec![
                KeywordRule::new(
                    &[
                        "project",
                        "film",
                        "design",
                        "event",
                        "workshop",
                        "collaboration",
                    ],
                    2,
                )
                .whole_word(),
                KeywordRule::new(&["learned", "changed"], 1),
                KeywordRule::new(&["felt", "realized"], 1),
                KeywordRule::new(&["once upon", "there was"], -3),
            ],
            promotional_penalty: 0,
            minimum_chars: 60,
            short_penalty: -2,
            elaboration: None,
        }
    }

    fn growth() -> Self {
        Self {
            adjustments: vec![
                KeywordRule::new(&["passion", "excited"], 1),
                KeywordRule::new(&["learn", "improve"], 1),
                KeywordRule::new(&["skill", "craft"], 1),
                KeywordRule::new(&["revolutionary", "groundbreaking"], -2),
            ],
            promotional_penalty: 0,
            minimum_chars: 30,
            short_penalty: -3,
            elaboration: None,
        }
    }

    fn values() -> Self {
        Self {
            adjustments: vec![
                KeywordRule::new(&["give", "contribute"], 2),
                KeywordRule::new(&["help", "support"], 1),
                KeywordRule::new(&["organize", "facilitate"], 1),
                KeywordRule::new(&["get"], -1).unless(&["give"]),
                KeywordRule::new(&["benefit"], -1).unless(&["contribute"]),
            ],
            promotional_penalty: 0,
            minimum_chars: 0,
            short_penalty: 0,
            elaboration: None,
        }
    }
}

/// One rubric per question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionRubrics {
    pub motivation: QuestionRubric,
    pub community: QuestionRubric,
    pub collaboration: QuestionRubric,
    pub growth: QuestionRubric,
    pub values: QuestionRubric,
}

impl QuestionRubrics {
    pub fn get(&self, question: QuestionId) -> &QuestionRubric {
        match question {
            QuestionId::Motivation => &self.motivation,
            QuestionId::Community => &self.community,
            QuestionId::Collaboration => &self.collaboration,
            QuestionId::Growth => &self.growth,
            QuestionId::Values => &self.values,
        }
    }
}

impl Default for QuestionRubrics {
    fn default() -> Self {
        Self {
            motivation: QuestionRubric::motivation(),
            community: QuestionRubric::community(),
            collaboration: QuestionRubric::collaboration(),
            growth: QuestionRubric::growth(),
            values: QuestionRubric::values(),
        }
    }
}

/// Curated keyword tables driving the heuristic evaluator.
///
/// Every field falls back to the built-in table when omitted, so an override file only needs to
/// name the lists it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTables {
    pub ai_flags: Vec<String>,
    pub promotional: Vec<String>,
    pub first_person: Vec<String>,
    pub human_typos: Vec<String>,
    pub rubrics: QuestionRubrics,
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self {
            ai_flags: owned(AI_FLAGS),
            promotional: owned(PROMOTIONAL),
            first_person: owned(FIRST_PERSON),
            human_typos: owned(HUMAN_TYPOS),
            rubrics: QuestionRubrics::default(),
        }
    }
}

impl ScoringTables {
    /// Load an override file (JSON) on top of the built-in tables.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScoringTablesError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ScoringTablesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Normalize keywords and precompile the whole-word patterns.
    pub fn compile(self) -> Result<CompiledTables, ScoringTablesError> {
        let first_person = KeywordMatcher::new(&self.first_person, MatchMode::WholeWord)?;
        let human_typos = KeywordMatcher::new(&self.human_typos, MatchMode::WholeWord)?;
        let ai_flags = normalize(&self.ai_flags);
        let promotional = normalize(&self.promotional);

        // Indexed by `QuestionId` discriminant.
        let rubrics = QuestionId::ALL
            .into_iter()
            .map(|question| CompiledRubric::new(self.rubrics.get(question)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledTables {
            ai_flags,
            promotional,
            first_person,
            human_typos,
            rubrics,
            source: self,
        })
    }
}

/// Tables ready for scoring; built once and shared between evaluations.
#[derive(Debug)]
pub struct CompiledTables {
    pub(crate) ai_flags: Vec<String>,
    pub(crate) promotional: Vec<String>,
    pub(crate) first_person: KeywordMatcher,
    pub(crate) human_typos: KeywordMatcher,
    rubrics: Vec<CompiledRubric>,
    source: ScoringTables,
}

impl CompiledTables {
    pub fn source(&self) -> &ScoringTables {
        &self.source
    }

    pub(crate) fn rubric(&self, question: QuestionId) -> &CompiledRubric {
        &self.rubrics[question as usize]
    }
}

#[derive(Debug)]
pub(crate) struct CompiledRubric {
    pub(crate) adjustments: Vec<CompiledRule>,
    pub(crate) promotional_penalty: i8,
    pub(crate) minimum_chars: usize,
    pub(crate) short_penalty: i8,
    pub(crate) elaboration: Option<ElaborationRule>,
}

impl CompiledRubric {
    fn new(rubric: &QuestionRubric) -> Result<Self, ScoringTablesError> {
        let adjustments = rubric
            .adjustments
            .iter()
            .map(CompiledRule::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            adjustments,
            promotional_penalty: rubric.promotional_penalty,
            minimum_chars: rubric.minimum_chars,
            short_penalty: rubric.short_penalty,
            elaboration: rubric.elaboration,
        })
    }
}

#[derive(Debug)]
pub(crate) struct CompiledRule {
    any_of: KeywordMatcher,
    unless: KeywordMatcher,
    pub(crate) delta: i8,
}

impl CompiledRule {
    fn new(rule: &KeywordRule) -> Result<Self, ScoringTablesError> {
        Ok(Self {
            any_of: KeywordMatcher::new(&rule.any_of, rule.match_mode)?,
            unless: KeywordMatcher::new(&rule.unless, rule.match_mode)?,
            delta: rule.delta,
        })
    }

    pub(crate) fn applies(&self, lowered: &str) -> bool {
        self.any_of.is_match(lowered) && !self.unless.is_match(lowered)
    }
}

#[derive(Debug)]
pub(crate) enum KeywordMatcher {
    Never,
    Substring(Vec<String>),
    WholeWord(Regex),
}

impl KeywordMatcher {
    fn new(keywords: &[String], mode: MatchMode) -> Result<Self, ScoringTablesError> {
        let keywords = normalize(keywords);
        if keywords.is_empty() {
            return Ok(Self::Never);
        }

        match mode {
            MatchMode::Substring => Ok(Self::Substring(keywords)),
            MatchMode::WholeWord => {
                let alternatives = keywords
                    .iter()
                    .map(|keyword| regex::escape(keyword))
                    .collect::<Vec<_>>()
                    .join("|");
                // ASCII boundaries: a letter like `é` next to a keyword does not join it into a word.
                let pattern =
                    Regex::new(&format!(r"(?i)(?-u:\b)(?:{alternatives})(?-u:\b)"))?;
                Ok(Self::WholeWord(pattern))
            }
        }
    }

    pub(crate) fn is_match(&self, lowered: &str) -> bool {
        match self {
            KeywordMatcher::Never => false,
            KeywordMatcher::Substring(keywords) => {
                keywords.iter().any(|keyword| lowered.contains(keyword.as_str()))
            }
            KeywordMatcher::WholeWord(pattern) => pattern.is_match(lowered),
        }
    }
}

/// Errors raised while loading or compiling scoring tables.
#[derive(Debug, thiserror::Error)]
pub enum ScoringTablesError {
    #[error("failed to read scoring tables from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scoring tables: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn normalize(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}
