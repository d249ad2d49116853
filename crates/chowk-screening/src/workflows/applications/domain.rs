use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// The five fixed questions asked by the membership wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionId {
    Motivation,
    Community,
    Collaboration,
    Growth,
    Values,
}

impl QuestionId {
    /// Canonical wizard order.
    pub const ALL: [QuestionId; 5] = [
        QuestionId::Motivation,
        QuestionId::Community,
        QuestionId::Collaboration,
        QuestionId::Growth,
        QuestionId::Values,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            QuestionId::Motivation => "motivation",
            QuestionId::Community => "community",
            QuestionId::Collaboration => "collaboration",
            QuestionId::Growth => "growth",
            QuestionId::Values => "values",
        }
    }

    /// Question text as shown to the applicant.
    pub const fn prompt(self) -> &'static str {
        match self {
            QuestionId::Motivation => "Why do you want to be part of Orange Chowk?",
            QuestionId::Community => "What does a creative community mean to you?",
            QuestionId::Collaboration => {
                "Describe a moment where community changed something for you."
            }
            QuestionId::Growth => "What are you currently building, making, or dreaming about?",
            QuestionId::Values => "How do you want to contribute to the community?",
        }
    }
}

/// Free-text answers collected by the wizard. Missing keys deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationAnswers {
    #[serde(default)]
    pub motivation: String,
    #[serde(default)]
    pub community: String,
    #[serde(default)]
    pub collaboration: String,
    #[serde(default)]
    pub growth: String,
    #[serde(default)]
    pub values: String,
}

impl ApplicationAnswers {
    pub fn answer(&self, question: QuestionId) -> &str {
        match question {
            QuestionId::Motivation => &self.motivation,
            QuestionId::Community => &self.community,
            QuestionId::Collaboration => &self.collaboration,
            QuestionId::Growth => &self.growth,
            QuestionId::Values => &self.values,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> + '_ {
        QuestionId::ALL
            .into_iter()
            .map(move |question| (question, self.answer(question)))
    }

    /// All answers joined by a single space in wizard order.
    pub fn combined(&self) -> String {
        self.iter()
            .map(|(_, answer)| answer)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Raw application as submitted by the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub past_events: Vec<String>,
    pub answers: ApplicationAnswers,
}

/// A submission that passed intake and was assigned an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub application_id: ApplicationId,
    pub name: String,
    pub email: String,
    pub city: Option<String>,
    pub profession: Option<String>,
    pub past_events: Vec<String>,
    pub answers: ApplicationAnswers,
    pub submitted_at: DateTime<Utc>,
}

/// Routing state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}
