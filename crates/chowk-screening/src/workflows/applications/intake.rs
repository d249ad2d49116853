use chrono::Utc;

use super::domain::{ApplicantProfile, ApplicationId, ApplicationSubmission, QuestionId};

/// Validation errors raised before an application is accepted.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("applicant name is required")]
    MissingName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("answer to '{}' needs at least {minimum} characters (found {found})", .question.key())]
    AnswerTooShort {
        question: QuestionId,
        minimum: usize,
        found: usize,
    },
}

const DEFAULT_MINIMUM_ANSWER_CHARS: usize = 30;

/// Policy dial for the wizard's own completeness checks.
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    minimum_answer_chars: usize,
}

impl IntakePolicy {
    pub fn new(minimum_answer_chars: usize) -> Self {
        Self {
            minimum_answer_chars,
        }
    }

    pub fn minimum_answer_chars(&self) -> usize {
        self.minimum_answer_chars
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MINIMUM_ANSWER_CHARS)
    }
}

/// Guard responsible for producing `ApplicantProfile` instances.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Convert an inbound submission into a normalized applicant profile.
    pub fn profile_from_submission(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicantProfile, IntakeViolation> {
        let name = submission.name.trim().to_string();
        if name.is_empty() {
            return Err(IntakeViolation::MissingName);
        }

        let email = submission.email.trim().to_ascii_lowercase();
        if !is_plausible_email(&email) {
            return Err(IntakeViolation::InvalidEmail(submission.email));
        }

        let minimum = self.policy.minimum_answer_chars;
        for (question, answer) in submission.answers.iter() {
            let found = answer.trim().chars().count();
            if found < minimum {
                return Err(IntakeViolation::AnswerTooShort {
                    question,
                    minimum,
                    found,
                });
            }
        }

        Ok(ApplicantProfile {
            application_id: ApplicationId("pending".to_string()),
            name,
            email,
            city: non_blank(submission.city),
            profession: non_blank(submission.profession),
            past_events: submission
                .past_events
                .into_iter()
                .map(|event| event.trim().to_string())
                .filter(|event| !event.is_empty())
                .collect(),
            answers: submission.answers,
            submitted_at: Utc::now(),
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
