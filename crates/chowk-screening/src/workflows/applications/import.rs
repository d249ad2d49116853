use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{ApplicationAnswers, ApplicationSubmission};

#[derive(Debug)]
pub enum ApplicationImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ApplicationImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationImportError::Io(err) => {
                write!(f, "failed to read application export: {}", err)
            }
            ApplicationImportError::Csv(err) => {
                write!(f, "invalid application CSV data: {}", err)
            }
        }
    }
}

impl std::error::Error for ApplicationImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApplicationImportError::Io(err) => Some(err),
            ApplicationImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ApplicationImportError {
    fn from(value: std::io::Error) -> Self {
        ApplicationImportError::Io(value)
    }
}

impl From<csv::Error> for ApplicationImportError {
    fn from(value: csv::Error) -> Self {
        ApplicationImportError::Csv(value)
    }
}

/// Reads exported `application_responses` rows back into submissions for batch re-scoring.
pub struct ApplicationCsvImporter;

impl ApplicationCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ApplicationSubmission>, ApplicationImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<ApplicationSubmission>, ApplicationImportError> {
        // Answers are scored as stored, so only headers are trimmed.
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut submissions = Vec::new();
        for row in csv_reader.deserialize::<ResponseRow>() {
            submissions.push(row?.into_submission());
        }

        Ok(submissions)
    }
}

#[derive(Debug, Deserialize)]
struct ResponseRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    profession: Option<String>,
    #[serde(default)]
    motivation: String,
    #[serde(default)]
    community_meaning: String,
    #[serde(default)]
    collaboration_story: String,
    #[serde(default)]
    current_projects: String,
    #[serde(default)]
    contribution_plans: String,
}

impl ResponseRow {
    fn into_submission(self) -> ApplicationSubmission {
        ApplicationSubmission {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            city: self.city.map(|city| city.trim().to_string()),
            profession: self.profession.map(|profession| profession.trim().to_string()),
            past_events: Vec::new(),
            answers: ApplicationAnswers {
                motivation: self.motivation,
                community: self.community_meaning,
                collaboration: self.collaboration_story,
                growth: self.current_projects,
                values: self.contribution_plans,
            },
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
