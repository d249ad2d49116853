use crate::infra::build_evaluator;
use chowk_screening::config::AppConfig;
use chowk_screening::error::AppError;
use chowk_screening::telemetry;
use chowk_screening::workflows::applications::{
    ApplicationAnswers, ApplicationCsvImporter, ApplicationEvaluator, EvaluationResult,
    EvaluatorKind,
};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    #[command(flatten)]
    source: AnswerSource,
    /// Override the configured evaluator (heuristic or remote)
    #[arg(long, value_parser = crate::infra::parse_engine)]
    engine: Option<EvaluatorKind>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct AnswerSource {
    /// Answers as a JSON object keyed by question (motivation, community, ...)
    #[arg(long)]
    answers: Option<String>,
    /// CSV export of application responses to re-score
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ScoredApplication {
    name: String,
    email: String,
    evaluator: EvaluatorKind,
    result: EvaluationResult,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(engine) = args.engine {
        config.evaluator.engine = engine;
    }
    telemetry::init(&config.telemetry)?;

    let evaluator = build_evaluator(&config.evaluator)?;

    if let Some(raw) = args.source.answers {
        let answers = parse_answers(&raw)?;
        let result = evaluator.evaluate(&answers).await;
        print_json(&result)?;
        return Ok(());
    }

    if let Some(path) = args.source.csv {
        let submissions = ApplicationCsvImporter::from_path(&path)?;
        let mut scored = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let result = evaluator.evaluate(&submission.answers).await;
            scored.push(ScoredApplication {
                name: submission.name,
                email: submission.email,
                evaluator: evaluator.kind(),
                result,
            });
        }

        let approved = scored.iter().filter(|entry| entry.result.approved).count();
        tracing::info!(
            path = %path.display(),
            total = scored.len(),
            approved,
            "re-scored application export"
        );
        print_json(&scored)?;
    }

    Ok(())
}

fn parse_answers(raw: &str) -> Result<ApplicationAnswers, AppError> {
    serde_json::from_str(raw)
        .map_err(|err| AppError::InvalidInput(format!("answers must be a JSON object: {err}")))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::InvalidInput(format!("unable to render result: {err}")))?;
    println!("{rendered}");
    Ok(())
}
