use super::common::*;

use crate::workflows::applications::evaluation::{
    ApplicationEvaluator, EvaluatorKind, GeminiClient, GeminiSettings, ModelError, ModelVerdict,
    RemoteEvaluationError, RemoteModelEvaluator,
};

#[tokio::test]
async fn sends_prompt_with_configured_sampling() {
    let model = StubModel::replying(
        r#"{"score": 8, "flagged_as_ai": false, "comments": "Warm and specific."}"#,
    );
    let evaluator = RemoteModelEvaluator::new(model.clone()).with_generation(0.3, 512);

    let result = evaluator.evaluate(&strong_answers()).await;
    assert_eq!(result.score, 8.0);
    assert!(result.approved);
    assert_eq!(result.feedback, "Warm and specific.");

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].temperature, 0.3);
    assert_eq!(requests[0].max_output_tokens, 512);
    assert!(requests[0]
        .prompt
        .contains("Question 3 - Describe a moment where community changed something for you."));
    assert!(requests[0].prompt.contains("free workshop for kids"));
}

#[tokio::test]
async fn defaults_match_the_hosted_model_settings() {
    let model = StubModel::replying(r#"{"score": 5, "flagged_as_ai": false, "comments": "ok"}"#);
    let evaluator = RemoteModelEvaluator::new(model.clone());

    evaluator.evaluate(&strong_answers()).await;

    let request = &model.requests()[0];
    assert_eq!(request.temperature, 0.1);
    assert_eq!(request.max_output_tokens, 1024);
    assert_eq!(evaluator.kind(), EvaluatorKind::RemoteModel);
}

#[tokio::test]
async fn accepts_json_wrapped_in_markdown_fences() {
    let evaluator = RemoteModelEvaluator::new(StubModel::replying(
        "```json\n{\"score\": 9.4, \"flagged_as_ai\": false, \"comments\": \"Grounded {and} personal.\"}\n```",
    ));

    let verdict = evaluator
        .verdict(&strong_answers())
        .await
        .expect("verdict parses");
    assert_eq!(verdict.score, 9);
    assert_eq!(verdict.comments, "Grounded {and} personal.");
}

#[tokio::test]
async fn verdict_exposes_failure_reasons() {
    let missing = RemoteModelEvaluator::new(StubModel::replying("I'd rather not say."))
        .verdict(&strong_answers())
        .await;
    assert!(matches!(missing, Err(RemoteEvaluationError::MissingJson)));

    let wrong_shape = RemoteModelEvaluator::new(StubModel::replying(
        r#"{"score": 8, "flagged_as_ai": "maybe", "comments": "x"}"#,
    ))
    .verdict(&strong_answers())
    .await;
    assert!(matches!(
        wrong_shape,
        Err(RemoteEvaluationError::InvalidShape {
            field: "flagged_as_ai"
        })
    ));

    let timeout = RemoteModelEvaluator::new(StubModel::with_reply(StubReply::Timeout))
        .verdict(&strong_answers())
        .await;
    assert!(matches!(
        timeout,
        Err(RemoteEvaluationError::Model(ModelError::Timeout))
    ));
}

#[tokio::test]
async fn every_failure_mode_falls_back() {
    let fallback = ModelVerdict::fallback();

    for reply in [
        StubReply::Status(429),
        StubReply::Timeout,
        StubReply::MissingCredential,
        StubReply::Text(String::new()),
        StubReply::Text("{\"score\": 8".to_string()),
        StubReply::Text(r#"{"score": 8, "flagged_as_ai": false}"#.to_string()),
    ] {
        let evaluator = RemoteModelEvaluator::new(StubModel::with_reply(reply.clone()));
        let verdict = evaluator.verdict_or_fallback(&strong_answers()).await;
        assert_eq!(verdict, fallback, "reply {reply:?} should fall back");
    }
}

#[tokio::test]
async fn gemini_client_without_key_falls_back() {
    let client = GeminiClient::new(GeminiSettings::default()).expect("client builds");
    let evaluator = RemoteModelEvaluator::new(client);

    let result = evaluator.evaluate(&strong_answers()).await;
    assert_eq!(result, ModelVerdict::fallback().into_result());
}
