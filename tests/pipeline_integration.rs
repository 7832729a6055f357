//! End-to-end tests for the classification pipeline.
//!
//! Stub providers exercise the orchestrator through the public API; the
//! wiremock tests run model selection and classification against a fake
//! Gemini endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use email_router::directory::{StaffDirectory, StaffRecord};
use email_router::error::LlmError;
use email_router::llm::{
    CompletionRequest, CompletionResponse, FinishReason, LlmProvider, ModelSelector, ProbeFailure,
    gemini_factory,
};
use email_router::pipeline::{ClassificationState, EmailClassifier, EmailInput};
use email_router::taxonomy::Taxonomy;

/// Stub backend returning a fixed reply.
struct StubLlm {
    reply: String,
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: self.reply.clone(),
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: FinishReason::Stop,
        })
    }
}

fn stub(reply: &str) -> Arc<dyn LlmProvider> {
    Arc::new(StubLlm {
        reply: reply.to_string(),
    })
}

fn lab_x_directory() -> Arc<StaffDirectory> {
    let json = r#"{
        "A1": {"name": "Kim", "department": "Lab X", "lab": "Formulation", "team": "",
               "position": "Senior", "email": "kim@cosmax.com", "email_verified": true}
    }"#;
    Arc::new(StaffDirectory::from_json_str(json).unwrap())
}

fn shipment_hold() -> EmailInput {
    EmailInput::new("[Urgent] Shipment hold", "SPF measured 38 vs labeled 50+")
}

#[tokio::test]
async fn quality_incident_is_classified() {
    let classifier = EmailClassifier::new(
        stub(r#"{"category":"품질_이슈","urgency":"긴급","summary":"SPF below label","key_points":[],"suggested_actions":[]}"#),
        lab_x_directory(),
        Arc::new(Taxonomy::cosmetics_oem()),
    );

    let result = classifier.classify(&shipment_hold()).await;
    assert_eq!(result.state, ClassificationState::Done);
    assert_eq!(result.category, "품질_이슈");
    assert_eq!(result.urgency, "긴급");
}

#[tokio::test]
async fn department_guess_matches_directory() {
    let classifier = EmailClassifier::new(
        stub("```json\n{\"category\":\"처방_요청\",\"recommended_department\":\"Lab X\"}\n```"),
        lab_x_directory(),
        Arc::new(Taxonomy::cosmetics_oem()),
    );

    let result = classifier.classify(&shipment_hold()).await;
    let a1 = result
        .recommended_researchers
        .iter()
        .find(|r| r.record.code == "A1")
        .expect("A1 should be recommended");
    assert!(a1.match_score >= 3);
    assert_eq!(a1.record.email, "kim@cosmax.com");
}

#[tokio::test]
async fn garbage_reply_yields_parse_failure() {
    let classifier = EmailClassifier::new(
        stub("<html>502 Bad Gateway</html>"),
        lab_x_directory(),
        Arc::new(Taxonomy::cosmetics_oem()),
    );

    let result = classifier.classify(&shipment_hold()).await;
    assert_eq!(result.state, ClassificationState::ParseFailed);
    assert!(!result.summary.is_empty());
    assert!(result.category.is_empty());
}

// ── Against a fake Gemini endpoint ──────────────────────────────────

fn gemini_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 2, "totalTokenCount": 42}
    })
}

#[tokio::test]
async fn selection_falls_back_on_quota_then_classifies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/m1:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "Resource has been exhausted (e.g. check quota).", "status": "RESOURCE_EXHAUSTED"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/m2:generateContent"))
        .and(body_partial_json(json!({"generationConfig": {"maxOutputTokens": 8}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("pong")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/m2:generateContent"))
        .and(body_partial_json(json!({"generationConfig": {"maxOutputTokens": 8192}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text(
            "Here is my analysis.\n```json\n{\"category\":\"품질_이슈\",\"urgency\":\"긴급\",\"recommended_department\":\"Lab X\",\"recommended_lab\":\"Formulation\"}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/m3:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("pong")))
        .expect(0)
        .mount(&server)
        .await;

    let factory = gemini_factory(SecretString::from("test-key"), server.uri());
    let candidates: Vec<String> = ["m1", "m2", "m3"].iter().map(|s| s.to_string()).collect();
    let selected = ModelSelector::new(factory).select(&candidates).await.unwrap();

    assert_eq!(selected.model, "m2");
    assert_eq!(selected.rejected, vec![("m1".to_string(), ProbeFailure::Quota)]);

    let classifier = EmailClassifier::new(
        selected.provider,
        lab_x_directory(),
        Arc::new(Taxonomy::cosmetics_oem()),
    );
    let result = classifier.classify(&shipment_hold()).await;

    assert_eq!(result.state, ClassificationState::Done);
    assert_eq!(result.category, "품질_이슈");
    assert_eq!(result.recommended_researchers.len(), 1);
    assert_eq!(result.recommended_researchers[0].match_score, 5);
}

#[tokio::test]
async fn backend_error_during_classification_is_recovered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/m1:generateContent"))
        .and(body_partial_json(json!({"generationConfig": {"maxOutputTokens": 8}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_text("pong")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/m1:generateContent"))
        .and(body_partial_json(json!({"generationConfig": {"maxOutputTokens": 8192}})))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": 503, "message": "The model is overloaded", "status": "UNAVAILABLE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let factory = gemini_factory(SecretString::from("test-key"), server.uri());
    let selected = ModelSelector::new(factory)
        .select(&["m1".to_string()])
        .await
        .unwrap();

    let classifier = EmailClassifier::new(
        selected.provider,
        Arc::new(StaffDirectory::from_records(vec![StaffRecord::default()])),
        Arc::new(Taxonomy::cosmetics_oem()),
    );
    let result = classifier.classify(&shipment_hold()).await;

    assert_eq!(result.state, ClassificationState::BackendFailed);
    assert!(result.summary.contains("overloaded"));
    assert!(result.recommended_researchers.is_empty());
}

#[tokio::test]
async fn all_candidates_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let factory = gemini_factory(SecretString::from("test-key"), server.uri());
    let err = ModelSelector::new(factory)
        .select(&["m1".to_string(), "m2".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::NoAvailableModel { .. }));
}
