//! Advisor chat against a mocked Gemini endpoint.

use shieldguard_engine::{
    AdvisorSession, AdvisoryService, ChatMessage, ChatRole, FALLBACK_ADVICE, GREETING,
    GeminiConfig,
};

use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    advisor, advisor_with, gemini_config, mount_answer, mount_status, start_gemini_mock,
};

#[tokio::test]
async fn answer_lands_in_transcript() {
    let server = start_gemini_mock().await;
    mount_answer(&server, "Add a **port-out PIN** with your carrier.").await;

    let mut session = AdvisorSession::new(advisor(&server));
    assert!(session.submit("How do I stop SIM swapping?"));
    session.wait_pending().await;

    let messages = session.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], ChatMessage::model(GREETING));
    assert_eq!(messages[1], ChatMessage::user("How do I stop SIM swapping?"));
    assert_eq!(messages[2].role, ChatRole::Model);
    assert_eq!(messages[2].text, "Add a **port-out PIN** with your carrier.");
}

#[tokio::test]
async fn server_error_becomes_fallback_text() {
    let server = start_gemini_mock().await;
    mount_status(&server, 503, "overloaded").await;

    let mut session = AdvisorSession::new(advisor(&server));
    session.submit("Is NFC dangerous?");
    session.wait_pending().await;

    assert_eq!(session.messages().last().map(|m| m.text.as_str()), Some(FALLBACK_ADVICE));
    assert!(!session.is_busy());
}

#[tokio::test]
async fn blocked_answer_without_candidates_falls_back() {
    let server = start_gemini_mock().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    assert_eq!(advisor(&server).get_advice("hello").await, FALLBACK_ADVICE);
}

#[tokio::test]
async fn missing_key_answers_without_network() {
    let server = start_gemini_mock().await;
    mount_answer(&server, "should not be reached").await;

    let config = GeminiConfig {
        api_key: None,
        ..gemini_config(&server)
    };
    let mut session = AdvisorSession::new(advisor_with(config));
    session.submit("anything");
    session.wait_pending().await;

    assert_eq!(session.messages().last().map(|m| m.text.as_str()), Some(FALLBACK_ADVICE));
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn conversation_continues_after_a_failure() {
    let server = start_gemini_mock().await;
    let mut session = AdvisorSession::new(advisor(&server));

    mount_status(&server, 500, "boom").await;
    session.submit("first");
    session.wait_pending().await;
    assert_eq!(session.messages()[2].text, FALLBACK_ADVICE);

    server.reset().await;
    mount_answer(&server, "Use an authenticator app.").await;
    assert!(session.submit("second"));
    session.wait_pending().await;
    assert_eq!(session.messages().len(), 5);
    assert_eq!(session.messages()[4].text, "Use an authenticator app.");
}
