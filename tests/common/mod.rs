//! Shared fixtures: a wiremock stand-in for the Gemini API and config files
//! on disk.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use shieldguard_engine::{GeminiAdvisor, GeminiConfig};
use shieldguard_types::ApiKey;
use wiremock::matchers::{header, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "integration-key";

/// Body of a successful GenerateContent response carrying `text`.
pub fn gemini_answer(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

pub async fn start_gemini_mock() -> MockServer {
    MockServer::start().await
}

/// Answer every authenticated GenerateContent call with `text`.
pub async fn mount_answer(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path_regex(r":generateContent$"))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer(text)))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub fn gemini_config(server: &MockServer) -> GeminiConfig {
    GeminiConfig {
        api_key: ApiKey::new(TEST_API_KEY),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        ..GeminiConfig::default()
    }
}

/// The production client is HTTPS-only, so tests talk to wiremock with a
/// plain one.
pub fn advisor(server: &MockServer) -> GeminiAdvisor {
    GeminiAdvisor::with_client(gemini_config(server), reqwest_client())
}

pub fn advisor_with(config: GeminiConfig) -> GeminiAdvisor {
    GeminiAdvisor::with_client(config, reqwest_client())
}

fn reqwest_client() -> Client {
    Client::new()
}

pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).expect("write config");
    path
}
