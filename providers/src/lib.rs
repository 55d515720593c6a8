//! Advisory text service for the ShieldGuard security advisor.
//!
//! # Architecture
//!
//! - [`AdvisoryService`] - The contract the chat feature depends on: a prompt
//!   goes in, advice text comes out, and the call never fails.
//! - [`gemini`] - Google Gemini client (GenerateContent API) implementing it.
//!
//! # Error Handling
//!
//! Provider failures are modelled as [`AdvisoryError`] internally (see
//! [`GeminiAdvisor::generate`]) but never cross the [`AdvisoryService`]
//! boundary: every failure is logged and replaced with [`FALLBACK_ADVICE`].
//! No retries are attempted.
//!
//! # Configuration
//!
//! A missing API key is not an error at construction time. The advisor is
//! built anyway and every call degrades to the fallback string.

mod error;
pub mod gemini;

use std::future::Future;
use std::time::Duration;

pub use error::AdvisoryError;
pub use gemini::{GeminiAdvisor, GeminiConfig};
pub use shieldguard_types;

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Shown in place of advice whenever the remote call fails for any reason.
pub const FALLBACK_ADVICE: &str = "I'm currently having trouble connecting to the security mainframe. Please check your connection and try again.";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Produces advisory text for a free-text prompt.
///
/// Implementations must resolve on every input; failures are converted to a
/// user-visible fallback string rather than surfaced as errors.
pub trait AdvisoryService: Send + Sync + 'static {
    fn get_advice(&self, prompt: &str) -> impl Future<Output = String> + Send;
}

/// Hardened HTTP client used for outbound advice requests.
///
/// HTTPS only, no redirects, bounded connect time.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    use reqwest::header::{HeaderMap, HeaderValue};

    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        "x-goog-api-client",
        HeaderValue::from_static(concat!("shieldguard/", env!("CARGO_PKG_VERSION"))),
    );

    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .https_only(true)
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
        .build()
}

/// Read an error response body, truncating anything past 32 KiB.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
