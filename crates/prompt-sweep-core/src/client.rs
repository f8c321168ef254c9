//! Chat-completion transform client.
//!
//! One request/response exchange per file against an OpenAI-compatible
//! `chat/completions` endpoint. No retries; a single attempt either yields
//! the first completion's text or a typed failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{SweepResult, TransformError};

/// Client-level timeout for a single exchange.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// The seam between the pipeline driver and the completion service.
///
/// Tests substitute stub implementations; production uses
/// [`CompletionClient`].
#[async_trait]
pub trait Transformer: Send + Sync {
    /// Perform one exchange and return the first completion's text.
    async fn transform(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, TransformError>;
}

/// Reqwest-backed [`Transformer`] speaking the OpenAI-compatible chat API.
pub struct CompletionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl CompletionClient {
    /// Build a client for `api_url`, authenticating with `api_key`.
    ///
    /// The credential is supplied exactly once here; the client never
    /// consults the process environment.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> SweepResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, TransformError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !self.api_key.is_empty() {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|err| TransformError::Request(format!("invalid api key header: {err}")))?;
            headers.insert(AUTHORIZATION, bearer);
        }
        Ok(headers)
    }
}

#[async_trait]
impl Transformer for CompletionClient {
    async fn transform(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, TransformError> {
        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
        });

        let response = self
            .http
            .post(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|err| TransformError::Request(format!("completion call failed: {err}")))?
            .error_for_status()
            .map_err(|err| TransformError::Request(format!("completion http error: {err}")))?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| TransformError::Request(format!("malformed completion response: {err}")))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(TransformError::EmptyResponse)?;

        debug!(
            model,
            chars = choice.message.content.len(),
            "completion_received"
        );
        Ok(choice.message.content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}
