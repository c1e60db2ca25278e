use crate::config::Config;
use crate::error::{Result, SnapshellError};
use crate::llm::{CompletionClient, Message};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct APIClient {
    client: Client,
    llm_host: String,
    llm_model: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    stream: bool,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl APIClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SnapshellError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(APIClient {
            client,
            llm_host: config.llm_host.trim_end_matches('/').to_string(),
            llm_model: config.llm_model.clone(),
            api_key: config.api_key.clone(),
            timeout: config.request_timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.llm_host)
    }

    fn transport_error(&self, err: reqwest::Error) -> SnapshellError {
        if err.is_timeout() {
            SnapshellError::CompletionUnavailable(format!(
                "request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else {
            SnapshellError::CompletionUnavailable(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionClient for APIClient {
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SnapshellError::CredentialMissing)?;

        let request = ChatRequest {
            model: &self.llm_model,
            messages,
            temperature: 0.0,
            stream: false,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(
            "POST {} model={} messages={}",
            self.endpoint(),
            self.llm_model,
            messages.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SnapshellError::CompletionUnavailable(format!(
                "HTTP {}: {}",
                status,
                body.trim()
            )));
        }

        let response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| self.transport_error(e))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                SnapshellError::CompletionUnavailable("response contained no choices".to_string())
            })
    }
}
