use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::RemoteError;
use crate::config::ClassifierConfig;

/// Synchronous classifier call abstraction (allows mocking).
pub trait ClassifierClient {
    /// One blocking request: system instruction + user message in, the
    /// model's single text payload out.
    fn classify(&self, system: &str, user: &str) -> Result<String, RemoteError>;
}

/// HTTP client for an Ollama-compatible generate endpoint.
pub struct HttpClassifierClient {
    base_url: String,
    model: String,
    max_tokens: u32,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpClassifierClient {
    pub fn new(config: &ClassifierConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            client,
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Request body for the generate endpoint
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

/// Response body from the generate endpoint
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl ClassifierClient for HttpClassifierClient {
    fn classify(&self, system: &str, user: &str) -> Result<String, RemoteError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt: user,
            system,
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                num_predict: self.max_tokens,
            },
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                RemoteError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                RemoteError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                RemoteError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| RemoteError::ResponseDecoding(e.to_string()))?;

        Ok(parsed.response)
    }
}

/// Process-wide classifier handle. Constructed once on first use and shared
/// for the life of the process; the client is stateless, so there is no
/// teardown; it lives until exit.
static SHARED_CLIENT: OnceCell<HttpClassifierClient> = OnceCell::new();

pub fn shared_client(config: &ClassifierConfig) -> &'static HttpClassifierClient {
    SHARED_CLIENT.get_or_init(|| HttpClassifierClient::new(config))
}

/// Mock classifier for testing. Returns a configured response, or a
/// configured failure when constructed with `failing`.
pub struct MockClassifierClient {
    response: Option<String>,
}

impl MockClassifierClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

impl ClassifierClient for MockClassifierClient {
    fn classify(&self, _system: &str, _user: &str) -> Result<String, RemoteError> {
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(RemoteError::HttpClient("mock classifier failure".to_string())),
        }
    }
}
