//! OpenAI-compatible chat completion provider.

use std::env;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::AnnotationProvider;
use super::prompt::AnnotationRequest;
use crate::error::ProviderError;
use crate::model::DefinitionRecord;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Endpoint settings for the chat completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub api_url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_API_URL` and `DOCGEN_MODEL`.
    ///
    /// Returns `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("OPENAI_API_KEY").ok().filter(|key| !key.trim().is_empty())?;
        let mut config = Self::new(api_key);
        if let Ok(url) = env::var("OPENAI_API_URL") {
            config.api_url = url;
        }
        if let Ok(model) = env::var("DOCGEN_MODEL") {
            config.model = model;
        }
        Some(config)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Blocking chat completion client
pub struct OpenAiProvider {
    config: ProviderConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Send one request and return the generated text
    pub fn complete(&self, request: &AnnotationRequest) -> Result<String, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|_| ProviderError::Auth {
                status: 0,
                body: "api key is not a valid header value".to_string(),
            })?;
        headers.insert(AUTHORIZATION, bearer);

        let body = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.source},
            ],
        });

        let response = self
            .client
            .post(self.config.completions_url())
            .headers(headers)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        check_status(status, &text)?;

        let content = parse_completion(&text)?;
        debug!(model = %self.config.model, chars = content.len(), "completion received");
        Ok(content)
    }
}

impl AnnotationProvider for OpenAiProvider {
    fn docstring(&self, record: &DefinitionRecord) -> Result<String, ProviderError> {
        let request = AnnotationRequest::for_record(record)?;
        self.complete(&request)
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), ProviderError> {
    if status.is_success() {
        return Ok(());
    }
    let code = status.as_u16();
    let body = body.trim().to_string();
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth { status: code, body },
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited { status: code, body },
        _ => ProviderError::Status { status: code, body },
    })
}

/// Pull the first choice's message out of a chat completion body
fn parse_completion(body: &str) -> Result<String, ProviderError> {
    let completion: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::MalformedResponse("response has no message content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnclosingClass;
    use std::path::PathBuf;

    #[test]
    fn test_parse_completion() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Adds two numbers.\n\n:param a: first"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Adds two numbers.\n\n:param a: first");
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let err = parse_completion(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_completion_null_content() {
        let err = parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_completion_not_json() {
        let err = parse_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_status_mapping() {
        assert!(check_status(StatusCode::OK, "").is_ok());
        assert!(matches!(
            check_status(StatusCode::UNAUTHORIZED, "bad key"),
            Err(ProviderError::Auth { status: 401, .. })
        ));
        assert!(matches!(
            check_status(StatusCode::TOO_MANY_REQUESTS, ""),
            Err(ProviderError::RateLimited { status: 429, .. })
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY, ""),
            Err(ProviderError::Status { status: 502, .. })
        ));
    }

    #[test]
    fn test_completions_url() {
        let mut config = ProviderConfig::new("key");
        config.api_url = "http://localhost:11434/v1/".to_string();
        assert_eq!(config.completions_url(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_config_never_serializes_key() {
        let config = ProviderConfig::new("secret-value");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-value"));
        assert!(json.contains(DEFAULT_MODEL));
    }

    #[test]
    fn test_missing_class_fails_before_request() {
        let provider = OpenAiProvider::new(ProviderConfig::new("unused")).unwrap();
        let record = DefinitionRecord {
            enclosing_class: EnclosingClass::None,
            code: "def __init__(self):\n    pass".to_string(),
            name: "__init__".to_string(),
            filepath: PathBuf::from("m.py"),
            line: 0,
        };
        let err = provider.docstring(&record).unwrap_err();
        assert!(matches!(err, ProviderError::MissingClassContext { .. }));
    }

    #[test]
    #[ignore = "requires OPENAI_API_KEY"]
    fn test_live_completion() {
        let config = ProviderConfig::from_env().expect("OPENAI_API_KEY not set");
        let provider = OpenAiProvider::new(config).unwrap();
        let record = DefinitionRecord {
            enclosing_class: EnclosingClass::None,
            code: "def add(a, b=1):\n    return a + b".to_string(),
            name: "add".to_string(),
            filepath: PathBuf::from("m.py"),
            line: 0,
        };
        let text = provider.docstring(&record).unwrap();
        assert!(text.contains(":param"));
    }
}
