//! Stream engine configuration.
//!
//! The engine has no configuration surface of its own; the embedding
//! application builds a [`StreamConfig`] directly or from the environment.

use crate::traits::Headers;

/// Environment variable overriding [`StreamConfig::base_url`]
pub const BASE_URL_ENV: &str = "CONVO_STREAM_BASE_URL";

/// Environment variable providing [`StreamConfig::auth_token`]
pub const AUTH_TOKEN_ENV: &str = "CONVO_STREAM_AUTH_TOKEN";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_PLACEHOLDER: &str = "Je n'ai pas pu générer de réponse.";
const DEFAULT_FAILURE_TITLE: &str = "Erreur";

/// Configuration for a stream orchestrator.
///
/// Use the builder pattern to customize behavior.
///
/// # Example
///
/// ```ignore
/// use convo_stream::config::StreamConfig;
///
/// let config = StreamConfig::default()
///     .with_base_url("https://coach.example.com/api")
///     .with_auth_token("secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Backend root, without trailing slash (default: http://localhost:8000)
    pub base_url: String,
    /// Bearer token sent with every stream request
    pub auth_token: Option<String>,
    /// Assistant text stored when a completed stream produced no chunk
    pub empty_response_placeholder: String,
    /// Title of the notification raised on failure
    pub failure_title: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            empty_response_placeholder: DEFAULT_PLACEHOLDER.to_string(),
            failure_title: DEFAULT_FAILURE_TITLE.to_string(),
        }
    }
}

impl StreamConfig {
    /// Create a new StreamConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the text used for an empty assistant reply.
    pub fn with_empty_response_placeholder(mut self, text: impl Into<String>) -> Self {
        self.empty_response_placeholder = text.into();
        self
    }

    /// Set the failure notification title.
    pub fn with_failure_title(mut self, title: impl Into<String>) -> Self {
        self.failure_title = title.into();
        self
    }

    /// Create config from `CONVO_STREAM_BASE_URL` and `CONVO_STREAM_AUTH_TOKEN`.
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = non_empty_env(BASE_URL_ENV) {
            config = config.with_base_url(url);
        }
        if let Some(token) = non_empty_env(AUTH_TOKEN_ENV) {
            config = config.with_auth_token(token);
        }
        config
    }

    /// Streaming endpoint for a conversation.
    pub fn stream_url(&self, conversation_id: &str) -> String {
        format!(
            "{}/conversations/{}/stream",
            self.base_url,
            urlencoding::encode(conversation_id)
        )
    }

    /// Headers sent with every stream request.
    pub fn request_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        if let Some(token) = &self.auth_token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
