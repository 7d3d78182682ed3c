use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix marking client-generated message ids that have not been persisted.
pub const PROVISIONAL_ID_PREFIX: &str = "temp-";

/// Key a final payload must carry to be attached to the assistant message.
const RECOMMENDATIONS_KEY: &str = "recommended_sessions";

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Structured recommendation data delivered by a `json` frame.
///
/// The value is kept verbatim; only its outer shape is checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RecommendationPayload(serde_json::Value);

impl RecommendationPayload {
    /// Decode the JSON text carried by a final-payload frame.
    ///
    /// Returns `None` when the text is not valid JSON or is not an object
    /// holding a `recommended_sessions` member.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        Self::from_value(value)
    }

    /// Accept an already decoded value if it has the expected shape.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        if value.get(RECOMMENDATIONS_KEY).is_some() {
            Some(Self(value))
        } else {
            None
        }
    }

    /// The `recommended_sessions` member.
    pub fn recommended_sessions(&self) -> &serde_json::Value {
        &self.0[RECOMMENDATIONS_KEY]
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// A single message in a cached conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Backend id, or a `temp-` prefixed id for provisional messages
    pub id: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content of the message
    pub content: String,
    /// When the message was created
    pub created_at: DateTime<Utc>,
    /// Recommendations attached to an assistant reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<RecommendationPayload>,
    /// Model that produced an assistant reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Message {
    /// Create a durable-shaped message with a fresh id.
    pub fn new(role: MessageRole, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at,
            recommendations: None,
            model: None,
        }
    }

    /// Create a provisional message whose id carries [`PROVISIONAL_ID_PREFIX`].
    pub fn provisional(
        role: MessageRole,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("{}{}", PROVISIONAL_ID_PREFIX, Uuid::new_v4()),
            ..Self::new(role, content, created_at)
        }
    }

    /// Attach a recommendation payload (builder pattern)
    pub fn with_recommendations(mut self, recommendations: Option<RecommendationPayload>) -> Self {
        self.recommendations = recommendations;
        self
    }

    /// Set the model name (builder pattern)
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Whether this message was generated client-side and is not yet durable.
    pub fn is_provisional(&self) -> bool {
        self.id.starts_with(PROVISIONAL_ID_PREFIX)
    }
}
