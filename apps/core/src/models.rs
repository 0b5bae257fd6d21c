use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single entry in the disease knowledge table.
///
/// Loaded once at startup and shared read-only across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// The authoritative name of the disease, exactly as stored in the table.
    pub name: String,
    /// Human-readable description of the disease.
    pub description: String,
    /// Ordered list of 0-4 precaution strings, already capitalized for display.
    pub precautions: Vec<String>,
}

/// A single disease prediction from the symptom classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// The predicted disease class label.
    pub disease: String,
    /// Confidence score in (0, 1].
    pub confidence: f64,
}

/// Inbound chat request payload.
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    /// The user's message. Blank messages get a canned reply without running
    /// the pipeline; overly long ones are rejected up front.
    #[validate(length(max = 4000, message = "message too long (max 4000 characters)"))]
    pub message: String,
    /// Existing session to append to; a new one is created when absent.
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// Outbound chat response payload.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The assistant's display text.
    pub response: String,
    /// The session this exchange was recorded under.
    pub session_id: Uuid,
}

/// A single message within an ephemeral chat session.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// The role of the message sender ("user" or "assistant").
    pub role: String,
    /// The text content of the message.
    pub content: String,
    /// When the message was recorded.
    pub created_at: DateTime<Utc>,
}

/// Liveness and component-availability report served at `/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Whether the disease knowledge table loaded at startup.
    pub knowledge_loaded: bool,
    /// Number of diseases in the knowledge table.
    pub diseases: usize,
    /// Whether the classifier artifact loaded at startup.
    pub model_loaded: bool,
}
