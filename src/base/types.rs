use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// The envelope the chat platform posts to the webhook endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookEvent {
    /// The ID of the webhook that fired.
    pub id: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventData {
    /// The ID of the message that was created.
    pub id: String,
    pub room_id: String,
}

/// A full message record, as fetched from the chat platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub room_id: String,
    #[serde(default)]
    pub text: String,
    /// People @-mentioned in the message, in order. The bot itself comes first when it is addressed.
    #[serde(default)]
    pub mentioned_people: Vec<String>,
}

/// A person record.
///
/// Everything beyond `id` and `displayName` is kept verbatim in `extra`, so the full
/// record round-trips through the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Person {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            extra: Map::new(),
        }
    }
}

/// The body of an outbound message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageBody {
    Text(String),
    Markdown(String),
}

impl MessageBody {
    pub fn content(&self) -> &str {
        match self {
            MessageBody::Text(s) | MessageBody::Markdown(s) => s,
        }
    }
}

/// A webhook registration request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSpec {
    pub name: String,
    pub target_url: String,
    pub resource: String,
    pub event: String,
}

impl WebhookSpec {
    /// A webhook that fires whenever a message is created.
    pub fn message_created(name: &str, target_url: &str) -> Self {
        Self {
            name: name.to_string(),
            target_url: target_url.to_string(),
            resource: "messages".to_string(),
            event: "created".to_string(),
        }
    }
}
