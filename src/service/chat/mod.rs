//! Chat service integration for groupbot.
//!
//! This module provides functionality for interacting with chat platforms like Webex:
//! - Fetching messages and people
//! - Sending messages
//! - Registering and removing webhooks
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a default implementation for Webex.

pub mod webex;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{ChatMessage, MessageBody, Person, Res, Void, WebhookSpec};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms.
/// Implementing this trait allows different chat services to be used with groupbot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Fetch the full message record by its ID.
    ///
    /// Webhook events only carry the message ID, so the text and mentions
    /// have to be fetched separately.
    async fn get_message(&self, message_id: &str) -> Res<ChatMessage>;

    /// Fetch a person record by its ID.
    async fn get_person(&self, person_id: &str) -> Res<Person>;

    /// Send a text or markdown message to a room.
    async fn send_message(&self, room_id: &str, body: &MessageBody) -> Void;

    /// Register a webhook and return its ID.
    async fn create_webhook(&self, webhook: &WebhookSpec) -> Res<String>;

    /// Remove a webhook by its ID.
    async fn delete_webhook(&self, webhook_id: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }

    /// Send a plain text reply.
    pub async fn send_text(&self, room_id: &str, text: impl Into<String>) -> Void {
        self.send_message(room_id, &MessageBody::Text(text.into())).await
    }

    /// Send a markdown reply.
    pub async fn send_markdown(&self, room_id: &str, markdown: impl Into<String>) -> Void {
        self.send_message(room_id, &MessageBody::Markdown(markdown.into())).await
    }
}
