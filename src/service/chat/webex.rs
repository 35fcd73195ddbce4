//! Webex REST implementation of the chat client.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::base::{
    config::Config,
    types::{ChatMessage, MessageBody, Person, Res, Void, WebhookSpec},
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the webex implementation.

impl ChatClient {
    /// Creates a new Webex chat client.
    pub fn webex(config: &Config) -> Res<Self> {
        let client = WebexChatClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Wire types.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMessageRequest<'a> {
    room_id: &'a str,
    #[serde(flatten)]
    body: &'a MessageBody,
}

#[derive(Deserialize)]
struct CreatedWebhook {
    id: String,
}

// Structs.

/// Webex client implementation.
#[derive(Clone)]
struct WebexChatClient {
    client: Client,
    base_url: String,
}

impl WebexChatClient {
    /// Create a new Webex chat client.
    #[instrument(name = "WebexChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.webex_access_token))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.webex_api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turns non-success statuses into errors that carry the response body.
async fn check(response: Response, action: &str) -> Res<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(anyhow::anyhow!("Failed to {}: {} {}", action, status, body))
}

#[async_trait]
impl GenericChatClient for WebexChatClient {
    #[instrument(skip(self))]
    async fn get_message(&self, message_id: &str) -> Res<ChatMessage> {
        let response = self.client.get(self.url(&format!("messages/{message_id}"))).send().await?;
        let message = check(response, "fetch message").await?.json::<ChatMessage>().await?;

        Ok(message)
    }

    #[instrument(skip(self))]
    async fn get_person(&self, person_id: &str) -> Res<Person> {
        let response = self.client.get(self.url(&format!("people/{person_id}"))).send().await?;
        let person = check(response, "fetch person").await?.json::<Person>().await?;

        Ok(person)
    }

    #[instrument(skip(self, body))]
    async fn send_message(&self, room_id: &str, body: &MessageBody) -> Void {
        let request = CreateMessageRequest { room_id, body };

        let response = self.client.post(self.url("messages")).json(&request).send().await?;
        check(response, "send message").await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_webhook(&self, webhook: &WebhookSpec) -> Res<String> {
        let response = self.client.post(self.url("webhooks")).json(webhook).send().await?;
        let created = check(response, "create webhook").await?.json::<CreatedWebhook>().await?;

        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn delete_webhook(&self, webhook_id: &str) -> Void {
        let response = self.client.delete(self.url(&format!("webhooks/{webhook_id}"))).send().await?;
        check(response, "delete webhook").await?;

        Ok(())
    }
}

// Tests.
