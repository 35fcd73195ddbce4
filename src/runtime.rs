//! Runtime services and shared state for groupbot.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    base::{
        config::Config,
        types::{Res, Void, WebhookSpec},
    },
    interaction::command::CommandParser,
    service::{
        chat::ChatClient,
        store::{GroupStore, PersistenceClient},
        webhook::{self, WebhookState},
    },
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the group store, chat client, command parser, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The group store instance.
    pub store: GroupStore,
    /// The chat client instance.
    pub chat: ChatClient,
    /// The parser for messages addressed to the bot.
    pub parser: CommandParser,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Load the store; a missing or broken file starts it empty.
        let store = GroupStore::load(PersistenceClient::json_file(&config.store_path)).await;

        // Initialize the chat client.
        let chat = ChatClient::webex(&config)?;

        let parser = CommandParser::new(&config.bot_name)?;

        Ok(Self { config, store, chat, parser })
    }

    /// Registers the webhook and serves events until shutdown.
    ///
    /// A failed registration is fatal. On shutdown, the webhook is removed again.
    pub async fn start(&self) -> Void {
        let webhook_id = self.register_webhook().await?;

        let result = webhook::serve(WebhookState {
            runtime: self.clone(),
            webhook_id: Arc::from(webhook_id.as_str()),
        })
        .await;

        if let Err(err) = self.chat.delete_webhook(&webhook_id).await {
            warn!("Failed to remove webhook `{}`: {}", webhook_id, err);
        }

        result
    }

    #[instrument(skip(self))]
    async fn register_webhook(&self) -> Res<String> {
        let spec = WebhookSpec::message_created(&self.config.webhook_name, &self.config.webhook_target_url);
        let webhook_id = self.chat.create_webhook(&spec).await?;

        info!("Webhook `{}` attached.", webhook_id);

        Ok(webhook_id)
    }
}
