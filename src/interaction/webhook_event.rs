//! Handling of inbound webhook events.

use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, instrument, warn};

use crate::{
    base::{
        messages,
        types::{MessageBody, Void, WebhookEvent},
    },
    interaction::{command::CommandParser, handlers},
    service::{chat::ChatClient, store::GroupStore},
};

/// Handles a webhook event.
///
/// The event is processed on a new task; the returned handle resolves once it is done.
#[instrument(skip_all, fields(webhook_id = %event.id, message_id = %event.data.id))]
pub fn handle_webhook_event(event: WebhookEvent, webhook_id: String, store: GroupStore, chat: ChatClient, parser: CommandParser) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            // Process the event.
            let result = handle_webhook_event_internal(event, &webhook_id, &store, &chat, &parser).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling: {}", err);
            }
        }
        .in_current_span(),
    )
}

#[instrument(skip_all)]
async fn handle_webhook_event_internal(event: WebhookEvent, webhook_id: &str, store: &GroupStore, chat: &ChatClient, parser: &CommandParser) -> Void {
    // Events for any other webhook are stale registrations; remove them and stop.

    if event.id != webhook_id {
        warn!("Received an event for foreign webhook `{}`, removing it.", event.id);

        if let Err(err) = chat.delete_webhook(&event.id).await {
            warn!("Failed to remove foreign webhook `{}`: {}", event.id, err);
        }

        return Ok(());
    }

    let room_id = &event.data.room_id;
    store.ensure_room(room_id).await;

    // Fetch the full message, since the event only carries its ID.

    let message = chat.get_message(&event.data.id).await?;

    let Some(invocation) = parser.parse(&message.text) else {
        debug!("Message is not addressed to the bot.");
        return Ok(());
    };

    info!("Handling `{:?}` command ...", invocation.kind);

    if let Err(err) = handlers::execute(&invocation, &message, store, chat).await {
        // Let the room know, then surface the original error.
        if let Err(reply_err) = chat.send_message(&message.room_id, &MessageBody::Text(messages::failure(&message.text))).await {
            warn!("Failed to report the error to room `{}`: {}", message.room_id, reply_err);
        }

        return Err(err);
    }

    Ok(())
}
