//! HTTP endpoint that receives webhook events from the chat platform.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::{
    base::types::{Void, WebhookEvent},
    interaction,
    runtime::Runtime,
};

/// State shared with the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub runtime: Runtime,
    /// The ID of the webhook this process registered.
    pub webhook_id: Arc<str>,
}

pub fn router(state: WebhookState) -> Router {
    let path = state.runtime.config.webhook_path.clone();

    Router::new().route(&path, post(receive)).route("/health", get(health)).with_state(state)
}

/// Serves the webhook routes until Ctrl-C.
pub async fn serve(state: WebhookState) -> Void {
    let config = &state.runtime.config;
    let address = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!("Listening for webhook events on {}{}", address, config.webhook_path);

    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down ...");
}

/// Accepts an event and processes it in the background.
#[instrument(skip_all)]
async fn receive(State(state): State<WebhookState>, Json(event): Json<WebhookEvent>) -> StatusCode {
    let runtime = &state.runtime;

    interaction::webhook_event::handle_webhook_event(
        event,
        state.webhook_id.to_string(),
        runtime.store.clone(),
        runtime.chat.clone(),
        runtime.parser.clone(),
    );

    StatusCode::OK
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ready" }))
}

// Tests.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        base::{
            config::{Config, ConfigInner},
            types::{ChatMessage, MessageBody, Person, Res, WebhookSpec},
        },
        interaction::command::CommandParser,
        service::{
            chat::{ChatClient, GenericChatClient},
            store::{GroupStore, PersistenceClient, Registry, file::JsonFilePersistence},
        },
    };

    /// A chat client that never gets called in these tests.
    struct NoopChat;

    #[async_trait]
    impl GenericChatClient for NoopChat {
        async fn get_message(&self, _message_id: &str) -> Res<ChatMessage> {
            Err(anyhow::anyhow!("unreachable"))
        }

        async fn get_person(&self, _person_id: &str) -> Res<Person> {
            Err(anyhow::anyhow!("unreachable"))
        }

        async fn send_message(&self, _room_id: &str, _body: &MessageBody) -> Void {
            Ok(())
        }

        async fn create_webhook(&self, _webhook: &WebhookSpec) -> Res<String> {
            Ok("W1".to_string())
        }

        async fn delete_webhook(&self, _webhook_id: &str) -> Void {
            Ok(())
        }
    }

    fn state() -> WebhookState {
        let config = Config {
            inner: Arc::new(ConfigInner {
                webhook_path: "/webhook".to_string(),
                ..Default::default()
            }),
        };

        let persistence = PersistenceClient::new(Arc::new(JsonFilePersistence::new("unused.db")));

        WebhookState {
            runtime: Runtime {
                config,
                store: GroupStore::with_registry(Registry::default(), persistence),
                chat: ChatClient::new(Arc::new(NoopChat)),
                parser: CommandParser::new("Groupbot").unwrap(),
            },
            webhook_id: Arc::from("W1"),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(state()).oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_webhook_accepts_event() {
        let body = json!({ "id": "W2", "data": { "id": "M1", "roomId": "R1" } }).to_string();
        let request = Request::post("/webhook").header("content-type", "application/json").body(Body::from(body)).unwrap();

        let response = router(state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_webhook_rejects_malformed_body() {
        let request = Request::post("/webhook").header("content-type", "application/json").body(Body::from("{\"id\": 1}")).unwrap();

        let response = router(state()).oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
    }
}
