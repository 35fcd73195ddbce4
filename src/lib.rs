//! Library root for `groupbot`.
//!
//! Groupbot is a Webex bot that maintains per-room groups of people, designed to:
//! - Create and delete named groups in a room
//! - Add and remove the people @-mentioned in a command
//! - Tag every member of a group with a single command
//!
//! The bot receives message webhooks over HTTP, keeps its groups in memory, and
//! persists them to a JSON file after every change. The architecture is built around
//! extensible traits that allow for different implementations of each service.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the groupbot runtime:
/// - Loads the group store
/// - Creates the runtime context with the store and chat client
/// - Registers the webhook and serves events until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting groupbot ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
