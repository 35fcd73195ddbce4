//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for various services used by groupbot:
//! - Chat services (e.g., Webex)
//! - Group storage (e.g., a JSON file)
//! - The HTTP endpoint receiving webhook events
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod store;
pub mod webhook;
