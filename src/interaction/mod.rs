//! Event handling and user interactions for groupbot.
//!
//! This module provides functionality for handling chat events:
//! - Parsing the command grammar addressed to the bot
//! - Running the command handlers against the group store
//! - Filtering and processing inbound webhook events

pub mod command;
pub mod handlers;
pub mod webhook_event;
