//! Core components, types, and utilities for groupbot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Reply texts sent back to rooms.
//! - Common types and result handling.

pub mod config;
pub mod messages;
pub mod types;
