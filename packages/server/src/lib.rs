//! Yorisoi peer support chat relay.
//!
//! Room-scoped WebSocket relay that screens every chat message for crisis
//! signals and answers at-risk authors privately with support resources.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
