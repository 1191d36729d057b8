//! triagem-app library root.
//!
//! Presenters and configuration behind the `triagem` binary, exposed so that
//! integration tests can drive the screens without a terminal.

pub mod aws;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod intake;
pub mod messages;
pub mod notice;
pub mod queue;
pub mod render;
pub mod selection;
pub mod state;
