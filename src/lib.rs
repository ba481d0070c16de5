//! Archy library.
//!
//! This library provides the Archy Discord front-end: slash commands that are
//! forwarded to the main node, response relaying, and the per-server command
//! flags kept in Firestore.

pub mod bot;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod firestore;
pub mod flags;
pub mod main_node;
pub mod response;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{ArchyError, Result};
