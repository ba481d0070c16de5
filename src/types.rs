//! Type definitions and aliases for the bot.
//!
//! This module contains shared types used throughout the application.

use crate::flags::CommandFlags;
use crate::main_node::MainNodeClient;

/// Bot application data shared across all commands.
///
/// This data is accessible in all command handlers through the context.
pub struct Data {
    /// Client for the service that processes commands
    pub main_node: MainNodeClient,
    /// Per-server command flags stored in Firestore
    pub flags: CommandFlags,
    /// Whether the flag store gates command execution
    pub enforce_command_flags: bool,
}

/// Error type for bot commands (maintains compatibility with poise).
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type alias for easier usage.
pub type Context<'a> = poise::Context<'a, Data, Error>;
