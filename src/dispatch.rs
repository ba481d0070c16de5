//! Command dispatch.
//!
//! Every forwarding command follows the same flow: placeholder reply,
//! optional flag check, main node call, then the placeholder is edited with
//! the result.

use crate::error::{ArchyError, Result};
use crate::flags::CommandFlags;
use crate::main_node::{CommandPayload, MainNodeClient};
use crate::response::CommandResponse;
use crate::types::{Context, Error};
use poise::CreateReply;
use tracing::{error, info, warn};

/// Placeholder shown while the main node works.
pub const LOADING_MESSAGE: &str = "Loading...";

/// Reply when a server has not enabled a command.
pub const DISABLED_MESSAGE: &str = "❌ This command is not enabled on this server.";

/// Id of the guild the command runs in, as a string.
pub fn server_id(context: Context<'_>) -> std::result::Result<String, Error> {
    context
        .guild_id()
        .map(|id| id.to_string())
        .ok_or_else(|| "This command can only be used in a server.".into())
}

/// Call the main node and decode its answer.
///
/// `decorate` rewrites the raw text before it is classified.
pub async fn process<F>(
    main_node: &MainNodeClient,
    command_name: &str,
    payload: &CommandPayload,
    decorate: F,
) -> Result<CommandResponse>
where
    F: FnOnce(String) -> String,
{
    let raw = main_node.treat_command(command_name, payload).await?;
    CommandResponse::parse(decorate(raw))
}

/// Result of dispatching one command.
#[derive(Debug)]
pub enum Outcome {
    /// The server has not enabled the command; the main node was not called.
    Disabled,
    /// The main node answered.
    Replied(CommandResponse),
    /// The main node call or the decoding failed.
    Failed(ArchyError),
}

impl Outcome {
    /// Reply that replaces the loading placeholder.
    pub fn into_reply(self) -> CreateReply {
        match self {
            Self::Disabled => CreateReply::default().content(DISABLED_MESSAGE),
            Self::Replied(response) => response.into_reply(),
            Self::Failed(e) => CreateReply::default().content(failure_message(&e)),
        }
    }
}

/// Short line shown to the user when a command fails. Details go to the logs.
pub fn failure_message(error: &ArchyError) -> String {
    match error {
        ArchyError::MainNode(_) => "❌ The command could not be processed. Please try again later.",
        ArchyError::Network(_) => "❌ The command service is unreachable right now. Please try again later.",
        ArchyError::Decode(_) => "❌ The command returned a response that could not be displayed.",
        _ => "❌ Something went wrong while running this command.",
    }
    .to_string()
}

/// Whether the command may run. Always true when flags are not enforced or
/// outside a server; a failed lookup counts as disabled.
pub async fn is_enabled(
    flags: &CommandFlags,
    enforce: bool,
    server_id: Option<&str>,
    command_name: &str,
) -> bool {
    let (true, Some(server_id)) = (enforce, server_id) else {
        return true;
    };

    match flags.is_active_command(server_id, command_name).await {
        Ok(true) => true,
        Ok(false) => {
            info!(command = command_name, server_id, "command disabled");
            false
        }
        Err(e) => {
            error!(command = command_name, server_id, "flag lookup failed: {}", e);
            false
        }
    }
}

/// Run a command end to end without touching Discord: flag check, main node
/// call, and usage count after a successful answer.
pub async fn dispatch<F>(
    main_node: &MainNodeClient,
    flags: &CommandFlags,
    enforce: bool,
    server_id: Option<&str>,
    command_name: &str,
    payload: &CommandPayload,
    decorate: F,
) -> Outcome
where
    F: FnOnce(String) -> String,
{
    if !is_enabled(flags, enforce, server_id, command_name).await {
        return Outcome::Disabled;
    }

    let response = match process(main_node, command_name, payload, decorate).await {
        Ok(response) => response,
        Err(e) => {
            error!(command = command_name, "command failed: {}", e);
            return Outcome::Failed(e);
        }
    };

    if let (true, Some(server_id)) = (enforce, server_id) {
        // Counting is best effort; the user already has their answer.
        if let Err(e) = flags.increment_command_count(server_id, command_name).await {
            warn!(command = command_name, server_id, "failed to increment usage count: {}", e);
        }
    }

    Outcome::Replied(response)
}

/// Forward a command to the main node and relay its answer in place of a
/// loading placeholder.
///
/// The placeholder goes out first so the interaction is acknowledged before
/// any remote call.
pub async fn relay<F>(
    context: Context<'_>,
    command_name: &str,
    payload: CommandPayload,
    decorate: F,
) -> std::result::Result<(), Error>
where
    F: FnOnce(String) -> String + Send,
{
    let handle = context.say(LOADING_MESSAGE).await?;

    let data = context.data();
    let server_id = context.guild_id().map(|id| id.to_string());

    let outcome = dispatch(
        &data.main_node,
        &data.flags,
        data.enforce_command_flags,
        server_id.as_deref(),
        command_name,
        &payload,
        decorate,
    )
    .await;

    handle.edit(context, outcome.into_reply()).await?;
    Ok(())
}
