//! `go` command.

use crate::dispatch::{relay, server_id};
use crate::main_node::CommandPayload;
use crate::types::{Context, Error};

/// Channel id sent for invocations that come from a slash command rather than a message.
const SLASH_COMMAND_CHANNEL: &str = "Slash_Command";

/// go
#[poise::command(slash_command, guild_only)]
pub async fn go(context: Context<'_>) -> Result<(), Error> {
    let payload = CommandPayload::for_server(server_id(context)?)
        .with_channel_id(SLASH_COMMAND_CHANNEL);

    relay(context, "go", payload, std::convert::identity).await
}
