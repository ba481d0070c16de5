use crate::dispatch::{relay, server_id};
use crate::main_node::CommandPayload;
use crate::types::{Context, Error};

/// Template function in Java
#[poise::command(slash_command, guild_only)]
pub async fn java(context: Context<'_>) -> Result<(), Error> {
    let payload = CommandPayload::for_server(server_id(context)?);
    relay(context, "java", payload, std::convert::identity).await
}
