use crate::dispatch::{relay, server_id};
use crate::main_node::CommandPayload;
use crate::types::{Context, Error};

/// Return a random froge
#[poise::command(slash_command, guild_only)]
pub async fn froge(context: Context<'_>) -> Result<(), Error> {
    let payload = CommandPayload::for_server(server_id(context)?);
    relay(context, "froge", payload, std::convert::identity).await
}
