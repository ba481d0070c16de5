use crate::dispatch::{relay, server_id};
use crate::main_node::CommandPayload;
use crate::types::{Context, Error};

/// Hello! :)
#[poise::command(slash_command, guild_only)]
pub async fn hello(context: Context<'_>) -> Result<(), Error> {
    let payload = CommandPayload::for_server(server_id(context)?)
        .with_user_id(context.author().id);

    relay(context, "hello", payload, std::convert::identity).await
}
