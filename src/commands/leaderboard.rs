use crate::dispatch::{relay, server_id};
use crate::main_node::CommandPayload;
use crate::types::{Context, Error};

/// Return the leaderboard
#[poise::command(slash_command, guild_only)]
pub async fn leaderboard(context: Context<'_>) -> Result<(), Error> {
    let payload = CommandPayload::for_server(server_id(context)?);
    relay(context, "leaderboard", payload, std::convert::identity).await
}
