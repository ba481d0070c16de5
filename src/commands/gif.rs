use crate::dispatch::{relay, server_id};
use crate::main_node::CommandPayload;
use crate::types::{Context, Error};
use crate::utils::format::split_params;

/// Request a gif
#[poise::command(slash_command, guild_only)]
pub async fn gif(
    context: Context<'_>,
    #[description = "query to search"]
    #[min_length = 1]
    query: String,
) -> Result<(), Error> {
    let payload = CommandPayload::for_server(server_id(context)?)
        .with_params(split_params(&query));

    relay(context, "gif", payload, std::convert::identity).await
}
