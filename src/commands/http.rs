//! HTTP status command.

use crate::dispatch::{relay, server_id};
use crate::main_node::CommandPayload;
use crate::types::{Context, Error};
use crate::utils::format::split_params;

/// You give me a HTTP code, I give you something nice in return
#[poise::command(slash_command, guild_only)]
pub async fn http(
    context: Context<'_>,
    #[description = "HTTP code"]
    #[min = 100]
    #[max = 599]
    code: i64,
) -> Result<(), Error> {
    let payload = CommandPayload::for_server(server_id(context)?)
        .with_params(split_params(&code.to_string()));

    relay(context, "http", payload, std::convert::identity).await
}
