//! Level command.
//!
//! The main node may answer with a rendered level card (PNG) instead of text.

use crate::dispatch::{relay, server_id};
use crate::main_node::CommandPayload;
use crate::types::{Context, Error};
use poise::serenity_prelude as serenity;

/// Show your level
#[poise::command(slash_command, guild_only)]
pub async fn level(
    context: Context<'_>,
    #[description = "wanna check someone else's?"]
    mention: Option<serenity::User>,
) -> Result<(), Error> {
    // Read the name from cache without holding the guild reference across awaits
    let server_name = context
        .guild()
        .map(|guild| guild.name.clone())
        .unwrap_or_default();

    let mut payload = CommandPayload::for_server(server_id(context)?)
        .with_server_name(server_name)
        .with_user_id(context.author().id);

    if let Some(user) = mention {
        payload = payload.with_mention(user.id);
    }

    relay(context, "level", payload, std::convert::identity).await
}
