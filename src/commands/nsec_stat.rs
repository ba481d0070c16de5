//! Challenge statistics for the NorthSec guild.

use crate::types::{Context, Error};
use crate::utils::format::format_challenge_stats;
use poise::CreateReply;

/// Guild hosting the challenge.
const NSEC_GUILD_ID: u64 = 909917470507286568;

/// Nsec stats
#[poise::command(slash_command, guild_only)]
pub async fn nsec_stat(context: Context<'_>) -> Result<(), Error> {
    if context.guild_id().map(|id| id.get()) != Some(NSEC_GUILD_ID) {
        context
            .send(
                CreateReply::default()
                    .content("❌ This command is not available in this server.")
                    .ephemeral(true),
            )
            .await?;
        return Ok(());
    }

    context.defer().await?;

    match context.data().flags.challenge_requesters().await {
        Ok(user_ids) => {
            for message in format_challenge_stats(&user_ids) {
                context.say(message).await?;
            }
        }
        Err(e) => {
            tracing::error!("failed to list challenge requests: {}", e);
            context
                .say(format!("❌ Failed to read challenge statistics: {}", e))
                .await?;
        }
    }

    Ok(())
}
