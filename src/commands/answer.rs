//! `answer` command.
//!
//! The reply repeats the question above the main node's answer.

use crate::dispatch::{relay, server_id};
use crate::main_node::CommandPayload;
use crate::types::{Context, Error};
use crate::utils::format::format_answer;

/// answers your question
#[poise::command(slash_command, guild_only)]
pub async fn answer(
    context: Context<'_>,
    #[description = "your question"]
    #[min_length = 1]
    question: String,
) -> Result<(), Error> {
    let payload = CommandPayload::for_server(server_id(context)?)
        .with_params(question.clone());

    relay(context, "answer", payload, move |answer| format_answer(&question, &answer)).await
}
