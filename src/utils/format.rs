//! Text formatting helpers for command payloads and replies.

/// Render the whitespace-separated words of `query` as a bracketed,
/// single-quoted list, the format the main node parses `params` with.
///
/// Single spaces are the separator, so consecutive spaces produce empty
/// entries.
///
/// # Examples
///
/// ```
/// use archy::utils::format::split_params;
///
/// assert_eq!(split_params("dancing cat"), "['dancing', 'cat']");
/// assert_eq!(split_params("404"), "['404']");
/// ```
pub fn split_params(query: &str) -> String {
    let words: Vec<String> = query.split(' ').map(quote).collect();
    format!("[{}]", words.join(", "))
}

/// Quote one list entry, switching to double quotes when the entry contains
/// a single quote.
fn quote(word: &str) -> String {
    let escaped = word.replace('\\', "\\\\");
    if word.contains('\'') && !word.contains('"') {
        format!("\"{}\"", escaped)
    } else {
        format!("'{}'", escaped.replace('\'', "\\'"))
    }
}

/// Reply of the `answer` command.
pub fn format_answer(question: &str, answer: &str) -> String {
    format!("Question: {}\nAnswer: {}", question, answer)
}

/// Longest message Discord accepts, in characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Summary of the users who requested a challenge instance, one mention per
/// line, split into messages that each fit in [`DISCORD_MESSAGE_LIMIT`].
pub fn format_challenge_stats(user_ids: &[String]) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current = format!(
        "Number of user that asked Archy for an instance: {}\n",
        user_ids.len()
    );

    for id in user_ids {
        let line = format!("- <@{}>\n", id);
        if current.chars().count() + line.chars().count() > DISCORD_MESSAGE_LIMIT {
            messages.push(std::mem::take(&mut current));
        }
        current.push_str(&line);
    }

    messages.push(current);
    messages
}
