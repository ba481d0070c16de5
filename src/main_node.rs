//! Main node integration.
//!
//! The main node is the external service that actually processes commands.
//! The bot only packages a few fields into a [`CommandPayload`] and relays
//! whatever text the main node answers.

use crate::error::{ArchyError, Result};
use serde::Serialize;
use std::time::Duration;

/// Fields sent to the main node alongside the command name.
///
/// Unset fields are left out of the JSON body entirely.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<String>,
}

impl CommandPayload {
    /// Payload scoped to a server, the field every command sends.
    pub fn for_server(server_id: impl ToString) -> Self {
        Self {
            server_id: Some(server_id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = Some(name.into());
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl ToString) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn with_mention(mut self, user_id: impl ToString) -> Self {
        self.mentions.push(user_id.to_string());
        self
    }
}

/// Longest slice of an error body kept in [`ArchyError::MainNode`].
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Cut an error body down to [`MAX_ERROR_BODY_CHARS`] characters.
fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((end, _)) => format!("{}…", &body[..end]),
        None => body.to_string(),
    }
}

#[derive(Serialize)]
struct TreatCommandRequest<'a> {
    command: &'a str,
    data: &'a CommandPayload,
}

/// HTTP client for the main node.
#[derive(Debug, Clone)]
pub struct MainNodeClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl MainNodeClient {
    /// Create a client posting to `url`. Each call is bounded by `timeout`.
    pub fn new(http: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            url: url.into(),
            timeout,
        }
    }

    /// Ask the main node to process `command_name` and return its reply text.
    ///
    /// # Errors
    ///
    /// Returns [`ArchyError::Network`] if the main node cannot be reached and
    /// [`ArchyError::MainNode`] if it answers with a non-success status.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use archy::main_node::{CommandPayload, MainNodeClient};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = MainNodeClient::new(
    ///     reqwest::Client::new(),
    ///     "https://main-node.example.com/treat_command",
    ///     Duration::from_secs(60),
    /// );
    /// let reply = client.treat_command("froge", &CommandPayload::for_server("42")).await?;
    /// println!("{}", reply);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn treat_command(&self, command_name: &str, payload: &CommandPayload) -> Result<String> {
        let body = TreatCommandRequest {
            command: command_name,
            data: payload,
        };

        let resp = self
            .http
            .post(&self.url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if status.is_success() {
            Ok(text)
        } else {
            tracing::warn!(command = command_name, %status, "main node rejected command");
            Err(ArchyError::MainNode(format!(
                "{} returned {}: {}",
                command_name,
                status,
                truncate_body(&text)
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::Server) -> MainNodeClient {
        MainNodeClient::new(
            reqwest::Client::new(),
            format!("{}/treat_command", server.url()),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_payload_omits_unset_fields() {
        let payload = CommandPayload::for_server(42u64);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "server_id": "42" })
        );
    }

    #[test]
    fn test_payload_full() {
        let payload = CommandPayload::for_server("42")
            .with_server_name("Guild")
            .with_user_id(7u64)
            .with_mention(8u64);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "server_id": "42",
                "server_name": "Guild",
                "user_id": "7",
                "mentions": ["8"]
            })
        );
    }

    #[tokio::test]
    async fn test_treat_command_sends_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/treat_command")
            .match_body(Matcher::Json(json!({
                "command": "go",
                "data": { "server_id": "42", "channel_id": "Slash_Command" }
            })))
            .with_status(200)
            .with_body("Let's go!")
            .create_async()
            .await;

        let payload = CommandPayload::for_server("42").with_channel_id("Slash_Command");
        let reply = client(&server).treat_command("go", &payload).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "Let's go!");
    }

    #[tokio::test]
    async fn test_treat_command_relays_body_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let body = "data:image/png;base64,iVBORw0KGgo=";
        server
            .mock("POST", "/treat_command")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let reply = client(&server)
            .treat_command("level", &CommandPayload::for_server("42"))
            .await
            .unwrap();
        assert_eq!(reply, body);
    }

    #[tokio::test]
    async fn test_treat_command_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/treat_command")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let result = client(&server)
            .treat_command("leaderboard", &CommandPayload::for_server("42"))
            .await;
        match result {
            Err(ArchyError::MainNode(msg)) => {
                assert!(msg.contains("leaderboard"));
                assert!(msg.contains("boom"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_treat_command_error_body_is_truncated() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/treat_command")
            .with_status(502)
            .with_body("<html>".repeat(500))
            .create_async()
            .await;

        let err = client(&server)
            .treat_command("go", &CommandPayload::for_server("42"))
            .await
            .unwrap_err();
        assert!(err.to_string().chars().count() < 400);
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("  short  "), "short");
        let long = "é".repeat(MAX_ERROR_BODY_CHARS + 10);
        let cut = truncate_body(&long);
        assert_eq!(cut.chars().count(), MAX_ERROR_BODY_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[tokio::test]
    async fn test_treat_command_unreachable() {
        let client = MainNodeClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/treat_command",
            Duration::from_secs(2),
        );
        let result = client.treat_command("go", &CommandPayload::default()).await;
        assert!(matches!(result, Err(ArchyError::Network(_))));
    }
}
