//! Per-server command flags.
//!
//! Each server owns a `servers/{server_id}/functions/{command}` document with an
//! `active` boolean and a `count` usage counter. This repository wraps the
//! reads and writes the bot performs on those documents.

use crate::error::Result;
use crate::firestore::FirestoreClient;

/// Server of the Archy team, where `dev_` and `team_` commands are always on.
pub const TEAM_SERVER_ID: &str = "964701887540645908";

/// Command prefixes reserved for the team server.
const TEAM_COMMAND_PREFIXES: [&str; 2] = ["dev_", "team_"];

/// Collection holding one document per user who asked for a challenge instance.
const CHALLENGE_COLLECTION: &str = "fobChallenge";

/// Repository for command flag operations.
#[derive(Debug, Clone)]
pub struct CommandFlags {
    firestore: FirestoreClient,
}

impl CommandFlags {
    /// Create a new flag repository.
    pub fn new(firestore: FirestoreClient) -> Self {
        Self { firestore }
    }

    fn function_path(server_id: &str, command_name: &str) -> String {
        format!("servers/{}/functions/{}", server_id, command_name)
    }

    /// Whether `command_name` is bypassed on the team server.
    fn is_team_command(server_id: &str, command_name: &str) -> bool {
        server_id == TEAM_SERVER_ID
            && TEAM_COMMAND_PREFIXES
                .iter()
                .any(|prefix| command_name.starts_with(prefix))
    }

    /// Check whether a command is enabled on a server.
    ///
    /// Missing documents and documents without a boolean `active` field both
    /// count as disabled.
    pub async fn is_active_command(&self, server_id: &str, command_name: &str) -> Result<bool> {
        if Self::is_team_command(server_id, command_name) {
            return Ok(true);
        }

        let document = self
            .firestore
            .get_document(&Self::function_path(server_id, command_name))
            .await?;

        Ok(document
            .and_then(|doc| doc.boolean_field("active"))
            .unwrap_or(false))
    }

    /// Add one to the usage counter of a command, if the server has a
    /// document for it.
    pub async fn increment_command_count(&self, server_id: &str, command_name: &str) -> Result<()> {
        let path = Self::function_path(server_id, command_name);

        if self.firestore.get_document(&path).await?.is_some() {
            self.firestore.increment_field(&path, "count", 1).await?;
        } else {
            tracing::debug!(server_id, command_name, "no function document, count not incremented");
        }

        Ok(())
    }

    /// Ids of every user who requested a challenge instance.
    pub async fn challenge_requesters(&self) -> Result<Vec<String>> {
        self.firestore.list_document_ids(CHALLENGE_COLLECTION).await
    }
}
