//! Main node response handling.
//!
//! The main node answers with plain text, except for images which come back
//! as a PNG data URL. This module turns either into the reply that replaces
//! the loading placeholder.

use crate::error::Result;
use base64::Engine;
use poise::serenity_prelude as serenity;
use poise::CreateReply;

/// Prefix (before the first comma) identifying an inline PNG.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64";

/// File name used for image attachments.
pub const IMAGE_FILE_NAME: &str = "image.png";

/// A decoded main node response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResponse {
    Text(String),
    Image(Vec<u8>),
}

impl CommandResponse {
    /// Classify and decode a raw main node response.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the response announces a PNG but the payload
    /// is not valid base64.
    ///
    /// # Examples
    ///
    /// ```
    /// use archy::response::CommandResponse;
    ///
    /// let text = CommandResponse::parse("Hello!".to_string()).unwrap();
    /// assert_eq!(text, CommandResponse::Text("Hello!".to_string()));
    ///
    /// let image = CommandResponse::parse("data:image/png;base64,AAEC".to_string()).unwrap();
    /// assert_eq!(image, CommandResponse::Image(vec![0, 1, 2]));
    /// ```
    pub fn parse(raw: String) -> Result<Self> {
        match raw.split_once(',') {
            Some((PNG_DATA_URL_PREFIX, encoded)) => {
                // Anything after a second comma is not part of the image.
                // Line-wrapped payloads are accepted, whitespace is dropped.
                let encoded: String = encoded
                    .split(',')
                    .next()
                    .unwrap_or_default()
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
                Ok(Self::Image(bytes))
            }
            _ => Ok(Self::Text(raw)),
        }
    }

    /// Build the reply that replaces the placeholder message.
    pub fn into_reply(self) -> CreateReply {
        match self {
            Self::Text(content) => CreateReply::default().content(content),
            Self::Image(bytes) => CreateReply::default()
                .content(String::new())
                .attachment(serenity::CreateAttachment::bytes(bytes, IMAGE_FILE_NAME)),
        }
    }
}
