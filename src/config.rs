//! Configuration management for Archy.
//!
//! This module handles loading and validating environment variables and application settings.

use crate::error::{ArchyError, Result};
use std::env;
use std::time::Duration;

/// Default Firestore REST endpoint.
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Default time allowed for the main node to answer a command.
const DEFAULT_MAIN_NODE_TIMEOUT_SECS: u64 = 60;

/// Default time allowed for a single Firestore request.
const DEFAULT_FIRESTORE_TIMEOUT_SECS: u64 = 10;

/// Where Firestore credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirestoreCredentials {
    /// A fixed bearer token from `FIRESTORE_ACCESS_TOKEN`.
    Static(String),
    /// Google application default credentials (service account), refreshed automatically.
    ApplicationDefault,
    /// No credentials, for the emulator.
    Anonymous,
}

/// Deployment environment, selects how slash commands are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Commands are registered in a single development guild (instant updates).
    Development,
    /// Commands are registered globally.
    Production,
}

impl Environment {
    /// Parse the `ENVIRONMENT` value. Anything that is not a development
    /// marker counts as production.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "dev" || v == "development" => Self::Development,
            _ => Self::Production,
        }
    }
}

/// Configuration for the application, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Endpoint of the main node that processes commands
    pub main_node_url: String,
    /// Request timeout for main node calls
    pub main_node_timeout: Duration,
    /// Firestore REST base URL (without the `projects/...` suffix)
    pub firestore_base_url: String,
    /// Firestore project holding the `servers` collection
    pub firestore_project_id: String,
    /// Optional OAuth bearer token for Firestore, overrides service account credentials
    pub firestore_access_token: Option<String>,
    /// Request timeout for Firestore calls
    pub firestore_timeout: Duration,
    /// Deployment environment
    pub environment: Environment,
    /// Guild receiving command registrations in development
    pub dev_guild_id: Option<u64>,
    /// Whether commands consult the flag store before running
    pub enforce_command_flags: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This will attempt to load a .env file if present using dotenv,
    /// then read required environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required environment variable is missing or invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use archy::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load configuration");
    /// println!("Main node: {}", config.main_node_url);
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors - it's optional)
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ArchyError::Config(
                "Missing DISCORD_TOKEN environment variable. Set it in your environment or create a .env file (never commit this file).".to_string()
            ))?;

        let main_node_url = lookup("MAIN_NODE_URL")
            .ok_or_else(|| ArchyError::Config(
                "Missing MAIN_NODE_URL environment variable (e.g., MAIN_NODE_URL=https://main-node.example.com/treat_command).".to_string()
            ))?;
        Self::validate_http_url("MAIN_NODE_URL", &main_node_url)?;

        let main_node_timeout = Self::parse_timeout(
            "MAIN_NODE_TIMEOUT_SECS",
            lookup("MAIN_NODE_TIMEOUT_SECS").as_deref(),
            DEFAULT_MAIN_NODE_TIMEOUT_SECS,
        )?;

        let firestore_project_id = lookup("FIRESTORE_PROJECT_ID")
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ArchyError::Config(
                "Missing FIRESTORE_PROJECT_ID environment variable.".to_string()
            ))?;

        let firestore_base_url = lookup("FIRESTORE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_FIRESTORE_BASE_URL.to_string());
        Self::validate_http_url("FIRESTORE_BASE_URL", &firestore_base_url)?;

        let firestore_access_token = lookup("FIRESTORE_ACCESS_TOKEN").filter(|t| !t.trim().is_empty());

        let firestore_timeout = Self::parse_timeout(
            "FIRESTORE_TIMEOUT_SECS",
            lookup("FIRESTORE_TIMEOUT_SECS").as_deref(),
            DEFAULT_FIRESTORE_TIMEOUT_SECS,
        )?;

        let environment = Environment::parse(lookup("ENVIRONMENT").as_deref());

        let dev_guild_id = match lookup("DEV_GUILD_ID") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| ArchyError::Config(
                format!("Invalid DEV_GUILD_ID: '{}'. Expected a Discord guild id.", raw)
            ))?),
            None => None,
        };

        if environment == Environment::Development && dev_guild_id.is_none() {
            return Err(ArchyError::Config(
                "ENVIRONMENT is set to development but DEV_GUILD_ID is missing.".to_string()
            ));
        }

        let enforce_command_flags = Self::parse_bool("ENFORCE_COMMAND_FLAGS", lookup("ENFORCE_COMMAND_FLAGS").as_deref())?;

        Ok(Self {
            discord_token,
            main_node_url,
            main_node_timeout,
            firestore_base_url,
            firestore_project_id,
            firestore_access_token,
            firestore_timeout,
            environment,
            dev_guild_id,
            enforce_command_flags,
        })
    }

    /// Credentials to use for Firestore.
    ///
    /// A static token always wins. Otherwise the real Firestore endpoint uses
    /// application default credentials and any other endpoint (the emulator)
    /// is contacted anonymously.
    pub fn firestore_credentials(&self) -> FirestoreCredentials {
        match &self.firestore_access_token {
            Some(token) => FirestoreCredentials::Static(token.clone()),
            None if self.firestore_base_url.trim_end_matches('/') == DEFAULT_FIRESTORE_BASE_URL => {
                FirestoreCredentials::ApplicationDefault
            }
            None => FirestoreCredentials::Anonymous,
        }
    }

    /// Parse a timeout in seconds, falling back to `default_secs` when unset.
    fn parse_timeout(name: &str, value: Option<&str>, default_secs: u64) -> Result<Duration> {
        let Some(raw) = value else {
            return Ok(Duration::from_secs(default_secs));
        };

        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ArchyError::Config(
                format!("Invalid {}: '{}'. Expected a positive number of seconds.", name, raw)
            )),
        }
    }

    /// Parse an optional boolean flag, `false` when unset.
    fn parse_bool(name: &str, value: Option<&str>) -> Result<bool> {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(false),
            Some(v) => match v.as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" | "" => Ok(false),
                _ => Err(ArchyError::Config(
                    format!("Invalid {}: '{}'. Expected true or false.", name, v)
                )),
            },
        }
    }

    /// Validate a URL format using proper URL parsing.
    fn validate_http_url(name: &str, url_str: &str) -> Result<()> {
        use url::Url;

        let parsed_url = Url::parse(url_str)
            .map_err(|e| ArchyError::Config(
                format!("Invalid {} '{}': {}", name, url_str, e)
            ))?;

        // Ensure it's HTTP or HTTPS
        let scheme = parsed_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ArchyError::Config(
                format!("{} must use http:// or https:// scheme, got: '{}'", name, scheme)
            ));
        }

        if parsed_url.host_str().is_none() {
            return Err(ArchyError::Config(
                format!("{} must contain a valid host: '{}'", name, url_str)
            ));
        }

        Ok(())
    }
}
