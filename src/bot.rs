//! Discord client and poise framework setup.

use crate::commands;
use crate::config::{Config, Environment, FirestoreCredentials};
use crate::firestore::{FirestoreAuth, FirestoreClient};
use crate::flags::CommandFlags;
use crate::main_node::MainNodeClient;
use crate::types::{Data, Error};
use poise::serenity_prelude as serenity;
use tracing::{debug, error, info};

fn location(context: crate::types::Context<'_>) -> String {
    context
        .guild_id()
        .map_or_else(|| "DM".to_string(), |id| id.to_string())
}

/// Resolve Firestore credentials into request authorization.
async fn firestore_auth(credentials: FirestoreCredentials) -> Result<FirestoreAuth, Error> {
    Ok(match credentials {
        FirestoreCredentials::Static(token) => FirestoreAuth::Static(token),
        FirestoreCredentials::ApplicationDefault => {
            let provider = gcp_auth::provider().await.map_err(crate::error::ArchyError::from)?;
            info!("using Google application default credentials for Firestore");
            FirestoreAuth::ServiceAccount(provider)
        }
        FirestoreCredentials::Anonymous => {
            info!("contacting Firestore without credentials");
            FirestoreAuth::Anonymous
        }
    })
}

/// Build the shared application data from the configuration.
async fn build_data(config: &Config) -> Result<Data, Error> {
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("archy/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let main_node = MainNodeClient::new(
        http_client.clone(),
        config.main_node_url.clone(),
        config.main_node_timeout,
    );

    let firestore = FirestoreClient::new(
        http_client,
        config.firestore_base_url.clone(),
        config.firestore_project_id.clone(),
        firestore_auth(config.firestore_credentials()).await?,
    )
    .with_timeout(config.firestore_timeout);

    Ok(Data {
        main_node,
        flags: CommandFlags::new(firestore),
        enforce_command_flags: config.enforce_command_flags,
    })
}

/// Connect to Discord and serve commands until the client stops.
pub async fn run() -> Result<(), Error> {
    let config = Config::from_env()?;
    let data = build_data(&config).await?;

    info!(
        environment = ?config.environment,
        enforce_command_flags = config.enforce_command_flags,
        "starting archy"
    );

    let intents = serenity::GatewayIntents::non_privileged();
    let environment = config.environment;
    let dev_guild_id = config.dev_guild_id;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            pre_command: |context| {
                Box::pin(async move {
                    debug!(
                        "Command {} used by {} in {}",
                        context.command().qualified_name,
                        context.author().tag(),
                        location(context)
                    );
                })
            },
            post_command: |context| {
                Box::pin(async move {
                    info!(
                        "Command {} completed for {} in {}",
                        context.command().qualified_name,
                        context.author().tag(),
                        location(context)
                    );
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!(
                                "Command {} failed for {} in {}: {}",
                                ctx.command().qualified_name,
                                ctx.author().tag(),
                                location(ctx),
                                error
                            );
                        }
                        other => {
                            if let Err(e) = poise::builtins::on_error(other).await {
                                error!("Error while handling framework error: {}", e);
                            }
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |context, ready, framework| {
            Box::pin(async move {
                let commands = &framework.options().commands;
                match (environment, dev_guild_id) {
                    (Environment::Development, Some(guild_id)) => {
                        info!(guild_id, "registering {} commands in development guild", commands.len());
                        poise::builtins::register_in_guild(context, commands, serenity::GuildId::new(guild_id)).await?;
                    }
                    _ => {
                        info!("registering {} commands globally", commands.len());
                        poise::builtins::register_globally(context, commands).await?;
                    }
                }
                info!("logged in as {}", ready.user.name);
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(config.discord_token.clone(), intents)
        .framework(framework)
        .await?;

    client.start().await?;

    Ok(())
}
