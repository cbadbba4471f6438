use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gemini_bot::{
    Data, Error,
    cog::GeminiCog,
    config::BotConfig,
    utils::{database::ConfigStore, gemini_client::GeminiClient},
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gemini_bot=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = BotConfig::from_env().inspect_err(|e| error!("Invalid configuration: {}", e))?;

    // Open (and if needed create) the SQLite settings store
    let store = Arc::new(ConfigStore::open(&config.database_path)?);

    let client = GeminiClient::new(&config.api_base, &config.model, config.safety_threshold);
    info!("Using Gemini model '{}'", client.model());
    let cog = GeminiCog::new(store, client);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: gemini_bot::all_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(gemini_bot::on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data { cog })
            })
        });

    let client_builder =
        ClientBuilder::new(&config.discord_token, gemini_bot::intents()).framework(framework.build());

    // Create and run client
    let mut client = client_builder.await?;
    client.start().await.map_err(Into::into)
}
