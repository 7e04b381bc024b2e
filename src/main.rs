use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use buyer_bot::bot::{message_handler, FormService, TelegramSender};
use buyer_bot::config::{
    BotConfig, LogFormat, BOT_TOKEN_VAR, DEFAULT_LOG_LEVEL, LOG_LEVEL_VAR, PORT_VAR,
};
use buyer_bot::health;
use buyer_bot::localization::init_localization;
use buyer_bot::session_store::InMemorySessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(DEFAULT_LOG_LEVEL, LogFormat::Text);
            error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };
    init_tracing(&config.log_level, config.log_format);

    info!("Starting buyer request bot");
    info!(
        port = ?env::var(PORT_VAR).ok(),
        log_level = ?env::var(LOG_LEVEL_VAR).ok(),
        bot_token = if env::var(BOT_TOKEN_VAR).is_ok() { "SET" } else { "MISSING" },
        "Environment"
    );

    init_localization().context("failed to load message catalog")?;

    let listener = health::bind(config.health_port)
        .await
        .with_context(|| format!("failed to bind health port {}", config.health_port))?;
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let health_task = tokio::spawn(health::serve(listener, async move {
        shutdown_rx.await.ok();
    }));

    let bot = Bot::new(config.bot_token.clone());
    let me = bot.get_me().await.context("failed to fetch bot identity")?;

    let mut service = FormService::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(TelegramSender::new(bot.clone())),
        config.staff_channel_id,
    );
    if let Some(username) = me.user.username.clone() {
        service = service.with_bot_username(username);
    }
    let service = Arc::new(service);

    info!(
        bot_username = ?me.user.username,
        channel_id = %config.staff_channel_id,
        "Bot initialized, starting dispatcher"
    );

    let handler = dptree::entry().branch(Update::filter_message().endpoint(message_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Shutting down");
    shutdown_tx.send(()).ok();
    match health_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "Health server stopped with an error"),
        Err(e) => error!(error = %e, "Health server task failed"),
    }

    Ok(())
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}
