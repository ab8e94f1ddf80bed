mod client;
use client::config::settings::Settings;
use client::discord::handler::Handler;

use serenity::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // This will load the environment variables located at `./.env`, relative to
    // the CWD. See `./.env.example` for an example on how to structure this.
    let dotenv_loaded = dotenv::dotenv();

    // Defaults to `info`; override with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // A missing file is fine as long as the variables are set some other way.
    if let Err(why) = dotenv_loaded {
        info!("No .env file loaded: {}", why);
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(why) => {
            error!("{}", why);
            std::process::exit(1);
        }
    };
    let token = settings.token.clone();

    // Member events and the member list need the privileged GUILD_MEMBERS intent.
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_EMOJIS_AND_STICKERS
        | GatewayIntents::GUILD_MESSAGES;
    let mut client = match Client::builder(&token, intents)
        .event_handler(Handler::new(settings))
        .await
    {
        Ok(client) => client,
        Err(why) => {
            error!("Err creating client: {:?}", why);
            std::process::exit(1);
        }
    };

    let shard_manager = client.shard_manager.clone();

    // This spawns a kill switch task to shut down the bot using CTRL+C
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutting down");
                shard_manager.lock().await.shutdown_all().await;
            }
            Err(why) => error!("Could not register ctrl+c handler: {:?}", why),
        }
    });

    // This starts the bot, and if an error occurs it logs it to logs.
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
