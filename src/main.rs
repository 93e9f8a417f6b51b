mod config;
mod github;
mod hooks;
mod http;
mod notifier;

use actix::Actor;
use actix_web::{middleware::Logger, App, HttpServer};
use color_eyre::eyre::{self, WrapErr as _};

#[actix_web::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install()?;
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(tracing_subscriber::fmt().finish())?;

    let config::Config { telegram, server } = config::Config::from_env()
        .wrap_err("TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set")?;

    let notifier = notifier::Notifier::new(notifier::Config {
        api_url: telegram.api_url,
        telegram_token: telegram.bot_token,
        telegram_chat: telegram.chat_id,
    })
    .start();

    let port = server.port;
    let server = HttpServer::new(move || {
        App::new()
            .data(notifier.clone())
            .wrap(Logger::default())
            .configure(hooks::configure)
    })
    .bind(("0.0.0.0", port))
    .wrap_err_with(|| format!("Failed to bind port {}", port))?;

    tracing::info!("Server is running on port {}", port);
    server.run().await.map_err(Into::into)
}
