use actix_web::{
    middleware::{NormalizePath, TrailingSlash},
    web::{Data, JsonConfig},
    App, HttpServer,
};
use tracing::{info, level_filters::LevelFilter};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter, FmtSubscriber};

use config::Config;
use service::Service;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod event;
pub mod service;
pub mod utils;

/// Runs the webhook receiver until the server shuts down.
pub async fn run() -> eyre::Result<()> {
    #[cfg(debug_assertions)]
    FmtSubscriber::builder()
        .pretty()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("HOOKLINE_LOG")
                .with_default_directive(LevelFilter::INFO.into())
                .from_env()?,
        )
        .finish()
        .try_init()?;

    #[cfg(not(debug_assertions))]
    FmtSubscriber::builder()
        .json()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("HOOKLINE_LOG")
                .with_default_directive(LevelFilter::INFO.into())
                .from_env()?,
        )
        .finish()
        .try_init()?;

    let config = Config::load()?;
    let addr = config.bind_addr();

    let service = Service::connect_with(config).await?;

    let data = Data::new(service);

    info!(host = %addr.0, port = addr.1, "starting webhook receiver");

    HttpServer::new(move || {
        let json_cfg = JsonConfig::default().content_type_required(false);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .service(api::webhook::service())
            .app_data(data.clone())
            .app_data(json_cfg)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
