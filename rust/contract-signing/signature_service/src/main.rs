use crate::api::context::AppState;
use crate::config::{Config, Environment};
use anyhow::Context;
use chrono::Duration;
use email_service_client::EmailServiceClient;
use signing::domain::service::SigningServiceImpl;
use signing::inbound::axum::SigningRouterState;
use signing::outbound::{
    email_notifier::EmailNotifier, pg_audit_log::PgAuditLog, pg_document_repo::PgDocumentRepo,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

mod api;
mod config;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env only matters locally; deployed boxes get real env vars.
    let _ = dotenvy::dotenv();

    // Parse our configuration from the environment.
    let config = Config::from_env().context("expected to be able to generate config")?;

    telemetry::init(config.environment);
    tracing::trace!("initialized config");

    let (min_connections, max_connections): (u32, u32) = match config.environment {
        Environment::Production => (5, 30),
        Environment::Develop => (3, 20),
        Environment::Local => (3, 10),
    };

    let db = PgPoolOptions::new()
        .min_connections(min_connections)
        .max_connections(max_connections)
        .connect(&config.database_url)
        .await
        .context("could not connect to db")?;

    tracing::trace!(
        min_connections,
        max_connections,
        "initialized db connection"
    );

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("could not run migrations")?;

    let email_client = EmailServiceClient::new(
        config.internal_auth_key.clone(),
        config.email_service_url.clone(),
    )
    .context("could not build email service client")?;

    let signing_service = SigningServiceImpl::new(
        PgDocumentRepo::new(db.clone()),
        PgAuditLog::new(db),
        EmailNotifier::new(email_client, config.signing_base_url.clone()),
        Duration::seconds(config.signing_token_ttl_seconds),
    );

    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .context("failed to bind to port")?;

    tracing::info!(
        "signature service is up and running with environment {:?} on port {}",
        &config.environment,
        &config.port
    );

    let service = api::service(AppState {
        signing: SigningRouterState::new(signing_service),
    });

    axum::serve(listener, service)
        .await
        .context("error starting service")?;

    Ok(())
}
