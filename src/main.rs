use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use player_service::api::{self, AppState, NotifySettings};
use player_service::auth::{IdentityServiceClient, TokenVerifier};
use player_service::config::Config;
use player_service::domain::notification::NotificationDispatcher;
use player_service::domain::repositories::PlayerRepository;
use player_service::infrastructure::mail::HttpMailTransport;
use player_service::infrastructure::repositories::{
    InMemoryPlayerRepository, PostgresPlayerRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    let players: Arc<dyn PlayerRepository> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected successfully");
            Arc::new(PostgresPlayerRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, players are kept in memory");
            Arc::new(InMemoryPlayerRepository::new())
        }
    };

    let verifier: Arc<dyn TokenVerifier> = Arc::new(
        IdentityServiceClient::new(&config.identity_verify_url, config.upstream_timeout)
            .context("Failed to build identity client")?,
    );

    let transport = HttpMailTransport::new(
        &config.mail_api_url,
        &config.mail_api_key,
        config.upstream_timeout,
    )
    .context("Failed to build mail transport")?;

    let state = AppState {
        players,
        verifier,
        dispatcher: NotificationDispatcher::new(Arc::new(transport)),
        notify: NotifySettings {
            default_sender: config.mail_sender.clone(),
            reject_empty_roster: config.reject_empty_roster,
        },
    };

    let app = api::router(state);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
