use std::net::SocketAddr;

use anyhow::Context;
use skybook_api::{app, auth::{AuthConfig, Role}, AppState};
use skybook_store::app_config::{Config, StorageBackend};
use skybook_store::{DbClient, Repositories};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skybook_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("failed to load config")?;
    let auth = AuthConfig::new(config.auth.jwt_secret.clone(), config.auth.jwt_expiration_seconds);

    // `skybook-api issue-token <user_id> [admin]` prints a bearer token and exits.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("issue-token") {
        let user_id: i64 = args
            .get(1)
            .context("usage: issue-token <user_id> [admin]")?
            .parse()
            .context("user_id must be an integer")?;
        let role = if args.get(2).map(String::as_str) == Some("admin") { Role::Admin } else { Role::User };
        println!("{}", auth.issue_token(user_id, role)?);
        return Ok(());
    }

    tracing::info!("Starting Skybook API on port {}", config.server.port);

    let repos = match config.storage.backend {
        StorageBackend::Postgres => {
            let db = DbClient::new(&config.database)
                .await
                .context("failed to connect to database")?;
            db.migrate().await.context("failed to run migrations")?;
            Repositories::postgres(&db)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Repositories::memory()
        }
    };

    let app_state = AppState::new(repos, auth, config.media.root.clone().into(), config.pagination);
    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
