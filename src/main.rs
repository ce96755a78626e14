//! Entry point: load config, wire dependencies, and run the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tusk::auth::{AuthService, TokenService};
use tusk::config::Config;
use tusk::db::{self, PgRevokedTokenRepository, PgTodoRepository, PgUserRepository};
use tusk::todos::TodoService;
use tusk::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = db::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&db_pool).await?;

    let user_repo = Arc::new(PgUserRepository::new(db_pool.clone()));
    let todo_repo = Arc::new(PgTodoRepository::new(db_pool.clone()));
    let revoked_repo = Arc::new(PgRevokedTokenRepository::new(db_pool.clone()));

    let token_service = TokenService::new(
        revoked_repo,
        config.jwt_secret.clone(),
        config.access_token_ttl_secs,
    );
    let auth_service = AuthService::new(user_repo, token_service.clone());
    let todo_service = TodoService::new(todo_repo);

    let state = AppState {
        token_service: token_service.clone(),
        auth_service,
        todo_service,
    };

    // Periodically drop revocation rows whose tokens have expired anyway.
    let sweep_every = Duration::from_secs(config.revoked_cleanup_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            if let Err(e) = token_service.clean_expired_revoked().await {
                tracing::warn!(error = %e, "revoked token cleanup failed");
            }
        }
    });

    let app = create_app(state);

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;

    // Serve until a shutdown signal, then drain in-flight requests for at
    // most shutdown_timeout_secs before forcing exit.
    let shutdown = Arc::new(Notify::new());
    let server = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.notified().await })
                .await
        })
    };

    shutdown_signal().await;
    shutdown.notify_one();
    match tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        server,
    )
    .await
    {
        Ok(res) => res??,
        Err(_) => tracing::warn!("graceful shutdown timed out, forcing exit"),
    }
    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => {
                tracing::error!("failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
