use std::sync::Arc;

use axum::http::HeaderName;
use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth};
use service::auth::repo::seaorm::{SeaOrmAuthRepository, SeaOrmSessionRepository};
use service::auth::repository::memory::{MemoryAuthRepository, MemorySessionRepository};
use service::auth::repository::{AuthRepository, SessionRepository};
use service::auth::{AuthConfig, AuthService};
use service::todo::repo::seaorm::SeaOrmTodoRepository;
use service::todo::repository::memory::MemoryTodoRepository;
use service::todo::repository::TodoRepository;
use service::todo::TodoService;

/// Wire repositories and services for the configured backend.
///
/// `memory://` keeps everything in process; a Postgres URL connects the pool
/// and applies pending migrations first.
pub async fn build_state(cfg: &AppConfig) -> Result<auth::ServerState, StartupError> {
    let token_header = HeaderName::try_from(cfg.auth.token_header.as_str())
        .map_err(|e| StartupError::InvalidConfig(format!("auth.token_header: {e}")))?;

    let (users, sessions, todos): (Arc<dyn AuthRepository>, Arc<dyn SessionRepository>, Arc<dyn TodoRepository>) =
        if cfg.database.is_in_memory() {
            info!(backend = "memory", "using in-process store");
            (
                Arc::new(MemoryAuthRepository::default()),
                Arc::new(MemorySessionRepository::default()),
                Arc::new(MemoryTodoRepository::default()),
            )
        } else {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(|e| StartupError::Database(e.to_string()))?;
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Database(e.to_string()))?;
            info!(backend = "postgres", "migrations applied");
            (
                Arc::new(SeaOrmAuthRepository { db: db.clone() }),
                Arc::new(SeaOrmSessionRepository { db: db.clone() }),
                Arc::new(SeaOrmTodoRepository { db }),
            )
        };

    let auth_svc = AuthService::new(users, sessions, AuthConfig::from(&cfg.auth));
    Ok(auth::ServerState {
        auth: auth::ServerAuthConfig { token_header },
        auth_svc: Arc::new(auth_svc),
        todo_svc: Arc::new(TodoService::new(todos)),
    })
}

/// Build the router for a validated configuration.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let state = build_state(cfg).await?;
    let cors = routes::build_cors(&state.auth.token_header);
    Ok(routes::build_router(state, cors))
}

const SESSION_PURGE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// Periodically delete session rows whose tokens have expired.
pub fn spawn_session_purge(auth_svc: Arc<AuthService>, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(e) = auth_svc.purge_expired_sessions().await {
                warn!(code = e.code(), err = %e, "session purge failed");
            }
        }
    })
}

/// Public entry: build the app and serve until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let purge = spawn_session_purge(state.auth_svc.clone(), SESSION_PURGE_INTERVAL);
    let cors = routes::build_cors(&state.auth.token_header);
    let app = routes::build_router(state, cors);

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, header = %cfg.auth.token_header, "todo api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    purge.abort();
    Ok(())
}
