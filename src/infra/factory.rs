use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::services::{auth_service::AuthService, seed};
use crate::infra::repositories::{
    sqlite_auth_repo::SqliteAuthRepo, sqlite_client_repo::SqliteClientRepo,
    sqlite_connection_repo::SqliteConnectionRepo,
    sqlite_connection_update_repo::SqliteConnectionUpdateRepo, sqlite_org_repo::SqliteOrgRepo,
    sqlite_rating_repo::SqliteRatingRepo, sqlite_user_repo::SqliteUserRepo,
};

/// Opens the pool, migrates, wires repositories and loads startup data.
pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let pool = connect_sqlite(config).await?;
    run_sqlite_migrations(&pool).await?;

    let state = build_state(pool, config);

    seed::ensure_superadmin(state.user_repo.as_ref(), &config.superadmin_username).await?;
    if config.seed_demo_data {
        seed::seed_demo_data(&state).await?;
    }

    Ok(state)
}

pub async fn connect_sqlite(config: &Config) -> Result<SqlitePool, AppError> {
    let mut opts = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(AppError::Database)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool_options = if config.is_in_memory() {
        info!("Initializing in-memory SQLite store (data is lost on restart)...");
        // Every connection to :memory: is a separate database, so keep exactly one alive.
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");
        opts = opts.journal_mode(SqliteJournalMode::Wal);
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options
        .connect_with(opts)
        .await
        .map_err(AppError::Database)
}

pub fn build_state(pool: SqlitePool, config: &Config) -> AppState {
    let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
    let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(auth_repo, user_repo.clone()));

    AppState {
        config: config.clone(),
        org_repo: Arc::new(SqliteOrgRepo::new(pool.clone())),
        user_repo,
        client_repo: Arc::new(SqliteClientRepo::new(pool.clone())),
        connection_repo: Arc::new(SqliteConnectionRepo::new(pool.clone())),
        update_repo: Arc::new(SqliteConnectionUpdateRepo::new(pool.clone())),
        rating_repo: Arc::new(SqliteRatingRepo::new(pool)),
        auth_service,
    }
}

async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await?;
    Ok(())
}
