use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::{
    config::{ServerConfig, StorageBackend},
    create_router,
    jwt::JwtService,
    state::AppState,
};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::migrate::Migrator;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting ESG API service");

    let config = ServerConfig::from_env()?;
    let jwt_service = JwtService::new(&config.jwt_secret, config.token_ttl_seconds);

    let app_state = match config.storage {
        StorageBackend::Postgres => {
            // Initialize database connection pool
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            // Check database connectivity
            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }
            run_migrations(&pool, &MIGRATOR).await?;

            AppState::postgres(pool, jwt_service)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data will not survive a restart");
            AppState::in_memory(jwt_service)
        }
    };

    // Start the web server
    let app = create_router(app_state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("ESG API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
