pub mod api; // REST surface
pub mod config;
pub mod core_state;
pub mod credentials;
pub mod db;
pub mod doctors;
pub mod error;
pub mod facilities;
pub mod models;
pub mod patients;
pub mod visits;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Start the clinic backend and serve until Ctrl-C.
pub async fn run() -> Result<(), String> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config::database_path();
    let bind_addr = config::bind_addr()
        .map_err(|e| format!("Invalid {}: {e}", config::ENV_BIND_ADDR))?;

    // Create the file and apply migrations before accepting traffic.
    db::open_database(&db_path)
        .map_err(|e| format!("Cannot open database {}: {e}", db_path.display()))?;
    tracing::info!(path = %db_path.display(), "Database ready");

    let core = Arc::new(core_state::CoreState::new(db_path));
    let server = api::start_server_on(core, bind_addr).await?;
    tracing::info!(
        session_id = %server.session.session_id,
        addr = %server.session.server_addr,
        "Listening"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
    }
    server.stop().await;
    Ok(())
}
