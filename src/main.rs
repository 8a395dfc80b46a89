use anyhow::Context;
use dotenvy::dotenv;

use pagecraft::router::init_router;
use pagecraft::state::init_app_state;
use pagecraft_config::ServerConfig;
use pagecraft_observability::{init_metrics, init_tracing, shutdown_tracer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let state = init_app_state().await?;
    pagecraft_db::run_migrations(&state.db).await?;

    let state = state.with_metrics(init_metrics());
    let app = init_router(state);

    let address = ServerConfig::from_env().bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    tracing::info!(%address, "server listening");
    tracing::info!("Swagger UI at /swagger-ui, Scalar at /scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
