use std::net::SocketAddr;

use anyhow::Result;
use tower_http::trace::TraceLayer;

use roomstock::{
    app_state::AppState,
    config::Config,
    middleware::{RateLimit, rate_limit_middleware},
    router::build_router,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Create database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(config.database_url())
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState::new(pool);
    let rate_limit = RateLimit::new(60, 60);

    let app = build_router(state)
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "API server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
