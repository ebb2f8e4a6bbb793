//! Standalone migration runner for deploy pipelines. The `api` binary also
//! migrates on boot; this exists so schema changes can be applied (and
//! verified) before the new service version starts taking traffic.

use sqlx::postgres::PgPoolOptions;

use roomstock::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(config.database_url())
        .await?;

    // no-op if the schema is already current
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Inventory schema is up to date");

    Ok(())
}
