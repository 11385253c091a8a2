use anyhow::Context;

use marketerp_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    marketerp_observability::init();

    let config = AppConfig::from_env();
    let app = marketerp_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        lease_driver = config.lease_driver,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
