use anyhow::Context;

use staffhub_api::app::{build_app, services};
use staffhub_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    staffhub_observability::init(config.log_format);

    let services = services::build_services(&config).await?;
    let app = build_app(services);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
