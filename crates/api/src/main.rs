#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stoa_observability::init("stoa-api");

    let config = stoa_api::config::AppConfig::from_env();
    let app = stoa_api::app::build_app(config.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
