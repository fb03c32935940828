use anyhow::Context;
use text_summarizer::{
    api::{build_router, init_state},
    config::Settings,
    observability::init_tracing,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var("SUMMARIZER_CONFIG").ok();
    let settings = Settings::load(config_path.as_deref())
        .context("Failed to load configuration")?
        .from_env();

    init_tracing(&settings.logging);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = init_state(settings).context("Failed to initialize application state")?;
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
