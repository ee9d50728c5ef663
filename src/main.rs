use mep_tracker::{
    AppState, app,
    clock::SystemClock,
    settings::ServerConfig,
    store::Store,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mep_tracker=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = ServerConfig::from_env();
    let state = AppState::load(Store::new(&config.data_dir), SystemClock)?;

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!("server running at http://{addr}");
    tracing::info!("static files: http://{addr}/");
    tracing::info!("api base:     http://{addr}/api");
    tracing::info!(data_dir = %config.data_dir, "important dates cache and settings");

    axum::serve(listener, app(state)).await
}
