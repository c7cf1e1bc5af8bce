use hindsight::config::Config;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hindsight=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        "Starting hindsight server on {}:{}",
        config.host, config.port
    );

    // Make sure the database directory exists
    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = hindsight::build_state(config)?;
    let app = hindsight::app(state).into_make_service_with_connect_info::<SocketAddr>();

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("hindsight server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
