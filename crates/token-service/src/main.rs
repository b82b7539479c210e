//! Token service binary

use clearcall_token_service::{create_router, ServiceConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clearcall_token_service=info,tower_http=info")),
        )
        .init();

    let config = ServiceConfig::from_env()?;
    let addr = config.bind_address();
    let app = create_router(&config)?;

    info!("Token service listening on {}", addr);
    info!("Issuing tokens for room '{}'", config.room_name);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
