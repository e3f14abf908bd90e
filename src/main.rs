//! Workflow proxy server
//!
//! Executes PhenoML workflows on behalf of browser clients.

use chat_widget::proxy::{create_router, AppState, ProxyConfig};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_widget=info,workflow_proxy=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ProxyConfig::from_env();
    if !config.has_credentials() {
        tracing::warn!("PHENOML_USERNAME or PHENOML_PASSWORD not set; workflow calls will fail");
    }
    if config.workflow_id.is_none() {
        tracing::warn!("WORKFLOW_ID not set");
    }

    let state = AppState::new(&config)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(base_url = %config.base_url, "Workflow proxy listening on {}", addr);
    tracing::info!(
        "POST to http://localhost:{}/execute-workflow to execute workflows",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
