mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use income_explorer::{config, Config, DirectSource};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The proxy always talks to the provider directly.
    let mut config = Config::from_env();
    config.backend_url = None;
    let symbol = config.symbol.clone();

    // reqwest's blocking client must be built off the async runtime.
    let source = tokio::task::spawn_blocking(move || DirectSource::new(&config)).await??;
    info!(symbol = %symbol, "upstream source ready");

    let state = Arc::new(AppState {
        source: Arc::new(source),
    });

    let app = Router::new()
        .route(
            config::PROXY_PATH,
            get(routes::financial::get_financial_data),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = std::env::var("PROXY_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
