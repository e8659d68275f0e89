mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/quote", get(handlers::quote))
        .route("/api/geocode", get(handlers::geocode))
        .route("/api/fare", get(handlers::fare))
        .route("/api/cities", get(handlers::city_list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(Arc::new(state));
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("SafeDrop fare server listening on http://{}", addr);

    axum::serve(listener, app).await
}
