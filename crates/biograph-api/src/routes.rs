//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, rate
//! limiting, static audio serving and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use biograph_core::{BiographConfig, BiographError};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // CORS: the configured port plus port+1 for a dev server.
    let port = config.general.port;
    let dev_port = port.saturating_add(1);
    let origins: Vec<HeaderValue> = [
        format!("http://127.0.0.1:{}", port),
        format!("http://localhost:{}", port),
        format!("http://127.0.0.1:{}", dev_port),
        format!("http://localhost:{}", dev_port),
    ]
    .iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Cheap, read-only routes.
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/sessions", get(handlers::list_sessions))
        .route("/chat/{session_id}", axum::routing::delete(handlers::delete_session))
        .route("/chat/{session_id}/history", get(handlers::chat_history));

    // Routes that reach the language model.
    let mut model_routes = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/story", post(handlers::story))
        .route("/profiler", post(handlers::profiler));
    if config.server.rate_limit_per_sec > 0 {
        let limiter = RateLimiter::new(config.server.rate_limit_per_sec);
        model_routes = model_routes
            .layer(axum::middleware::from_fn(
                crate::rate_limit::rate_limit_middleware,
            ))
            .layer(axum::Extension(limiter));
    }

    let audio_prefix = config.story.public_prefix.trim_end_matches('/');

    public_routes
        .merge(model_routes)
        .nest_service(audio_prefix, ServeDir::new(&config.story.audio_dir))
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(config: &BiographConfig, state: AppState) -> Result<(), BiographError> {
    let addr = format!("{}:{}", config.general.bind_address, config.general.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BiographError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| BiographError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
