//! Biograph API crate - axum HTTP server and route handlers.
//!
//! Exposes grounded chat, session management, narrated story generation,
//! the profiler and health checks, and serves generated audio.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
