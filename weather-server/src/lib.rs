//! HTTP API for the weather service.
//!
//! Proxies the configured provider and serves its data in the simplified
//! schema defined by `weather-core`.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::{cors_layer, create_router};
pub use state::AppState;
