//! # relink Gateway Crate
//!
//! HTTP surface of relink. A single route accepts a percent-encoded Discord CDN
//! attachment URL, refreshes its signature through the Discord API and answers
//! with a `301 Moved Permanently` to the new URL.
//!
//! ## Responses
//!
//! - **301**: `Location` carries the refreshed URL
//! - **400**: `{"error": "..."}` for undecodable input or a malformed attachment link
//! - **502**: `{"error": "Failed to refresh URL"}` for any upstream failure
//!
//! The endpoint performs no authentication of its own. Anyone who can reach it can
//! refresh arbitrary attachment links using the configured credential, so deploy it
//! behind whatever access control the environment requires.
//!
//! ## Usage
//!
//! ```no_run
//! use relink_gateway::{create_router, GatewayState};
//!
//! # async fn run(config: relink_config::AppConfig) -> anyhow::Result<()> {
//! let state = GatewayState::from_config(&config)?;
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod util;

pub use error::{GatewayError, GatewayResult};
pub use state::GatewayState;

pub use create_router as build_router;

use std::sync::Arc;

use axum::{middleware as axum_middleware, Router};

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let arc_state = Arc::new(state);

    Router::new()
        .merge(rest::create_rest_routes().with_state(arc_state))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(middleware::create_trace_middleware())
}
