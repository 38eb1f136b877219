//! REST endpoints for the gateway

pub mod redirect;

use std::sync::Arc;

use axum::Router;

use crate::state::GatewayState;

/// Create all REST routes
pub fn create_rest_routes() -> Router<Arc<GatewayState>> {
    Router::new().merge(redirect::create_redirect_routes())
}

pub use redirect::refresh_redirect;
