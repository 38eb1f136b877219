//! The redirect endpoint: `GET /<percent-encoded attachment url>`

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use relink_discord::parse_link;
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;
use crate::util::decode_path_segment;

/// Create redirect routes
pub fn create_redirect_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/", get(refresh_redirect))
        .route("/*encoded_url", get(refresh_redirect))
}

/// Resolve an expired attachment URL and answer with a permanent redirect to the
/// freshly signed one.
///
/// The raw request path is used instead of the `Path` extractor so that the
/// segment is percent-decoded exactly once.
pub async fn refresh_redirect(
    State(state): State<Arc<GatewayState>>,
    uri: Uri,
) -> GatewayResult<Response> {
    let encoded = uri.path().strip_prefix('/').unwrap_or(uri.path());

    let decoded = decode_path_segment(encoded).map_err(|error| {
        debug!(%error, "failed to decode url");
        GatewayError::from(error)
    })?;

    if decoded.is_empty() {
        return Err(GatewayError::EmptyUrl);
    }

    let link = parse_link(&decoded).map_err(|error| {
        debug!(%error, "rejected attachment link");
        GatewayError::from(error)
    })?;

    let attachment_url = link.cdn_url_with_base(state.cdn_base_url());

    let refreshed = state
        .refresher()
        .refresh(&attachment_url, state.token())
        .await
        .map_err(|error| {
            warn!(
                %error,
                channel_id = link.channel_id(),
                file_id = link.file_id(),
                "error refreshing attachment url"
            );
            GatewayError::from(error)
        })?;

    let location = HeaderValue::try_from(refreshed.as_str()).map_err(|_| {
        warn!(refreshed = %refreshed, "refreshed url cannot be used as a Location header");
        GatewayError::InvalidLocation(refreshed.clone())
    })?;

    debug!(
        channel_id = link.channel_id(),
        file_id = link.file_id(),
        "redirecting to refreshed url"
    );

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}
