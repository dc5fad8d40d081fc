//! Login gate for the dashboard API.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use qaboard_common::Identity;

use crate::server::WebServerState;

/// Extension that holds the logged-in identity
#[derive(Clone)]
pub struct AuthenticatedIdentity(pub Identity);

/// Middleware that requires a logged-in session
pub async fn require_session(
    state: Arc<WebServerState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = {
        let ui = state.ui.read().await;
        ui.session.identity().cloned()
    };

    match identity {
        Some(identity) => {
            request.extensions_mut().insert(AuthenticatedIdentity(identity));
            next.run(request).await
        }
        None => {
            debug!("Rejecting {} without a session", request.uri().path());
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({"error": "not logged in"})),
            )
                .into_response()
        }
    }
}
