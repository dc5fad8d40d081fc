//! JSON API carrying dashboard events
//!
//! Every route here sits behind the login gate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error};

use qaboard_common::session::SESSION_KEY;
use qaboard_common::{format_rate, Dashboard, DashboardEvent, Error, Part, TreePath};

use crate::auth::AuthenticatedIdentity;
use crate::server::{UiState, WebServerState};

#[derive(Debug, Deserialize)]
pub struct TreeClickRequest {
    pub path: TreePath,
}

#[derive(Debug, Deserialize)]
pub struct TreeSelectRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct HoverRequest {
    pub part: Option<Part>,
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({"error": message.into()}))).into_response()
}

/// HTTP status for a library error
pub(crate) fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidUsername(_) | Error::UnknownPart(_) | Error::InvalidLeaf { .. } => {
            StatusCode::BAD_REQUEST
        }
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn library_error(err: Error) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    error_response(status, err.to_string())
}

/// The mounted dashboard, or 401 when a logout raced the gate
fn mounted(ui: &mut UiState) -> Result<&mut Dashboard, Response> {
    ui.dashboard
        .as_mut()
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "not logged in"))
}

fn selection_json(dash: &Dashboard) -> serde_json::Value {
    let selection = dash.selection();
    serde_json::json!({
        "highlighted_id": selection.highlighted_id,
        "selected_id": selection.selected_id,
        "detail": dash.detail(),
    })
}

pub async fn session_handler(
    Extension(AuthenticatedIdentity(identity)): Extension<AuthenticatedIdentity>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "key": SESSION_KEY,
        "username": identity.username,
    }))
}

pub async fn summary_handler(State(state): State<Arc<WebServerState>>) -> Response {
    let mut ui = state.ui.write().await;
    let dash = match mounted(&mut ui) {
        Ok(dash) => dash,
        Err(resp) => return resp,
    };
    let summary = dash.summary();
    Json(serde_json::json!({
        "summary": summary,
        "failed": summary.failed(),
        "pass_rate": format_rate(summary.pass_rate()),
        "header": dash.header(),
    }))
    .into_response()
}

pub async fn tree_handler(State(state): State<Arc<WebServerState>>) -> Response {
    let mut ui = state.ui.write().await;
    match mounted(&mut ui) {
        Ok(dash) => Json(dash.tree_rows()).into_response(),
        Err(resp) => resp,
    }
}

pub async fn detail_handler(State(state): State<Arc<WebServerState>>) -> Response {
    let mut ui = state.ui.write().await;
    match mounted(&mut ui) {
        Ok(dash) => Json(selection_json(dash)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn close_detail_handler(State(state): State<Arc<WebServerState>>) -> Response {
    let mut ui = state.ui.write().await;
    match mounted(&mut ui) {
        Ok(dash) => {
            dash.apply(DashboardEvent::DetailClosed);
            Json(selection_json(dash)).into_response()
        }
        Err(resp) => resp,
    }
}

pub async fn select_part_handler(
    State(state): State<Arc<WebServerState>>,
    Path(part_id): Path<String>,
) -> Response {
    let part: Part = match part_id.parse() {
        Ok(part) => part,
        Err(e) => return library_error(e),
    };
    let mut ui = state.ui.write().await;
    match mounted(&mut ui) {
        Ok(dash) => {
            dash.diagram_click(part);
            Json(selection_json(dash)).into_response()
        }
        Err(resp) => resp,
    }
}

pub async fn tree_click_handler(
    State(state): State<Arc<WebServerState>>,
    Json(req): Json<TreeClickRequest>,
) -> Response {
    let mut ui = state.ui.write().await;
    match mounted(&mut ui) {
        Ok(dash) => {
            let selected = dash.tree_click(&req.path);
            debug!("Tree click on {} raised {:?}", req.path, selected);
            Json(serde_json::json!({
                "selected": selected,
                "rows": dash.tree_rows(),
            }))
            .into_response()
        }
        Err(resp) => resp,
    }
}

pub async fn tree_select_handler(
    State(state): State<Arc<WebServerState>>,
    Json(req): Json<TreeSelectRequest>,
) -> Response {
    let mut ui = state.ui.write().await;
    match mounted(&mut ui) {
        Ok(dash) => {
            dash.apply(DashboardEvent::TreeSelected(req.id));
            Json(selection_json(dash)).into_response()
        }
        Err(resp) => resp,
    }
}

pub async fn hover_handler(
    State(state): State<Arc<WebServerState>>,
    Json(req): Json<HoverRequest>,
) -> Response {
    let mut ui = state.ui.write().await;
    match mounted(&mut ui) {
        Ok(dash) => {
            dash.diagram_hover(req.part);
            Json(serde_json::json!({
                "hovered": dash.diagram().hovered(),
                "tooltip": dash.diagram().tooltip(),
            }))
            .into_response()
        }
        Err(resp) => resp,
    }
}
