//! Web server implementation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use qaboard_common::{resolve_fixture, Dashboard, DashboardConfig, ResultTree, Session};

use crate::api;
use crate::auth::require_session;
use crate::render;
use crate::static_files::StaticFiles;

/// Web server state
#[derive(Clone)]
pub struct WebServer {
    state: Arc<WebServerState>,
}

pub struct WebServerState {
    /// Result feed shared by every mounted dashboard
    tree: Arc<ResultTree>,
    pub(crate) ui: RwLock<UiState>,
    static_files: StaticFiles,
}

/// The single identity slot and the dashboard mounted for it
pub(crate) struct UiState {
    pub(crate) session: Session,
    pub(crate) dashboard: Option<Dashboard>,
}

impl UiState {
    fn new(session: Session, tree: &Arc<ResultTree>) -> Self {
        let dashboard = session
            .is_authenticated()
            .then(|| Dashboard::mount(tree.clone()));
        Self { session, dashboard }
    }

    /// A fresh login always mounts a fresh dashboard.
    fn login(&mut self, username: &str, tree: &Arc<ResultTree>) -> qaboard_common::Result<()> {
        self.session.login(username)?;
        self.dashboard = Some(Dashboard::mount(tree.clone()));
        Ok(())
    }

    fn logout(&mut self) -> qaboard_common::Result<()> {
        self.dashboard = None;
        self.session.logout()
    }
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
}

pub async fn serve(addr: SocketAddr, cfg: DashboardConfig) -> anyhow::Result<()> {
    let tree = resolve_fixture(cfg.fixture_path.as_deref())?;
    let session = Session::init(cfg.identity_store())?;
    let server = WebServer::new(Arc::new(tree), session);
    server.serve(addr).await
}

impl WebServer {
    /// Create a new web server
    pub fn new(tree: Arc<ResultTree>, session: Session) -> Self {
        let ui = UiState::new(session, &tree);
        Self {
            state: Arc::new(WebServerState {
                tree,
                ui: RwLock::new(ui),
                static_files: StaticFiles::new(),
            }),
        }
    }

    pub fn router(&self) -> Router {
        let state = self.state.clone();
        let auth_layer = middleware::from_fn(move |req, next| {
            let state = state.clone();
            async move { require_session(state, req, next).await }
        });

        // Protected routes (require a logged-in session)
        let protected_routes = Router::new()
            .route("/api/session", get(api::session_handler))
            .route("/api/summary", get(api::summary_handler))
            .route("/api/tree", get(api::tree_handler))
            .route("/api/tree/click", post(api::tree_click_handler))
            .route("/api/tree/select", post(api::tree_select_handler))
            .route(
                "/api/detail",
                get(api::detail_handler).delete(api::close_detail_handler),
            )
            .route("/api/parts/:part_id/select", post(api::select_part_handler))
            .route("/api/diagram/hover", post(api::hover_handler))
            .layer(auth_layer);

        Router::new()
            // Public routes
            .route("/", get(index_handler))
            .route("/login", post(login_handler))
            .route("/logout", post(logout_handler))
            .route("/api/health", get(health_handler))
            .route("/assets/*path", get(static_handler))

            // Merge protected routes
            .merge(protected_routes)

            // Fallback
            .fallback(not_found_handler)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the web server
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        info!("Web console starting on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "qaboard-web"
    }))
}

async fn index_handler(State(state): State<Arc<WebServerState>>) -> Html<String> {
    let ui = state.ui.read().await;
    match (ui.session.identity(), ui.dashboard.as_ref()) {
        (Some(identity), Some(dash)) => Html(render::dashboard_page(identity, dash)),
        _ => Html(render::login_page(None)),
    }
}

async fn login_handler(
    State(state): State<Arc<WebServerState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut ui = state.ui.write().await;
    match ui.login(&form.username, &state.tree) {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => {
            let status = api::status_for(&e);
            warn!("Login rejected: {}", e);
            (status, Html(render::login_page(Some(&e.to_string())))).into_response()
        }
    }
}

async fn logout_handler(State(state): State<Arc<WebServerState>>) -> Response {
    let mut ui = state.ui.write().await;
    match ui.logout() {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => api::library_error(e),
    }
}

async fn static_handler(
    State(state): State<Arc<WebServerState>>,
    Path(path): Path<String>,
) -> Response {
    state.static_files.serve(&path)
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "not found"})),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use qaboard_common::{builtin_fixture, MemoryIdentityStore};
    use tower::ServiceExt;

    fn server() -> WebServer {
        let session = Session::init(MemoryIdentityStore::new()).unwrap();
        WebServer::new(Arc::new(builtin_fixture().unwrap()), session)
    }

    async fn send(server: &WebServer, request: Request<Body>) -> (StatusCode, String) {
        let response = server.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn login_req(username: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={}", username)))
            .unwrap()
    }

    async fn logged_in() -> WebServer {
        let server = server();
        let (status, _) = send(&server, login_req("qa-lead")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        server
    }

    fn parse(body: &str) -> serde_json::Value {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = send(&server(), get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn test_api_requires_session() {
        let server = server();
        for uri in ["/api/session", "/api/summary", "/api/tree", "/api/detail"] {
            let (status, body) = send(&server, get_req(uri)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(parse(&body)["error"], "not logged in");
        }
        let (status, _) = send(&server, json_req("POST", "/api/parts/motor/select", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_index_switches_on_login() {
        let server = server();
        let (_, body) = send(&server, get_req("/")).await;
        assert!(body.contains(r#"action="/login""#));

        let (status, _) = send(&server, login_req("qa-lead")).await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (_, body) = send(&server, get_req("/")).await;
        assert!(body.contains("Welcome, qa-lead"));
        assert!(body.contains("95.8% Pass Rate"));

        let (_, body) = send(&server, get_req("/api/session")).await;
        assert_eq!(parse(&body)["username"], "qa-lead");
        assert_eq!(parse(&body)["key"], "app-session");
    }

    #[tokio::test]
    async fn test_blank_username_rejected() {
        let server = server();
        let (status, body) = send(&server, login_req("++")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("class=\"error\""));
        let (status, _) = send(&server, get_req("/api/session")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_summary() {
        let server = logged_in().await;
        let (status, body) = send(&server, get_req("/api/summary")).await;
        assert_eq!(status, StatusCode::OK);
        let body = parse(&body);
        assert_eq!(body["summary"]["total_tests"], 625);
        assert_eq!(body["summary"]["total_passed"], 599);
        assert_eq!(body["failed"], 26);
        assert_eq!(body["pass_rate"], "95.8");
        assert_eq!(body["header"]["warnings"], 7);
        assert!(body["header"]["critical"].is_null());
    }

    #[tokio::test]
    async fn test_part_select_opens_and_closes_detail() {
        let server = logged_in().await;
        let (status, body) = send(&server, json_req("POST", "/api/parts/motor/select", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let body = parse(&body);
        assert_eq!(body["selected_id"], "motor");
        assert_eq!(body["detail"]["name"], "Motor");
        assert_eq!(body["detail"]["failed"], 2);

        let (_, page) = send(&server, get_req("/")).await;
        assert!(page.contains("modal-backdrop"));

        let (status, body) = send(&server, Request::builder().method("DELETE").uri("/api/detail").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let body = parse(&body);
        assert!(body["selected_id"].is_null());
        assert!(body["detail"].is_null());
    }

    #[tokio::test]
    async fn test_unmatched_and_unknown_parts() {
        let server = logged_in().await;
        let (_, body) = send(&server, json_req("POST", "/api/parts/battery/select", serde_json::json!({}))).await;
        let body = parse(&body);
        assert_eq!(body["selected_id"], "battery");
        assert!(body["detail"].is_null());

        let (status, body) = send(&server, json_req("POST", "/api/parts/turbo/select", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(parse(&body)["error"].as_str().unwrap().contains("turbo"));
    }

    #[tokio::test]
    async fn test_tree_click() {
        let server = logged_in().await;
        let (_, body) = send(&server, get_req("/api/tree")).await;
        assert_eq!(parse(&body).as_array().unwrap().len(), 34);

        let (_, body) = send(&server, json_req("POST", "/api/tree/click", serde_json::json!({"path": ["Autopilot"]}))).await;
        let body = parse(&body);
        assert!(body["selected"].is_null());
        assert_eq!(body["rows"].as_array().unwrap().len(), 24);

        let path = serde_json::json!({"path": ["Core Vehicle Systems", "Powertrain", "Motor"]});
        let (_, body) = send(&server, json_req("POST", "/api/tree/click", path)).await;
        assert_eq!(parse(&body)["selected"], "motor");

        let (_, body) = send(&server, get_req("/api/detail")).await;
        let body = parse(&body);
        assert_eq!(body["highlighted_id"], "motor");
        assert!(body["selected_id"].is_null());
    }

    #[tokio::test]
    async fn test_tree_select_highlights_part() {
        let server = logged_in().await;
        let (_, body) = send(&server, json_req("POST", "/api/tree/select", serde_json::json!({"id": "battery"}))).await;
        assert_eq!(parse(&body)["highlighted_id"], "battery");
        let (_, page) = send(&server, get_req("/")).await;
        assert!(page.contains(r#"class="part pulse" data-part="battery""#));
    }

    #[tokio::test]
    async fn test_hover() {
        let server = logged_in().await;
        let (_, body) = send(&server, json_req("POST", "/api/diagram/hover", serde_json::json!({"part": "wheels"}))).await;
        let body = parse(&body);
        assert_eq!(body["hovered"], "wheels");
        assert_eq!(body["tooltip"], "Wheel Systems");

        let (_, body) = send(&server, json_req("POST", "/api/diagram/hover", serde_json::json!({"part": null}))).await;
        assert!(parse(&body)["tooltip"].is_null());
    }

    #[tokio::test]
    async fn test_logout_drops_dashboard() {
        let server = logged_in().await;
        send(&server, json_req("POST", "/api/parts/motor/select", serde_json::json!({}))).await;

        let logout = Request::builder().method("POST").uri("/logout").body(Body::empty()).unwrap();
        let (status, _) = send(&server, logout).await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (status, _) = send(&server, get_req("/api/detail")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        send(&server, login_req("qa-lead")).await;
        let (_, body) = send(&server, get_req("/api/detail")).await;
        assert!(parse(&body)["selected_id"].is_null());
    }

    #[tokio::test]
    async fn test_restored_session_mounts_dashboard() {
        let session = Session::init(MemoryIdentityStore::with_record(r#"{"username":"night-shift"}"#)).unwrap();
        let server = WebServer::new(Arc::new(builtin_fixture().unwrap()), session);
        let (status, body) = send(&server, get_req("/api/session")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body)["username"], "night-shift");
    }

    #[tokio::test]
    async fn test_assets_and_fallback() {
        let server = server();
        let (status, body) = send(&server, get_req("/assets/app.js")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/api/diagram/hover"));

        let (status, _) = send(&server, get_req("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
