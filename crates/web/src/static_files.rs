//! Static file serving

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Embedded dashboard assets
pub struct StaticFiles {}

impl StaticFiles {
    pub fn new() -> Self {
        Self {}
    }

    /// Serve a static file
    pub fn serve(&self, path: &str) -> Response {
        let content_type = guess_content_type(path);

        match path {
            "app.js" => serve_embedded(APP_JS, content_type),
            "app.css" => serve_embedded(APP_CSS, content_type),
            _ => (StatusCode::NOT_FOUND, "File not found").into_response(),
        }
    }
}

impl Default for StaticFiles {
    fn default() -> Self {
        Self::new()
    }
}

fn guess_content_type(path: &str) -> &'static str {
    if path.ends_with(".js") {
        "application/javascript"
    } else if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".html") {
        "text/html"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else {
        "application/octet-stream"
    }
}

fn serve_embedded(content: &'static str, content_type: &'static str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        content,
    )
        .into_response()
}

// Forwards pointer and click events to the coordinator API; the server
// renders the resulting state on reload.
const APP_JS: &str = r#"
async function post(url, body) {
    const init = { method: 'POST', headers: { 'content-type': 'application/json' } };
    if (body !== undefined) init.body = JSON.stringify(body);
    return fetch(url, init);
}

document.querySelectorAll('[data-part]').forEach((el) => {
    const part = el.dataset.part;
    el.addEventListener('click', async () => {
        await post(`/api/parts/${encodeURIComponent(part)}/select`);
        location.reload();
    });
    el.addEventListener('mouseenter', async () => {
        const res = await post('/api/diagram/hover', { part });
        const body = await res.json();
        const tip = document.getElementById('tooltip');
        if (tip) {
            tip.textContent = body.tooltip || '';
            tip.parentElement.classList.toggle('visible', !!body.tooltip);
        }
    });
    el.addEventListener('mouseleave', async () => {
        await post('/api/diagram/hover', { part: null });
        const tip = document.getElementById('tooltip');
        if (tip) tip.parentElement.classList.remove('visible');
    });
});

document.querySelectorAll('[data-path]').forEach((el) => {
    el.addEventListener('click', async () => {
        await post('/api/tree/click', { path: JSON.parse(el.dataset.path) });
        location.reload();
    });
});

document.querySelectorAll('[data-close-detail]').forEach((el) => {
    el.addEventListener('click', async () => {
        await fetch('/api/detail', { method: 'DELETE' });
        location.reload();
    });
});
"#;

const APP_CSS: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #0b0f14; color: #e5e7eb; }
header { display: flex; justify-content: space-between; align-items: center; padding: 16px 24px; border-bottom: 1px solid #1f2937; }
header h1 { font-size: 20px; margin: 0; }
.badges { display: inline-flex; gap: 8px; margin-left: 32px; }
.badge { border-radius: 9999px; padding: 2px 10px; font-size: 12px; border: 1px solid #374151; }
.badge.critical { background: #ef4444; border-color: #ef4444; }
.badge.warnings { background: #374151; }
main { display: flex; height: calc(100vh - 73px); }
.panel { background: #111827; border-radius: 8px; margin: 24px; padding: 16px; }
.diagram { flex: 1; }
.tree { width: 320px; margin-left: 0; overflow: auto; }
.part { cursor: pointer; transition: all 300ms; }
.part:hover { fill: #ef4444; opacity: 0.9; }
.pulse { animation: pulse 2s infinite; }
@keyframes pulse { 50% { opacity: 0.5; } }
.tooltip { display: none; }
.tooltip.visible { display: inline; }
.legend { display: flex; justify-content: center; gap: 16px; font-size: 12px; color: #9ca3af; }
.dot { display: inline-block; width: 8px; height: 8px; border-radius: 50%; margin-right: 4px; }
.row { display: flex; align-items: center; gap: 8px; width: 100%; padding: 8px; background: none; border: 0; color: inherit; text-align: left; cursor: pointer; }
.row.highlighted { background: rgba(239, 68, 68, 0.2); border-left: 2px solid #ef4444; }
.row .name { flex: 1; font-size: 14px; }
.counts { font-size: 12px; background: #1f2937; padding: 2px 6px; border-radius: 4px; }
.modal-backdrop { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.6); display: flex; align-items: center; justify-content: center; }
.modal { background: #111827; border-radius: 8px; padding: 24px; width: 420px; }
.stats { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; text-align: center; }
.progress { height: 12px; background: #1f2937; border-radius: 9999px; overflow: hidden; }
.progress > div { height: 100%; background: #ef4444; }
.notice { padding: 16px; border-radius: 8px; margin-top: 16px; }
.notice.failure_review { background: rgba(239, 68, 68, 0.1); }
.notice.all_clear { background: rgba(34, 197, 94, 0.1); }
.login { max-width: 360px; margin: 15vh auto; }
.error { color: #ef4444; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(guess_content_type("app.js"), "application/javascript");
        assert_eq!(guess_content_type("app.css"), "text/css");
        assert_eq!(guess_content_type("blob"), "application/octet-stream");
    }

    #[test]
    fn test_unknown_asset_is_404() {
        let files = StaticFiles::new();
        assert_eq!(files.serve("missing.js").status(), StatusCode::NOT_FOUND);
        assert_eq!(files.serve("app.js").status(), StatusCode::OK);
    }
}
