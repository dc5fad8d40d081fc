//! Server-rendered pages
//!
//! The console renders the whole page from coordinator state. Browser events
//! are posted to the JSON API and the page is reloaded.

use qaboard_common::detail::DetailView;
use qaboard_common::diagram::{Shape, CANVAS_HEIGHT, CANVAS_WIDTH};
use qaboard_common::tree_view::RowKind;
use qaboard_common::{format_rate, Badge, Dashboard, Health, Identity, TreeRow};

const TITLE: &str = "Vehicle QA Dashboard";

/// Escape text for HTML element and attribute content
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{TITLE}</title>
<link rel="stylesheet" href="/assets/app.css">
</head>
<body>
{body}
<script src="/assets/app.js"></script>
</body>
</html>
"#
    )
}

/// Login form, with an optional error line
pub fn login_page(error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default();
    page(&format!(
        r#"<div class="panel login">
<h1>{TITLE}</h1>
{error}<form method="post" action="/login">
<label for="username">Username</label>
<input id="username" name="username" autocomplete="username" required autofocus>
<button type="submit">Sign in</button>
</form>
</div>"#
    ))
}

/// Full dashboard for a logged-in identity
pub fn dashboard_page(identity: &Identity, dash: &Dashboard) -> String {
    let mut body = header(identity, dash);
    body.push_str("<main>\n");
    body.push_str(&format!(
        "<section class=\"panel diagram\">\n<h2>Vehicle Overview</h2>\n{}</section>\n",
        diagram(dash)
    ));
    body.push_str(&format!(
        "<section class=\"panel tree\">\n<h2>System Tree</h2>\n{}</section>\n",
        tree(&dash.tree_rows())
    ));
    body.push_str("</main>\n");
    if let Some(view) = dash.detail() {
        body.push_str(&detail_modal(&view));
    }
    page(&body)
}

fn header(identity: &Identity, dash: &Dashboard) -> String {
    let stats = dash.header();
    let mut badges = format!(
        r#"<span class="badge rate">{}% Pass Rate</span>"#,
        stats.pass_rate
    );
    if let Some(n) = stats.critical {
        badges.push_str(&format!(r#"<span class="badge critical">{} Critical</span>"#, n));
    }
    if let Some(n) = stats.warnings {
        badges.push_str(&format!(r#"<span class="badge warnings">{} Warnings</span>"#, n));
    }
    format!(
        r#"<header>
<div><h1>{TITLE}</h1><span class="badges">{badges}</span></div>
<div><span>Welcome, {}</span>
<form method="post" action="/logout" style="display:inline"><button type="submit">Logout</button></form></div>
</header>
"#,
        escape(&identity.username)
    )
}

/// SVG diagram with hover tooltip and legend
pub fn diagram(dash: &Dashboard) -> String {
    let mut svg = format!(
        r#"<svg viewBox="0 0 {w} {h}" width="{w}" height="{h}" role="img">
"#,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT
    );
    for view in dash.parts() {
        let class = if view.style.pulse { "part pulse" } else { "part" };
        let attrs = format!(
            r#"class="{class}" data-part="{}" fill="{}" opacity="{}""#,
            view.part.id(),
            view.style.fill,
            view.style.opacity
        );
        for shape in view.part.shapes() {
            match *shape {
                Shape::Rect { x, y, width, height, rx } => svg.push_str(&format!(
                    "<rect {attrs} x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" rx=\"{rx}\"><title>{}</title></rect>\n",
                    view.part.label()
                )),
                Shape::Circle { cx, cy, r } => svg.push_str(&format!(
                    "<circle {attrs} cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\"><title>{}</title></circle>\n",
                    view.part.label()
                )),
            }
        }
    }
    svg.push_str("</svg>\n");

    let tooltip = dash.diagram().tooltip();
    svg.push_str(&format!(
        "<div class=\"tooltip{}\"><span id=\"tooltip\">{}</span></div>\n",
        if tooltip.is_some() { " visible" } else { "" },
        tooltip.unwrap_or_default()
    ));

    svg.push_str("<div class=\"legend\">");
    for health in [Health::Good, Health::Warning, Health::Critical] {
        svg.push_str(&format!(
            r#"<span><span class="dot" style="background:{}"></span>{}</span>"#,
            Badge::for_health(health).css_color(),
            health
        ));
    }
    svg.push_str("</div>\n");
    svg
}

/// Mounted tree rows
pub fn tree(rows: &[TreeRow]) -> String {
    let mut out = String::from("<div class=\"rows\">\n");
    for row in rows {
        let path = serde_json::to_string(&row.path).unwrap_or_default();
        let class = if row.highlighted { "row highlighted" } else { "row" };
        let (marker, counts) = match &row.kind {
            RowKind::Group { expanded: true, .. } => ("&#9662;", String::new()),
            RowKind::Group { expanded: false, .. } => ("&#9656;", String::new()),
            RowKind::Leaf { passed, tests_run, health } => (
                "",
                format!(
                    r#"<span class="dot" style="background:{}"></span><span class="counts">{}/{}</span>"#,
                    Badge::for_health(*health).css_color(),
                    passed,
                    tests_run
                ),
            ),
        };
        out.push_str(&format!(
            "<button class=\"{class}\" style=\"padding-left:{}px\" data-path=\"{}\" data-id=\"{}\">{marker}<span class=\"name\">{}</span>{counts}</button>\n",
            row.indent_px,
            escape(&path),
            escape(&row.id),
            escape(&row.name)
        ));
    }
    out.push_str("</div>\n");
    out
}

/// Detail modal for an open leaf
pub fn detail_modal(view: &DetailView) -> String {
    let mut notices = String::new();
    for notice in &view.notices {
        let kind = match notice {
            qaboard_common::Notice::FailureReview { .. } => "failure_review",
            qaboard_common::Notice::AllClear => "all_clear",
        };
        notices.push_str(&format!(
            "<div class=\"notice {kind}\"><strong>{}</strong><p>{}</p></div>\n",
            notice.title(),
            notice.body()
        ));
    }

    format!(
        r#"<div class="modal-backdrop">
<div class="modal" role="dialog">
<h2>{name} <span class="badge" style="background:{color}">{health}</span></h2>
<div class="stats">
<div><strong>{tests_run}</strong><p>Total Tests</p></div>
<div><strong>{passed}</strong><p>Passed</p></div>
<div><strong>{failed}</strong><p>Failed</p></div>
</div>
<p>Pass Rate {rate}%</p>
<div class="progress"><div style="width:{progress:.1}%"></div></div>
{notices}<button type="button" data-close-detail>Close</button>
</div>
</div>
"#,
        name = escape(&view.name),
        color = view.badge.css_color(),
        health = view.health,
        tests_run = view.tests_run,
        passed = view.passed,
        failed = view.failed,
        rate = format_rate(view.pass_rate),
        progress = view.progress,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use qaboard_common::{builtin_fixture, Part, TreePath};
    use std::sync::Arc;

    fn mount() -> Dashboard {
        Dashboard::mount(Arc::new(builtin_fixture().unwrap()))
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_login_page_error_is_escaped() {
        let html = login_page(Some("<bad>"));
        assert!(html.contains("&lt;bad&gt;"));
        assert!(html.contains(r#"action="/login""#));
        assert!(!login_page(None).contains("class=\"error\""));
    }

    #[test]
    fn test_dashboard_header() {
        let dash = mount();
        let identity = Identity::new("<tester>").unwrap();
        let html = dashboard_page(&identity, &dash);
        assert!(html.contains("95.8% Pass Rate"));
        assert!(html.contains("7 Warnings"));
        assert!(!html.contains("badge critical"));
        assert!(html.contains("Welcome, &lt;tester&gt;"));
        assert!(!html.contains("modal-backdrop"));
    }

    #[test]
    fn test_diagram_draws_every_shape() {
        let dash = mount();
        let svg = diagram(&dash);
        assert_eq!(svg.matches("data-part=\"wheels\"").count(), 2);
        assert_eq!(svg.matches("data-part=").count(), 8);
        assert!(!svg.contains("pulse"));
    }

    #[test]
    fn test_highlight_pulses_part_and_row() {
        let mut dash = mount();
        dash.tree_click(&TreePath::new(["Core Vehicle Systems", "Powertrain", "Motor"]));
        assert!(diagram(&dash).contains(r##"class="part pulse" data-part="motor" fill="#ef4444""##));
        let rows = tree(&dash.tree_rows());
        assert_eq!(rows.matches("row highlighted").count(), 1);
        assert!(rows.contains(r#"data-id="motor""#));
    }

    #[test]
    fn test_tree_row_paths_are_attribute_safe() {
        let dash = mount();
        let rows = tree(&dash.tree_rows());
        assert!(rows.contains(r#"data-path="[&quot;Autopilot&quot;]""#));
        assert!(rows.contains("padding-left:8px"));
    }

    #[test]
    fn test_detail_modal() {
        let mut dash = mount();
        dash.diagram_click(Part::Motor);
        let html = dashboard_page(&Identity::new("qa").unwrap(), &dash);
        assert!(html.contains("modal-backdrop"));
        assert!(html.contains("Pass Rate 92.0%"));
        assert!(html.contains("2 tests failed"));
        assert!(html.contains("Review required before software rollout"));
        assert!(!html.contains("All systems operational"));
    }
}
