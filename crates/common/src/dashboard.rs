//! Dashboard coordinator
//!
//! Holds the selection state shared by the diagram, the tree and the detail
//! panel. The tree sets the highlighted id, which the diagram consumes; the
//! diagram sets the selected id, which opens the detail panel.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{aggregate, format_rate, Summary};
use crate::detail::DetailView;
use crate::diagram::{DiagramEvent, DiagramState, Part, PartStyle};
use crate::tree_view::{TreeEvent, TreePath, TreeRow, TreeViewState};
use crate::ResultTree;

/// Events a host shell forwards to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    PartSelected(String),
    TreeSelected(String),
    DetailClosed,
}

/// UI session state, created on mount and dropped on logout
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub highlighted_id: Option<String>,
    pub selected_id: Option<String>,
    pub tree_view: TreeViewState,
}

/// Header badges
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderStats {
    pub pass_rate: String,
    /// Shown only when non-zero
    pub critical: Option<usize>,
    /// Shown only when non-zero
    pub warnings: Option<usize>,
}

/// Diagram part with its current style
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartView {
    pub part: Part,
    pub style: PartStyle,
}

pub struct Dashboard {
    tree: Arc<ResultTree>,
    summary: Summary,
    selection: SelectionState,
    diagram: DiagramState,
}

impl Dashboard {
    /// Mount a dashboard over `tree`.
    pub fn mount(tree: Arc<ResultTree>) -> Self {
        let summary = aggregate(&tree);
        info!(
            "Dashboard mounted: {} tests, {} passed, {} warnings, {} critical",
            summary.total_tests, summary.total_passed, summary.warning_count, summary.critical_count
        );
        Self {
            tree,
            summary,
            selection: SelectionState::default(),
            diagram: DiagramState::new(),
        }
    }

    pub fn tree(&self) -> &ResultTree {
        &self.tree
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn diagram(&self) -> &DiagramState {
        &self.diagram
    }

    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::PartSelected(id) => self.on_part_select(&id),
            DashboardEvent::TreeSelected(id) => self.on_tree_select(&id),
            DashboardEvent::DetailClosed => self.on_detail_close(),
        }
    }

    pub fn on_part_select(&mut self, part_id: &str) {
        debug!("Selected id set to {}", part_id);
        self.selection.selected_id = Some(part_id.to_string());
    }

    pub fn on_tree_select(&mut self, id: &str) {
        debug!("Highlighted id set to {}", id);
        self.selection.highlighted_id = Some(id.to_string());
    }

    pub fn on_detail_close(&mut self) {
        self.selection.selected_id = None;
    }

    /// Route a tree activation. Returns the selection it raised, if any.
    pub fn tree_click(&mut self, path: &TreePath) -> Option<String> {
        let event = self.selection.tree_view.click(&self.tree, path)?;
        let TreeEvent::Select(id) = event;
        self.apply(DashboardEvent::TreeSelected(id.clone()));
        Some(id)
    }

    pub fn diagram_click(&mut self, part: Part) -> String {
        let DiagramEvent::Select(id) = self.diagram.click(part);
        self.apply(DashboardEvent::PartSelected(id.clone()));
        id
    }

    pub fn diagram_hover(&mut self, part: Option<Part>) {
        match part {
            Some(part) => self.diagram.pointer_enter(part),
            None => self.diagram.pointer_leave(),
        }
    }

    /// Open panel for the current selection. The tree is searched afresh on
    /// every call.
    pub fn detail(&self) -> Option<DetailView> {
        let id = self.selection.selected_id.as_deref()?;
        let view = DetailView::open(&self.tree, id);
        if view.is_none() {
            debug!("No leaf matches selected id {}", id);
        }
        view
    }

    pub fn tree_rows(&self) -> Vec<TreeRow> {
        self.selection
            .tree_view
            .rows(&self.tree, self.selection.highlighted_id.as_deref())
    }

    pub fn parts(&self) -> Vec<PartView> {
        let highlighted = self.selection.highlighted_id.as_deref();
        Part::ALL
            .iter()
            .map(|&part| PartView {
                part,
                style: self.diagram.style(part, highlighted),
            })
            .collect()
    }

    pub fn header(&self) -> HeaderStats {
        HeaderStats {
            pass_rate: format_rate(self.summary.pass_rate()),
            critical: Some(self.summary.critical_count).filter(|n| *n > 0),
            warnings: Some(self.summary.warning_count).filter(|n| *n > 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_fixture;

    fn mount() -> Dashboard {
        Dashboard::mount(Arc::new(builtin_fixture().unwrap()))
    }

    #[test]
    fn test_header_stats() {
        let dash = mount();
        assert_eq!(
            dash.header(),
            HeaderStats {
                pass_rate: "95.8".into(),
                critical: None,
                warnings: Some(7),
            }
        );
    }

    #[test]
    fn test_tree_selection_highlights_diagram() {
        let mut dash = mount();
        let id = dash.tree_click(&TreePath::new(["Core Vehicle Systems", "Powertrain", "Motor"]));
        assert_eq!(id.as_deref(), Some("motor"));
        assert_eq!(dash.selection().highlighted_id.as_deref(), Some("motor"));
        assert_eq!(dash.selection().selected_id, None);

        let motor = dash.parts().into_iter().find(|p| p.part == Part::Motor).unwrap();
        assert!(motor.style.pulse);
        assert!(dash.tree_rows().iter().any(|r| r.name == "Motor" && r.highlighted));
        assert!(dash.detail().is_none());
    }

    #[test]
    fn test_diagram_selection_opens_detail() {
        let mut dash = mount();
        assert_eq!(dash.diagram_click(Part::Motor), "motor");
        let view = dash.detail().unwrap();
        assert_eq!(view.name, "Motor");
        assert_eq!(view.failed, 2);

        dash.apply(DashboardEvent::DetailClosed);
        assert!(dash.detail().is_none());
        assert_eq!(dash.selection().selected_id, None);
    }

    #[test]
    fn test_unmatched_part_selects_without_panel() {
        let mut dash = mount();
        for part in [Part::Body, Part::Front, Part::Battery, Part::Wheels, Part::Autopilot, Part::Infotainment] {
            dash.diagram_click(part);
            assert_eq!(dash.selection().selected_id.as_deref(), Some(part.id()));
            assert!(dash.detail().is_none());
        }
    }

    #[test]
    fn test_group_click_emits_nothing() {
        let mut dash = mount();
        assert_eq!(dash.tree_click(&TreePath::new(["Autopilot"])), None);
        assert_eq!(dash.selection().highlighted_id, None);
        assert_eq!(dash.tree_rows().len(), 24);
    }

    #[test]
    fn test_hover_styles_only_one_part() {
        let mut dash = mount();
        dash.diagram_hover(Some(Part::Battery));
        let active: Vec<Part> = dash
            .parts()
            .into_iter()
            .filter(|p| p.style.fill == "#ef4444")
            .map(|p| p.part)
            .collect();
        assert_eq!(active, vec![Part::Battery]);
        dash.diagram_hover(None);
        assert_eq!(dash.diagram().tooltip(), None);
    }
}
