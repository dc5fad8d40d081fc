//! Detail panel for a selected leaf

use serde::Serialize;

use crate::aggregate::pass_rate;
use crate::locate::find_leaf;
use crate::{Health, ResultTree};

/// Badge color derived from the health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Green,
    Amber,
    Red,
    Gray,
}

impl Badge {
    pub fn for_health(health: Health) -> Self {
        match health {
            Health::Good => Badge::Green,
            Health::Warning => Badge::Amber,
            Health::Critical => Badge::Red,
            Health::Unknown => Badge::Gray,
        }
    }

    pub fn css_color(&self) -> &'static str {
        match self {
            Badge::Green => "#22c55e",
            Badge::Amber => "#eab308",
            Badge::Red => "#ef4444",
            Badge::Gray => "#6b7280",
        }
    }
}

/// Extra messaging under the counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    FailureReview { failed: u32 },
    AllClear,
}

impl Notice {
    pub fn title(&self) -> String {
        match self {
            Notice::FailureReview { failed } => {
                format!("{} test{} failed", failed, if *failed == 1 { "" } else { "s" })
            }
            Notice::AllClear => "All systems operational".to_string(),
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            Notice::FailureReview { .. } => "Review required before software rollout",
            Notice::AllClear => "Ready for software rollout",
        }
    }
}

/// Everything the panel renders for one leaf
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub name: String,
    pub tests_run: u32,
    pub passed: u32,
    pub failed: u32,
    pub pass_rate: Option<f64>,
    /// Progress bar fill, 0..=100
    pub progress: f64,
    pub health: Health,
    pub badge: Badge,
    pub notices: Vec<Notice>,
}

impl DetailView {
    /// Resolve `selected_id` against `tree`. Misses and interior matches
    /// produce no panel.
    pub fn open(tree: &ResultTree, selected_id: &str) -> Option<Self> {
        if selected_id.is_empty() {
            return None;
        }
        let (name, leaf) = find_leaf(tree, selected_id)?;
        let failed = leaf.failed();
        let rate = pass_rate(u64::from(leaf.passed), u64::from(leaf.tests_run));

        let mut notices = Vec::new();
        if failed > 0 {
            notices.push(Notice::FailureReview { failed });
        }
        if leaf.health == Health::Good {
            notices.push(Notice::AllClear);
        }

        Some(Self {
            name: name.to_string(),
            tests_run: leaf.tests_run,
            passed: leaf.passed,
            failed,
            pass_rate: rate,
            progress: rate.unwrap_or(0.0).clamp(0.0, 100.0),
            health: leaf.health,
            badge: Badge::for_health(leaf.health),
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::format_rate;
    use crate::{builtin_fixture, LeafResult};

    #[test]
    fn test_motor_detail() {
        let tree = builtin_fixture().unwrap();
        let view = DetailView::open(&tree, "motor").unwrap();
        assert_eq!(view.name, "Motor");
        assert_eq!(view.failed, 2);
        assert_eq!(format_rate(view.pass_rate), "92.0");
        assert_eq!(view.health, Health::Warning);
        assert_eq!(view.badge, Badge::Amber);
        assert_eq!(view.notices, vec![Notice::FailureReview { failed: 2 }]);
        assert_eq!(view.notices[0].title(), "2 tests failed");
    }

    #[test]
    fn test_all_clear_leaf() {
        let tree = builtin_fixture().unwrap();
        let view = DetailView::open(&tree, "inverter").unwrap();
        assert_eq!(view.failed, 0);
        assert_eq!(view.progress, 100.0);
        assert_eq!(view.notices, vec![Notice::AllClear]);
        assert_eq!(view.badge, Badge::Green);
    }

    #[test]
    fn test_no_panel_for_misses_and_groups() {
        let tree = builtin_fixture().unwrap();
        assert!(DetailView::open(&tree, "").is_none());
        assert!(DetailView::open(&tree, "body").is_none());
        assert!(DetailView::open(&tree, "battery").is_none());
        assert!(DetailView::open(&tree, "autopilot").is_none());
    }

    #[test]
    fn test_both_notices_are_independent() {
        let tree = ResultTree::new()
            .with("Flaky", LeafResult::new(3, 2, Health::Good).unwrap())
            .with("Odd", LeafResult::new(1, 1, Health::Unknown).unwrap());
        let flaky = DetailView::open(&tree, "flaky").unwrap();
        assert_eq!(
            flaky.notices,
            vec![Notice::FailureReview { failed: 1 }, Notice::AllClear]
        );
        assert_eq!(flaky.notices[0].title(), "1 test failed");

        let odd = DetailView::open(&tree, "odd").unwrap();
        assert_eq!(odd.badge, Badge::Gray);
        assert!(odd.notices.is_empty());
    }

    #[test]
    fn test_zero_run_leaf_has_no_rate() {
        let tree = ResultTree::new().with("Idle", LeafResult::new(0, 0, Health::Critical).unwrap());
        let view = DetailView::open(&tree, "idle").unwrap();
        assert_eq!(view.pass_rate, None);
        assert_eq!(view.progress, 0.0);
        assert_eq!(view.badge, Badge::Red);
        assert!(view.notices.is_empty());
    }
}
