//! Roll-up of leaf counters into dashboard-wide totals

use serde::Serialize;

use crate::{Health, ResultNode, ResultTree};

/// Totals over every leaf of a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_tests: u64,
    pub total_passed: u64,
    pub critical_count: usize,
    pub warning_count: usize,
    pub leaf_count: usize,
}

impl Summary {
    pub fn failed(&self) -> u64 {
        self.total_tests.saturating_sub(self.total_passed)
    }

    /// Percentage of passed tests, `None` when no tests ran.
    pub fn pass_rate(&self) -> Option<f64> {
        pass_rate(self.total_passed, self.total_tests)
    }

    fn add_leaf(&mut self, tests_run: u32, passed: u32, health: Health) {
        self.total_tests += u64::from(tests_run);
        self.total_passed += u64::from(passed);
        self.leaf_count += 1;
        match health {
            Health::Critical => self.critical_count += 1,
            Health::Warning => self.warning_count += 1,
            Health::Good | Health::Unknown => {}
        }
    }
}

/// Walk every node and sum leaf counters. Interior nodes contribute nothing
/// of their own.
pub fn aggregate(tree: &ResultTree) -> Summary {
    let mut summary = Summary::default();
    accumulate(tree, &mut summary);
    summary
}

/// Aggregate a single node, which may itself be a leaf.
pub fn aggregate_node(node: &ResultNode) -> Summary {
    match node {
        ResultNode::Leaf(leaf) => {
            let mut summary = Summary::default();
            summary.add_leaf(leaf.tests_run, leaf.passed, leaf.health);
            summary
        }
        ResultNode::Interior(tree) => aggregate(tree),
    }
}

fn accumulate(tree: &ResultTree, summary: &mut Summary) {
    for (_, node) in tree.iter() {
        match node {
            ResultNode::Leaf(leaf) => summary.add_leaf(leaf.tests_run, leaf.passed, leaf.health),
            ResultNode::Interior(children) => accumulate(children, summary),
        }
    }
}

/// `100 * passed / total`, or `None` for an empty denominator.
pub fn pass_rate(passed: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(passed as f64 / total as f64 * 100.0)
    }
}

/// One-decimal rendering used by every surface.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}", rate),
        None => "n/a".to_string(),
    }
}
