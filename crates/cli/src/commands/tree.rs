//! Tree command

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use qaboard_common::tree_view::RowKind;
use qaboard_common::{Health, ResultTree, TreeRow, TreeViewState};

use super::Context;
use crate::output::{health_label, print_list, TableDisplay};

#[derive(Args)]
pub struct TreeArgs {
    /// Expand every group
    #[arg(long, conflicts_with = "collapsed")]
    pub all: bool,

    /// Show only the top level
    #[arg(long)]
    pub collapsed: bool,

    /// Highlight the node with this id
    #[arg(long)]
    pub highlight: Option<String>,
}

/// Tree row display wrapper for serialization
#[derive(Debug, Serialize)]
pub struct RowDisplay {
    pub path: String,
    pub id: String,
    pub depth: usize,
    #[serde(skip)]
    pub label: String,
    pub passed: Option<u32>,
    pub tests_run: Option<u32>,
    pub health: Option<Health>,
    pub highlighted: bool,
}

impl From<TreeRow> for RowDisplay {
    fn from(row: TreeRow) -> Self {
        let indent = "  ".repeat(row.depth);
        let (label, passed, tests_run, health) = match row.kind {
            RowKind::Group { expanded, child_count } => {
                let marker = if expanded { "▾" } else { "▸" };
                (format!("{indent}{marker} {} ({child_count})", row.name), None, None, None)
            }
            RowKind::Leaf { passed, tests_run, health } => {
                (format!("{indent}  {}", row.name), Some(passed), Some(tests_run), Some(health))
            }
        };
        let label = if row.highlighted { format!("{label} ◀") } else { label };
        Self {
            path: row.path.to_string(),
            id: row.id,
            depth: row.depth,
            label,
            passed,
            tests_run,
            health,
            highlighted: row.highlighted,
        }
    }
}

impl TableDisplay for RowDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Node", "ID", "Passed", "Health"]
    }

    fn row(&self) -> Vec<String> {
        let passed = match (self.passed, self.tests_run) {
            (Some(p), Some(t)) => format!("{}/{}", p, t),
            _ => String::new(),
        };
        vec![
            self.label.clone(),
            self.id.clone(),
            passed,
            self.health.map(health_label).unwrap_or_default(),
        ]
    }
}

fn rows(tree: &ResultTree, args: &TreeArgs) -> Vec<RowDisplay> {
    let mut state = TreeViewState::new();
    if args.all {
        state.expand_all(tree);
    } else if args.collapsed {
        state.collapse_all(tree);
    }
    state
        .rows(tree, args.highlight.as_deref())
        .into_iter()
        .map(RowDisplay::from)
        .collect()
}

pub fn execute(args: TreeArgs, ctx: &Context) -> Result<()> {
    let tree = ctx.tree()?;
    print_list(&rows(&tree, &args), ctx.format);
    Ok(())
}
