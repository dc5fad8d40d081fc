//! Summary command

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use qaboard_common::{aggregate, aggregate_node, find, format_rate, Error, ResultTree, Summary};

use super::Context;
use crate::output::{print_item, TableDisplay};

#[derive(Args)]
pub struct SummaryArgs {
    /// Roll up only the node with this id (e.g. `autopilot`)
    #[arg(long)]
    pub node: Option<String>,
}

/// Summary display wrapper for serialization
#[derive(Debug, Serialize)]
pub struct SummaryDisplay {
    pub scope: String,
    pub leaves: usize,
    pub total_tests: u64,
    pub passed: u64,
    pub failed: u64,
    pub pass_rate: String,
    pub warnings: usize,
    pub critical: usize,
}

impl SummaryDisplay {
    fn new(scope: &str, summary: &Summary) -> Self {
        Self {
            scope: scope.to_string(),
            leaves: summary.leaf_count,
            total_tests: summary.total_tests,
            passed: summary.total_passed,
            failed: summary.failed(),
            pass_rate: format_rate(summary.pass_rate()),
            warnings: summary.warning_count,
            critical: summary.critical_count,
        }
    }
}

impl TableDisplay for SummaryDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Scope", "Leaves", "Tests", "Passed", "Failed", "Pass Rate", "Warnings", "Critical"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.scope.clone(),
            self.leaves.to_string(),
            self.total_tests.to_string(),
            self.passed.to_string(),
            self.failed.to_string(),
            format!("{}%", self.pass_rate),
            self.warnings.to_string(),
            self.critical.to_string(),
        ]
    }
}

fn summarize(tree: &ResultTree, node: Option<&str>) -> Result<SummaryDisplay> {
    match node {
        None => Ok(SummaryDisplay::new("vehicle", &aggregate(tree))),
        Some(id) => {
            let located = find(tree, id).ok_or_else(|| Error::NotFound {
                kind: "node".to_string(),
                id: id.to_string(),
            })?;
            Ok(SummaryDisplay::new(located.name, &aggregate_node(located.node)))
        }
    }
}

pub fn execute(args: SummaryArgs, ctx: &Context) -> Result<()> {
    let tree = ctx.tree()?;
    let display = summarize(&tree, args.node.as_deref())?;
    print_item(&display, ctx.format);
    Ok(())
}
