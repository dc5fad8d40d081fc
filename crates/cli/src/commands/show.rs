//! Show command

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use qaboard_common::{format_rate, DetailView, Health, Notice};

use super::Context;
use crate::output::{health_label, print_info, print_item, print_success, print_warning, TableDisplay};

#[derive(Args)]
pub struct ShowArgs {
    /// Leaf id (normalized name, e.g. `motor` or `lane-detection`)
    pub id: String,
}

/// Detail display wrapper for serialization
#[derive(Debug, Serialize)]
pub struct DetailDisplay {
    pub name: String,
    pub tests_run: u32,
    pub passed: u32,
    pub failed: u32,
    pub pass_rate: String,
    pub health: Health,
    pub notices: Vec<Notice>,
}

impl From<DetailView> for DetailDisplay {
    fn from(view: DetailView) -> Self {
        Self {
            name: view.name,
            tests_run: view.tests_run,
            passed: view.passed,
            failed: view.failed,
            pass_rate: format_rate(view.pass_rate),
            health: view.health,
            notices: view.notices,
        }
    }
}

impl TableDisplay for DetailDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Tests", "Passed", "Failed", "Pass Rate", "Health"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.tests_run.to_string(),
            self.passed.to_string(),
            self.failed.to_string(),
            format!("{}%", self.pass_rate),
            health_label(self.health),
        ]
    }
}

pub fn execute(args: ShowArgs, ctx: &Context) -> Result<()> {
    let tree = ctx.tree()?;
    let Some(view) = DetailView::open(&tree, &args.id) else {
        print_info(&format!("No leaf matches '{}'", args.id));
        return Ok(());
    };

    let display = DetailDisplay::from(view);
    print_item(&display, ctx.format);
    if ctx.format.is_human() {
        for notice in &display.notices {
            let line = format!("{}: {}", notice.title(), notice.body());
            match notice {
                Notice::FailureReview { .. } => print_warning(&line),
                Notice::AllClear => print_success(&line),
            }
        }
    }
    Ok(())
}
