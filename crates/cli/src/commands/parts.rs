//! Parts command

use anyhow::Result;
use serde::Serialize;

use qaboard_common::{find, Part, ResultNode, ResultTree};

use super::Context;
use crate::output::{print_list, TableDisplay};

/// Diagram part display wrapper for serialization
#[derive(Debug, Serialize)]
pub struct PartDisplay {
    pub id: &'static str,
    pub label: &'static str,
    /// Name of the first tree node the id resolves to
    pub node: Option<String>,
    /// Whether selecting the part opens a detail panel
    pub opens_detail: bool,
}

impl PartDisplay {
    fn resolve(part: Part, tree: &ResultTree) -> Self {
        let located = find(tree, part.id());
        Self {
            id: part.id(),
            label: part.label(),
            node: located.map(|l| l.name.to_string()),
            opens_detail: matches!(located, Some(l) if matches!(l.node, ResultNode::Leaf(_))),
        }
    }
}

impl TableDisplay for PartDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Label", "Tree Node", "Detail"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.label.to_string(),
            self.node.clone().unwrap_or_else(|| "-".to_string()),
            if self.opens_detail { "yes" } else { "no" }.to_string(),
        ]
    }
}

pub fn execute(ctx: &Context) -> Result<()> {
    let tree = ctx.tree()?;
    let parts: Vec<PartDisplay> = Part::ALL
        .iter()
        .map(|&part| PartDisplay::resolve(part, &tree))
        .collect();
    print_list(&parts, ctx.format);
    Ok(())
}
