//! Expand/collapse state and row projection for the system tree
//!
//! Every interior node is either expanded or collapsed. A node that was never
//! toggled shows its default: expanded when it sits less than
//! [`DEFAULT_EXPAND_DEPTH`] levels below the root. State only lives while a
//! node is mounted, i.e. while all of its ancestors are expanded; collapsing
//! a node forgets the state of everything beneath it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::locate::normalize;
use crate::{Health, ResultNode, ResultTree};

/// Nodes shallower than this start out expanded.
pub const DEFAULT_EXPAND_DEPTH: usize = 2;

/// Horizontal offset per level, in pixels.
pub const INDENT_STEP_PX: usize = 16;
const INDENT_BASE_PX: usize = 8;

/// Keys from the root down to a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath(Vec<String>);

impl TreePath {
    pub fn new<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// Zero for top-level nodes
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn child(&self, key: &str) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.to_string());
        Self(keys)
    }

    /// Strict descendant test
    pub fn is_descendant_of(&self, other: &TreePath) -> bool {
        self.0.len() > other.0.len() && self.0.starts_with(&other.0)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" / "))
    }
}

/// Event the tree raises toward the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    Select(String),
}

/// What a visible row shows besides its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowKind {
    Group { expanded: bool, child_count: usize },
    Leaf { passed: u32, tests_run: u32, health: Health },
}

/// One mounted node, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    pub path: TreePath,
    pub name: String,
    pub id: String,
    pub depth: usize,
    pub indent_px: usize,
    #[serde(flatten)]
    pub kind: RowKind,
    pub highlighted: bool,
}

/// Per-node expand state, keyed by path
#[derive(Debug, Clone, Default)]
pub struct TreeViewState {
    expanded: HashMap<TreePath, bool>,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_expanded(depth: usize) -> bool {
        depth < DEFAULT_EXPAND_DEPTH
    }

    pub fn is_expanded(&self, path: &TreePath) -> bool {
        self.expanded
            .get(path)
            .copied()
            .unwrap_or_else(|| Self::default_expanded(path.depth()))
    }

    /// A node is mounted when every proper ancestor is expanded.
    pub fn is_mounted(&self, path: &TreePath) -> bool {
        let keys = path.keys();
        (1..keys.len()).all(|len| self.is_expanded(&TreePath::new(keys[..len].iter().cloned())))
    }

    /// Flip one node and return its new state.
    pub fn toggle(&mut self, path: &TreePath) -> bool {
        let next = !self.is_expanded(path);
        self.expanded.insert(path.clone(), next);
        if !next {
            self.expanded.retain(|p, _| !p.is_descendant_of(path));
        }
        debug!("Tree node {} {}", path, if next { "expanded" } else { "collapsed" });
        next
    }

    /// Activate a row. Leaves raise a selection and keep their state; groups
    /// toggle and stay silent. Unknown or hidden paths are ignored.
    pub fn click(&mut self, tree: &ResultTree, path: &TreePath) -> Option<TreeEvent> {
        let Some(node) = tree.node_at(path.keys()) else {
            debug!("Ignoring click on unknown tree path {}", path);
            return None;
        };
        if !self.is_mounted(path) {
            debug!("Ignoring click on hidden tree path {}", path);
            return None;
        }
        match node {
            ResultNode::Leaf(_) => path.name().map(|name| TreeEvent::Select(normalize(name))),
            ResultNode::Interior(_) => {
                self.toggle(path);
                None
            }
        }
    }

    /// Expand every group in `tree`.
    pub fn expand_all(&mut self, tree: &ResultTree) {
        visit_groups(tree, &TreePath::new(Vec::<String>::new()), &mut |path| {
            self.expanded.insert(path, true);
        });
    }

    /// Collapse the top level, forgetting all other state.
    pub fn collapse_all(&mut self, tree: &ResultTree) {
        self.expanded.clear();
        for (key, node) in tree.iter() {
            if !node.is_leaf() {
                self.expanded.insert(TreePath::new([key]), false);
            }
        }
    }

    /// Project the mounted nodes into rows, pre-order.
    pub fn rows(&self, tree: &ResultTree, highlighted: Option<&str>) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        self.collect_rows(tree, &TreePath::new(Vec::<String>::new()), highlighted, &mut rows);
        rows
    }

    fn collect_rows(
        &self,
        tree: &ResultTree,
        parent: &TreePath,
        highlighted: Option<&str>,
        rows: &mut Vec<TreeRow>,
    ) {
        for (name, node) in tree.iter() {
            let path = parent.child(name);
            let id = normalize(name);
            let depth = path.depth();
            let kind = match node {
                ResultNode::Leaf(leaf) => RowKind::Leaf {
                    passed: leaf.passed,
                    tests_run: leaf.tests_run,
                    health: leaf.health,
                },
                ResultNode::Interior(children) => RowKind::Group {
                    expanded: self.is_expanded(&path),
                    child_count: children.len(),
                },
            };
            let descend = matches!(kind, RowKind::Group { expanded: true, .. });
            rows.push(TreeRow {
                path: path.clone(),
                name: name.to_string(),
                highlighted: highlighted == Some(id.as_str()),
                id,
                depth,
                indent_px: depth * INDENT_STEP_PX + INDENT_BASE_PX,
                kind,
            });
            if let (true, ResultNode::Interior(children)) = (descend, node) {
                self.collect_rows(children, &path, highlighted, rows);
            }
        }
    }
}

fn visit_groups(tree: &ResultTree, parent: &TreePath, f: &mut impl FnMut(TreePath)) {
    for (name, node) in tree.iter() {
        if let ResultNode::Interior(children) = node {
            let path = parent.child(name);
            f(path.clone());
            visit_groups(children, &path, f);
        }
    }
}
