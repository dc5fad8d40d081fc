//! Core types for qaboard
//!
//! A [`ResultTree`] is an ordered grouping of named nodes. Each node is either
//! a [`LeafResult`] carrying test counters or another grouping. On the wire
//! the two are told apart the way the test-results feed does it: an object is
//! a leaf iff it carries a `testsRun` field.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Health classification attached to a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Health {
    Good,
    Warning,
    Critical,
    /// Any label the feed uses that is not one of the three above
    #[serde(other)]
    Unknown,
}

impl Health {
    /// Map a feed label onto a classification; unrecognised labels are `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Good" => Health::Good,
            "Warning" => Health::Warning,
            "Critical" => Health::Critical,
            _ => Health::Unknown,
        }
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Health::Good => write!(f, "Good"),
            Health::Warning => write!(f, "Warning"),
            Health::Critical => write!(f, "Critical"),
            Health::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Test counters for one leaf subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafResult {
    pub tests_run: u32,
    pub passed: u32,
    pub health: Health,
}

impl LeafResult {
    pub fn new(tests_run: u32, passed: u32, health: Health) -> Result<Self> {
        if passed > tests_run {
            return Err(Error::InvalidLeaf { tests_run, passed });
        }
        Ok(Self {
            tests_run,
            passed,
            health,
        })
    }

    pub fn failed(&self) -> u32 {
        self.tests_run.saturating_sub(self.passed)
    }
}

/// A node of the result tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultNode {
    Leaf(LeafResult),
    Interior(ResultTree),
}

impl ResultNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, ResultNode::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafResult> {
        match self {
            ResultNode::Leaf(leaf) => Some(leaf),
            ResultNode::Interior(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ResultTree> {
        match self {
            ResultNode::Leaf(_) => None,
            ResultNode::Interior(tree) => Some(tree),
        }
    }
}

impl From<LeafResult> for ResultNode {
    fn from(leaf: LeafResult) -> Self {
        ResultNode::Leaf(leaf)
    }
}

impl From<ResultTree> for ResultNode {
    fn from(tree: ResultTree) -> Self {
        ResultNode::Interior(tree)
    }
}

/// Ordered mapping from display key to node
///
/// Entry order is the feed's declaration order and is preserved through
/// (de)serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTree {
    entries: Vec<(String, ResultNode)>,
}

impl ResultTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries in order. A repeated key keeps its first position
    /// and takes the last value.
    pub fn from_entries(entries: Vec<(String, ResultNode)>) -> Self {
        let mut tree = Self::new();
        for (key, node) in entries {
            tree.insert(key, node);
        }
        tree
    }

    /// Insert or replace. Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<ResultNode>) {
        let key = key.into();
        let node = node.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = node,
            None => self.entries.push((key, node)),
        }
    }

    /// Builder-style insert, keeping declaration order
    pub fn with(mut self, key: impl Into<String>, node: impl Into<ResultNode>) -> Self {
        self.insert(key, node);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct child lookup by exact key
    pub fn get(&self, key: &str) -> Option<&ResultNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Walk a key path from this tree's root.
    pub fn node_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&ResultNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.get(first.as_ref())?;
        for key in rest {
            node = node.as_tree()?.get(key.as_ref())?;
        }
        Some(node)
    }

    /// Reorder siblings at this level only.
    pub fn entries_mut(&mut self) -> &mut Vec<(String, ResultNode)> {
        &mut self.entries
    }
}

// ============================================================================
// Wire format
// ============================================================================

impl Serialize for ResultTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl Serialize for ResultNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ResultNode::Leaf(leaf) => leaf.serialize(serializer),
            ResultNode::Interior(tree) => tree.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ResultNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(NodeVisitor)
    }
}

impl<'de> Deserialize<'de> for ResultTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match deserializer.deserialize_map(NodeVisitor)? {
            ResultNode::Interior(tree) => Ok(tree),
            ResultNode::Leaf(_) => Err(de::Error::custom(
                "the root of a result tree must be a grouping, not a leaf",
            )),
        }
    }
}

/// Value under one of the leaf field names; may still be a child group.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Count(u64),
    Label(String),
    Node(ResultNode),
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = ResultNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a test result leaf or a grouping of result nodes")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<ResultNode, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tests_run: Option<u64> = None;
        let mut passed: Option<u64> = None;
        let mut health: Option<String> = None;
        let mut children = ResultTree::new();

        while let Some(key) = map.next_key::<String>()? {
            if !matches!(key.as_str(), "testsRun" | "passed" | "health") {
                let node = map.next_value::<ResultNode>()?;
                children.insert(key, node);
                continue;
            }
            match map.next_value::<FieldValue>()? {
                FieldValue::Count(n) if key == "testsRun" => tests_run = Some(n),
                FieldValue::Count(n) if key == "passed" => passed = Some(n),
                FieldValue::Label(s) if key == "health" => health = Some(s),
                FieldValue::Node(node) => children.insert(key, node),
                _ => {
                    return Err(de::Error::custom(format!(
                        "field `{}` has the wrong type",
                        key
                    )))
                }
            }
        }

        let Some(tests_run) = tests_run else {
            if passed.is_some() || health.is_some() {
                return Err(de::Error::missing_field("testsRun"));
            }
            return Ok(ResultNode::Interior(children));
        };

        if let Some((key, _)) = children.iter().next() {
            return Err(de::Error::custom(format!(
                "leaf result cannot contain child `{}`",
                key
            )));
        }
        let passed = passed.ok_or_else(|| de::Error::missing_field("passed"))?;
        let health = health.ok_or_else(|| de::Error::missing_field("health"))?;

        let tests_run = u32::try_from(tests_run).map_err(de::Error::custom)?;
        let passed = u32::try_from(passed).map_err(de::Error::custom)?;
        let health = Health::from_label(&health);

        LeafResult::new(tests_run, passed, health)
            .map(ResultNode::Leaf)
            .map_err(de::Error::custom)
    }
}
