//! Node lookup by normalized identifier
//!
//! Views never exchange raw display keys. They exchange identifiers produced
//! by [`normalize`], and the detail panel resolves an identifier back to a
//! node with [`find`].

use crate::{LeafResult, ResultNode, ResultTree};

/// Characters that separate words in a display key.
///
/// Matches the ECMAScript `\s` class: Unicode whitespace plus U+FEFF, but
/// not U+0085 (NEL).
fn is_separator(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{feff}' => true,
        _ => c.is_whitespace(),
    }
}

/// Lower-case `name` and collapse every run of whitespace into one hyphen.
///
/// Leading and trailing runs are replaced too, so `" Motor "` becomes
/// `"-motor-"`. Applying it twice yields the same identifier.
pub fn normalize(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if is_separator(c) {
            if !in_space {
                id.push('-');
                in_space = true;
            }
        } else {
            id.extend(c.to_lowercase());
            in_space = false;
        }
    }
    id
}

/// A node found by [`find`], annotated with its original key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located<'a> {
    pub name: &'a str,
    pub node: &'a ResultNode,
    pub depth: usize,
}

impl<'a> Located<'a> {
    pub fn leaf(&self) -> Option<&'a LeafResult> {
        self.node.as_leaf()
    }
}

/// Pre-order depth-first search for the first key whose normalized form
/// equals `target_id`. Interior nodes match as well as leaves.
pub fn find<'a>(tree: &'a ResultTree, target_id: &str) -> Option<Located<'a>> {
    find_at(tree, target_id, 0)
}

fn find_at<'a>(tree: &'a ResultTree, target_id: &str, depth: usize) -> Option<Located<'a>> {
    for (name, node) in tree.iter() {
        if normalize(name) == target_id {
            return Some(Located { name, node, depth });
        }
        if let ResultNode::Interior(children) = node {
            if let Some(found) = find_at(children, target_id, depth + 1) {
                return Some(found);
            }
        }
    }
    None
}

/// Like [`find`] but only yields a match that is a leaf.
pub fn find_leaf<'a>(tree: &'a ResultTree, target_id: &str) -> Option<(&'a str, &'a LeafResult)> {
    let found = find(tree, target_id)?;
    found.leaf().map(|leaf| (found.name, leaf))
}
