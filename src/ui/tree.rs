//! Flattening of the AST into the rows shown by the tree pane
//!
//! Each node gets a pre-order id over the *whole* tree, so ids stay stable
//! when subtrees are collapsed. Scalar children (names, integers, slice specs)
//! are folded into the node's label; only node children become rows.

use crate::parser::ast::{Child, Node};
use rustc_hash::FxHashSet;

/// Rough grouping used for colouring rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    Sequence,
    Statement,
    Expression,
    Literal,
}

impl NodeCategory {
    pub fn of(node: &Node) -> Self {
        match node {
            Node::Seq(..) | Node::Nil => NodeCategory::Sequence,
            Node::FunDecl { .. }
            | Node::Declare { .. }
            | Node::Assign { .. }
            | Node::Get(_)
            | Node::Put(_)
            | Node::CallStmt { .. }
            | Node::Return(_)
            | Node::While { .. }
            | Node::If { .. }
            | Node::Block(_) => NodeCategory::Statement,
            Node::Integer(_) | Node::IntIndex { .. } => NodeCategory::Literal,
            Node::Id(_)
            | Node::Index { .. }
            | Node::CallExp { .. }
            | Node::Paren(_)
            | Node::Bracket(_)
            | Node::List(_)
            | Node::UMinus(_)
            | Node::Not(_)
            | Node::BinaryOp { .. } => NodeCategory::Expression,
        }
    }
}

/// One visible line of the tree pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: usize,
    pub depth: usize,
    pub label: String,
    pub category: NodeCategory,
    pub expandable: bool,
    pub collapsed: bool,
}

/// Node-typed children only
fn child_nodes(node: &Node) -> Vec<&Node> {
    node.children()
        .into_iter()
        .filter_map(|child| match child {
            Child::Node(n) => Some(n),
            _ => None,
        })
        .collect()
}

/// Tag followed by the node's scalar children, e.g. `index x (1, 3)`
pub fn label(node: &Node) -> String {
    let mut label = node.tag().to_string();
    for child in node.children() {
        match child {
            Child::Node(_) => {}
            Child::Name(name) => {
                label.push(' ');
                label.push_str(name);
            }
            Child::Int(value) => label.push_str(&format!(" {}", value)),
            Child::Slice(slice) => label.push_str(&format!(" {}", slice)),
        }
    }
    label
}

/// Number of nodes in the subtree rooted at `node`, itself included
pub fn subtree_size(node: &Node) -> usize {
    let mut count = 0;
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        count += 1;
        pending.extend(child_nodes(node));
    }
    count
}

/// Ids of every node that has at least one node child
pub fn expandable_ids(root: &Node) -> FxHashSet<usize> {
    let mut ids = FxHashSet::default();
    let mut next_id = 0;
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        let children = child_nodes(node);
        if !children.is_empty() {
            ids.insert(next_id);
        }
        next_id += 1;
        pending.extend(children.into_iter().rev());
    }

    ids
}

/// Pre-order rows for `root`, skipping the descendants of collapsed nodes.
///
/// Walks with an explicit stack; a long statement list is a `seq` chain as
/// deep as it is long.
pub fn flatten(root: &Node, collapsed: &FxHashSet<usize>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut next_id = 0;
    let mut pending = vec![(root, 0)];

    while let Some((node, depth)) = pending.pop() {
        let id = next_id;
        next_id += 1;

        let children = child_nodes(node);
        let expandable = !children.is_empty();
        let is_collapsed = expandable && collapsed.contains(&id);

        rows.push(TreeRow {
            id,
            depth,
            label: label(node),
            category: NodeCategory::of(node),
            expandable,
            collapsed: is_collapsed,
        });

        if is_collapsed {
            // hidden descendants still consume ids
            next_id += children.into_iter().map(subtree_size).sum::<usize>();
            continue;
        }

        pending.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }

    rows
}
