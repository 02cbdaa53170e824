//! Debug utilities for inspecting diagram structure.
//!
//! These are primarily useful in tests, demos and during development.

use std::fmt;

use crate::diagram::{Diagram, Terminal};
use crate::manager::Manager;
use crate::types::CondId;

/// Edge by which a node was reached from its parent.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Edge {
    Root,
    Then,
    Else,
}

/// Information about a single node of a diagram.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    /// Distance from the root
    pub depth: usize,
    /// Edge leading to this node
    pub edge: Edge,
    /// Condition index (`CondId::TERMINAL` for leaves)
    pub index: CondId,
    /// Condition of a branch node, or value of a leaf
    pub label: String,
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(self.depth);
        let arrow = match self.edge {
            Edge::Root => "",
            Edge::Then => "---------> ",
            Edge::Else => "- - - - -> ",
        };
        if self.index.is_terminal() {
            write!(f, "{}{}leaf: {}", indent, arrow, self.label)
        } else {
            write!(f, "{}{}{}: {} >= 0", indent, arrow, self.index, self.label)
        }
    }
}

/// Depth-first listing of the nodes of a diagram, then-edges first.
#[derive(Debug, Clone)]
pub struct DiagramTree {
    pub nodes: Vec<NodeInfo>,
}

impl fmt::Display for DiagramTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl Manager {
    /// Collects the nodes of `f` in depth-first order.
    pub fn debug_tree<V: Terminal>(&self, f: &Diagram<V>) -> DiagramTree {
        let mut nodes = Vec::new();
        let mut stack = vec![(f, 0, Edge::Root)];

        while let Some((node, depth, edge)) = stack.pop() {
            match node {
                Diagram::Leaf(leaf) => nodes.push(NodeInfo {
                    depth,
                    edge,
                    index: CondId::TERMINAL,
                    label: (**leaf).to_string(),
                }),
                Diagram::Branch {
                    index,
                    then_branch,
                    else_branch,
                } => {
                    nodes.push(NodeInfo {
                        depth,
                        edge,
                        index: *index,
                        label: self.condition(*index).to_string(),
                    });
                    stack.push((&**else_branch, depth + 1, Edge::Else));
                    stack.push((&**then_branch, depth + 1, Edge::Then));
                }
            }
        }

        DiagramTree { nodes }
    }

    /// Indented multi-line dump of `f`.
    pub fn debug_string<V: Terminal>(&self, f: &Diagram<V>) -> String {
        self.debug_tree(f).to_string()
    }
}

impl<V: Terminal> Diagram<V> {
    /// Compact one-line form: `(c0 ? then : else)` for branch nodes, the value
    /// for leaves.
    pub fn to_bracket_string(&self) -> String {
        match self {
            Diagram::Leaf(leaf) => (**leaf).to_string(),
            Diagram::Branch {
                index,
                then_branch,
                else_branch,
            } => format!(
                "({} ? {} : {})",
                index,
                then_branch.to_bracket_string(),
                else_branch.to_bracket_string()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_debug_tree() {
        let mgr = Manager::default();
        let x = mgr.uncertain(0.0, 2.0);
        let c = mgr.gt(&x, &mgr.scalar(1.0));

        let tree = mgr.debug_tree(&c);
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.nodes[0].edge, Edge::Root);
        assert_eq!(tree.nodes[0].index, CondId::new(0));
        assert_eq!(tree.nodes[1].edge, Edge::Then);
        assert_eq!(tree.nodes[1].label, "true");
        assert_eq!(tree.nodes[2].edge, Edge::Else);
        assert_eq!(tree.nodes[2].depth, 1);

        let dump = mgr.debug_string(&c);
        let lines: Vec<_> = dump.lines().collect();
        assert!(lines[0].starts_with("c0: "));
        assert_eq!(lines[1], "  ---------> leaf: true");
        assert_eq!(lines[2], "  - - - - -> leaf: false");
    }

    #[test]
    fn test_bracket_string() {
        let mgr = Manager::default();
        assert_eq!(mgr.scalar(2.0).to_bracket_string(), "2");

        let x = mgr.uncertain(0.0, 2.0);
        let c = mgr.gt(&x, &mgr.scalar(1.0));
        assert_eq!(c.to_bracket_string(), "(c0 ? true : false)");
    }
}
