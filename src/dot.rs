//! Diagram to DOT (Graphviz) conversion.
//!
//! The generated graph follows these conventions:
//! - **Leaves** are boxes labelled with their value, at the bottom (sink rank)
//! - **Branch nodes** are ellipses labelled with their condition index, and
//!   optionally with the affine form of the condition
//! - **Edges**: solid for the then-edge (condition `>= 0`), dashed for the
//!   else-edge
//!
//! Diagrams are trees, so every node is emitted once per occurrence.
//!
//! # Examples
//!
//! ```
//! use aadd_rs::manager::Manager;
//!
//! let mgr = Manager::default();
//! let x = mgr.uncertain(0.0, 4.0);
//! let y = mgr.ite(&mgr.gt(&x, &mgr.scalar(2.0)), &x, &mgr.scalar(0.0));
//!
//! let dot = mgr.to_dot(&y).unwrap();
//! assert!(dot.starts_with("digraph {"));
//! // Render with: dot -Tpng output.dot -o output.png
//! ```

use std::fmt::Write as _;

use crate::diagram::{Diagram, Terminal};
use crate::manager::Manager;

/// Configuration options for DOT output generation.
///
/// ```
/// use aadd_rs::dot::DotConfig;
/// use aadd_rs::manager::Manager;
///
/// let mgr = Manager::default();
/// let config = DotConfig {
///     show_conditions: false,
///     ..DotConfig::default()
/// };
/// let dot = mgr.to_dot_with_config(&mgr.one(), &config).unwrap();
/// assert!(dot.contains("true"));
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for branch nodes (default: "ellipse")
    pub node_shape: &'static str,
    /// Shape for leaves (default: "box")
    pub leaf_shape: &'static str,
    /// Style for then-edges (default: "solid")
    pub then_edge_style: &'static str,
    /// Style for else-edges (default: "dashed")
    pub else_edge_style: &'static str,
    /// Whether branch labels include the condition's affine form (default: true)
    pub show_conditions: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "ellipse",
            leaf_shape: "box",
            then_edge_style: "solid",
            else_edge_style: "dashed",
            show_conditions: true,
        }
    }
}

impl Manager {
    /// Converts a diagram to DOT format.
    pub fn to_dot<V: Terminal>(&self, f: &Diagram<V>) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(f, &DotConfig::default())
    }

    /// Converts a diagram to DOT format with custom configuration.
    pub fn to_dot_with_config<V: Terminal>(&self, f: &Diagram<V>, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut nodes = String::new();
        let mut leaves = String::new();
        let mut edges = String::new();
        let mut next_id = 0;
        self.write_dot_node(f, config, &mut next_id, &mut nodes, &mut leaves, &mut edges)?;

        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;
        dot.push_str(&nodes);
        writeln!(dot, "{{ rank=sink")?;
        dot.push_str(&leaves);
        writeln!(dot, "}}")?;
        dot.push_str(&edges);
        writeln!(dot, "}}")?;
        Ok(dot)
    }

    /// Emits `f` and its subtree, returning the id given to `f`.
    fn write_dot_node<V: Terminal>(
        &self,
        f: &Diagram<V>,
        config: &DotConfig,
        next_id: &mut usize,
        nodes: &mut String,
        leaves: &mut String,
        edges: &mut String,
    ) -> Result<usize, std::fmt::Error> {
        let id = *next_id;
        *next_id += 1;
        match f {
            Diagram::Leaf(leaf) => {
                writeln!(leaves, "{} [shape={}, label=\"{}\"];", id, config.leaf_shape, &**leaf)?;
            }
            Diagram::Branch {
                index,
                then_branch,
                else_branch,
            } => {
                if config.show_conditions {
                    let condition = self.condition(*index);
                    writeln!(nodes, "{} [label=\"{}: {} >= 0\"];", id, index, condition)?;
                } else {
                    writeln!(nodes, "{} [label=\"{}\"];", id, index)?;
                }
                let t = self.write_dot_node(then_branch, config, next_id, nodes, leaves, edges)?;
                let e = self.write_dot_node(else_branch, config, next_id, nodes, leaves, edges)?;
                writeln!(edges, "{} -> {} [style={}];", id, t, config.then_edge_style)?;
                writeln!(edges, "{} -> {} [style={}];", id, e, config.else_edge_style)?;
            }
        }
        Ok(id)
    }
}
