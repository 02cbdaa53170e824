//! Iterator over root-to-leaf paths of a diagram.
//!
//! Each path is the sequence of branch decisions taken, `(index, true)` for a
//! then-edge and `(index, false)` for an else-edge, together with the leaf it
//! ends in.
//!
//! # Example
//!
//! ```
//! use aadd_rs::manager::Manager;
//!
//! let mgr = Manager::default();
//! let x = mgr.uncertain(0.0, 4.0);
//! let c = mgr.gt(&x, &mgr.scalar(2.0));
//! let y = mgr.ite(&c, &x, &mgr.scalar(0.0));
//!
//! for (path, leaf) in y.paths() {
//!     println!("{:?} => {}", path, leaf);
//! }
//! assert_eq!(y.paths().count(), 2);
//! ```
//!
//! The number of paths equals the number of leaves, which can grow
//! exponentially with the number of conditions.

use crate::diagram::Diagram;
use crate::types::CondId;

impl<V: 'static> Diagram<V> {
    /// Returns an iterator over all root-to-leaf paths, then-edges first.
    pub fn paths(&self) -> DiagramPaths<'_, V> {
        DiagramPaths::new(self)
    }
}

/// Iterator over the paths of a diagram.
///
/// Created by [`Diagram::paths()`]. The current path is kept in a single
/// vector that grows and shrinks during the depth-first traversal.
pub struct DiagramPaths<'a, V: 'static> {
    /// Nodes still to visit, with the length of the path leading to them
    stack: Vec<(&'a Diagram<V>, usize, Option<(CondId, bool)>)>,
    current_path: Vec<(CondId, bool)>,
}

impl<'a, V: 'static> DiagramPaths<'a, V> {
    pub fn new(f: &'a Diagram<V>) -> Self {
        DiagramPaths {
            stack: vec![(f, 0, None)],
            current_path: Vec::new(),
        }
    }
}

impl<'a, V: 'static> Iterator for DiagramPaths<'a, V> {
    type Item = (Vec<(CondId, bool)>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, len, step) = self.stack.pop()?;
            self.current_path.truncate(len);
            if let Some(step) = step {
                self.current_path.push(step);
            }

            match node {
                Diagram::Leaf(leaf) => return Some((self.current_path.clone(), &**leaf)),
                Diagram::Branch {
                    index,
                    then_branch,
                    else_branch,
                } => {
                    let len = self.current_path.len();
                    self.stack.push((&**else_branch, len, Some((*index, false))));
                    self.stack.push((&**then_branch, len, Some((*index, true))));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::manager::Manager;

    #[test]
    fn test_paths_leaf() {
        let mgr = Manager::default();
        let f = mgr.scalar(1.0);
        let paths: Vec<_> = f.paths().collect();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].0.is_empty());
        assert_eq!(paths[0].1.center(), 1.0);
    }

    #[test]
    fn test_paths_nested() {
        let mgr = Manager::default();
        let x = mgr.uncertain(0.0, 4.0);
        let a = mgr.gt(&x, &mgr.scalar(1.0));
        let b = mgr.gt(&x, &mgr.scalar(3.0));
        let f = mgr.apply_and(&a, &b);

        let paths: Vec<_> = f.paths().collect();
        assert_eq!(paths.len(), f.num_leaves());
        let (ca, cb) = (a.index(), b.index());
        assert_eq!(paths[0], (vec![(ca, true), (cb, true)], &true));
        assert_eq!(paths[1], (vec![(ca, true), (cb, false)], &false));
        assert_eq!(paths[2], (vec![(ca, false)], &false));
    }
}
