//! Generic decision diagrams.
//!
//! A [`Diagram<V>`] is either a leaf holding a value of type `V`, or a branch
//! node testing a registered condition (by [`CondId`]) with a `then` child for
//! the condition being `>= 0` and an `else` child for `<= 0`.
//!
//! Diagrams are trees: every branch node is exclusively owned by its parent, and
//! cloning a diagram deep-copies it. The only shared values are the two
//! canonical boolean leaves, which are `'static` and referenced through
//! [`Leaf::Canonical`], so they can never be freed by a diagram.
//!
//! Reduction is inline: [`Diagram::branch`] never builds a node whose children
//! are equal. All algorithms here build their results bottom-up through it.
//!
//! # Ordering
//!
//! Along every root-to-leaf path condition indices strictly increase. Binary
//! algorithms recurse on the smallest index of their operands, cofactoring the
//! operand whose top index is larger as a no-op.

use std::convert::Infallible;
use std::fmt;
use std::ops::Deref;

use log::debug;

use crate::affine::AffineForm;
use crate::types::CondId;

static TRUE: bool = true;
static FALSE: bool = false;

/// Value that can sit in a diagram leaf.
pub trait Terminal: Clone + PartialEq + fmt::Display + 'static {
    /// Returns the process-wide shared instance equal to `self`, if the leaf
    /// kind has one.
    fn canonical(&self) -> Option<&'static Self> {
        None
    }
}

impl Terminal for bool {
    fn canonical(&self) -> Option<&'static bool> {
        Some(if *self { &TRUE } else { &FALSE })
    }
}

impl Terminal for AffineForm {}

/// Leaf value: owned by the diagram or a reference to a canonical instance.
#[derive(Debug, Clone)]
pub enum Leaf<V: 'static> {
    Owned(V),
    Canonical(&'static V),
}

impl<V: Terminal> Leaf<V> {
    pub fn new(value: V) -> Self {
        match value.canonical() {
            Some(shared) => Leaf::Canonical(shared),
            None => Leaf::Owned(value),
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, Leaf::Canonical(_))
    }

    pub fn into_value(self) -> V {
        match self {
            Leaf::Owned(value) => value,
            Leaf::Canonical(value) => value.clone(),
        }
    }
}

impl<V: 'static> Deref for Leaf<V> {
    type Target = V;

    fn deref(&self) -> &V {
        match self {
            Leaf::Owned(value) => value,
            Leaf::Canonical(value) => value,
        }
    }
}

impl<V: PartialEq + 'static> PartialEq for Leaf<V> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

/// A decision diagram with leaves of type `V`.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagram<V: 'static> {
    Leaf(Leaf<V>),
    Branch {
        index: CondId,
        then_branch: Box<Diagram<V>>,
        else_branch: Box<Diagram<V>>,
    },
}

impl<V: Terminal> Diagram<V> {
    pub fn leaf(value: V) -> Self {
        Diagram::Leaf(Leaf::new(value))
    }

    /// Creates a branch node, or returns `then_branch` if both children are
    /// equal.
    pub fn branch(index: CondId, then_branch: Diagram<V>, else_branch: Diagram<V>) -> Self {
        debug_assert!(index < then_branch.index() && index < else_branch.index());
        if then_branch == else_branch {
            debug!("branch({}): children are equal", index);
            return then_branch;
        }
        Diagram::Branch {
            index,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }
}

impl<V: 'static> Diagram<V> {
    /// Condition index of the root, [`CondId::TERMINAL`] for a leaf.
    pub fn index(&self) -> CondId {
        match self {
            Diagram::Leaf(_) => CondId::TERMINAL,
            Diagram::Branch { index, .. } => *index,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Diagram::Leaf(_))
    }

    /// Value of the root if it is a leaf.
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Diagram::Leaf(leaf) => Some(&**leaf),
            Diagram::Branch { .. } => None,
        }
    }

    pub fn then_branch(&self) -> Option<&Diagram<V>> {
        match self {
            Diagram::Leaf(_) => None,
            Diagram::Branch { then_branch, .. } => Some(&**then_branch),
        }
    }

    pub fn else_branch(&self) -> Option<&Diagram<V>> {
        match self {
            Diagram::Leaf(_) => None,
            Diagram::Branch { else_branch, .. } => Some(&**else_branch),
        }
    }

    /// Returns the `(then, else)` cofactors with respect to `index`.
    ///
    /// A diagram whose root index differs from `index` does not depend on it,
    /// so both cofactors are the diagram itself.
    pub fn cofactors(&self, index: CondId) -> (&Diagram<V>, &Diagram<V>) {
        match self {
            Diagram::Branch {
                index: i,
                then_branch,
                else_branch,
            } if *i == index => (&**then_branch, &**else_branch),
            _ => (self, self),
        }
    }

    /// Number of leaves.
    pub fn num_leaves(&self) -> usize {
        match self {
            Diagram::Leaf(_) => 1,
            Diagram::Branch {
                then_branch,
                else_branch,
                ..
            } => then_branch.num_leaves() + else_branch.num_leaves(),
        }
    }

    /// Number of branch nodes.
    pub fn num_nodes(&self) -> usize {
        match self {
            Diagram::Leaf(_) => 0,
            Diagram::Branch {
                then_branch,
                else_branch,
                ..
            } => 1 + then_branch.num_nodes() + else_branch.num_nodes(),
        }
    }

    /// Length of the longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        match self {
            Diagram::Leaf(_) => 0,
            Diagram::Branch {
                then_branch,
                else_branch,
                ..
            } => 1 + then_branch.depth().max(else_branch.depth()),
        }
    }

    /// Leaf values from left (then) to right (else).
    pub fn leaves(&self) -> Vec<&V> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Diagram::Leaf(leaf) => result.push(&**leaf),
                Diagram::Branch {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    stack.push(&**else_branch);
                    stack.push(&**then_branch);
                }
            }
        }
        result
    }

    /// Lifts a binary operation on leaves to diagrams.
    ///
    /// `op` is called on every pair of cofactors reached by the recursion. It
    /// returns `Some(result)` to end the recursion there (a terminal case, or an
    /// absorbing shortcut such as `false AND g`), or `None` to descend further.
    ///
    /// # Panics
    ///
    /// Panics if `op` returns `None` for two leaves.
    pub fn try_apply<W, C, E, F>(&self, other: &Diagram<W>, op: &mut F) -> Result<Diagram<C>, E>
    where
        W: 'static,
        C: Terminal,
        F: FnMut(&Diagram<V>, &Diagram<W>) -> Result<Option<Diagram<C>>, E>,
    {
        if let Some(result) = op(self, other)? {
            return Ok(result);
        }
        assert!(
            !(self.is_leaf() && other.is_leaf()),
            "Binary operator left two leaves unresolved"
        );

        let m = self.index().min(other.index());
        debug!("apply: top index = {}", m);
        let (f1, f0) = self.cofactors(m);
        let (g1, g0) = other.cofactors(m);
        let t = f1.try_apply(g1, op)?;
        let e = f0.try_apply(g0, op)?;
        Ok(Diagram::branch(m, t, e))
    }

    /// Infallible variant of [`try_apply`](Self::try_apply).
    pub fn apply<W, C, F>(&self, other: &Diagram<W>, mut op: F) -> Diagram<C>
    where
        W: 'static,
        C: Terminal,
        F: FnMut(&Diagram<V>, &Diagram<W>) -> Option<Diagram<C>>,
    {
        match self.try_apply(other, &mut |f, g| Ok::<_, Infallible>(op(f, g))) {
            Ok(result) => result,
            Err(e) => match e {},
        }
    }

    /// Lifts a unary operation on leaves to diagrams, reducing on the way up.
    pub fn try_map<C, E, F>(&self, op: &mut F) -> Result<Diagram<C>, E>
    where
        C: Terminal,
        F: FnMut(&V) -> Result<C, E>,
    {
        match self {
            Diagram::Leaf(leaf) => Ok(Diagram::leaf(op(&**leaf)?)),
            Diagram::Branch {
                index,
                then_branch,
                else_branch,
            } => {
                let t = then_branch.try_map(op)?;
                let e = else_branch.try_map(op)?;
                Ok(Diagram::branch(*index, t, e))
            }
        }
    }

    /// Infallible variant of [`try_map`](Self::try_map).
    pub fn map<C, F>(&self, mut op: F) -> Diagram<C>
    where
        C: Terminal,
        F: FnMut(&V) -> C,
    {
        match self.try_map(&mut |v| Ok::<_, Infallible>(op(v))) {
            Ok(result) => result,
            Err(e) => match e {},
        }
    }
}

impl<V: Terminal> From<V> for Diagram<V> {
    fn from(value: V) -> Self {
        Diagram::leaf(value)
    }
}
