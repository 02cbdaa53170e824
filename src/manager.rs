//! The diagram manager.
//!
//! All diagram operations go through a [`Manager`]. It owns the state that is
//! shared by every diagram built with it: the [`AffineContext`] minting noise
//! symbols, the [`ConditionRegistry`] giving branch indices their meaning, and
//! the LP solver used for bound tightening.
//!
//! Diagrams themselves are plain values and can outlive any borrow of the
//! manager, but their condition indices and symbols are only meaningful with
//! respect to the manager that created them.
//!
//! # Examples
//!
//! ```
//! use aadd_rs::manager::Manager;
//!
//! let mgr = Manager::default();
//! let x = mgr.uncertain(1.0, 3.0);
//! let y = mgr.add(&x, &mgr.scalar(1.0));
//! assert_eq!(mgr.min(&y), 2.0);
//! assert_eq!(mgr.max(&y), 4.0);
//! ```

use std::cell::{Ref, RefCell};
use std::fmt;

use crate::affine::AffineForm;
use crate::approx::{AffineContext, Approximation};
use crate::diagram::{Diagram, Terminal};
use crate::lp::{LpSolver, Simplex};
use crate::registry::ConditionRegistry;
use crate::types::{CondId, Symbol};

/// Boolean decision diagram.
pub type Bdd = Diagram<bool>;

/// Affine decision diagram.
pub type Aadd = Diagram<AffineForm>;

pub struct Manager {
    context: AffineContext,
    registry: RefCell<ConditionRegistry>,
    solver: Box<dyn LpSolver>,
}

impl Manager {
    pub fn new(approximation: Approximation) -> Self {
        Manager {
            context: AffineContext::new(approximation),
            registry: RefCell::new(ConditionRegistry::new()),
            solver: Box::new(Simplex::default()),
        }
    }

    /// Creates a manager that uses `solver` for bound tightening.
    pub fn with_solver(solver: impl LpSolver + 'static) -> Self {
        Manager {
            solver: Box::new(solver),
            ..Manager::default()
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Manager::new(Approximation::default())
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("approximation", &self.context.approximation())
            .field("symbols", &self.context.num_symbols())
            .field("conditions", &self.registry.borrow().len())
            .finish()
    }
}

impl Manager {
    pub fn context(&self) -> &AffineContext {
        &self.context
    }

    pub fn solver(&self) -> &dyn LpSolver {
        self.solver.as_ref()
    }

    pub fn approximation(&self) -> Approximation {
        self.context.approximation()
    }

    pub fn set_approximation(&self, approximation: Approximation) {
        self.context.set_approximation(approximation);
    }

    pub fn registry(&self) -> Ref<'_, ConditionRegistry> {
        self.registry.borrow()
    }

    /// Registers `form >= 0` as a new branch condition.
    pub fn add_condition(&self, form: AffineForm) -> CondId {
        self.registry.borrow_mut().add(form)
    }

    /// Returns a copy of the condition registered under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not registered with this manager.
    pub fn condition(&self, id: CondId) -> AffineForm {
        self.registry.borrow().get(id).clone()
    }

    pub fn num_conditions(&self) -> usize {
        self.registry.borrow().len()
    }

    pub fn one(&self) -> Bdd {
        Diagram::leaf(true)
    }

    pub fn zero(&self) -> Bdd {
        Diagram::leaf(false)
    }

    pub fn constant(&self, value: bool) -> Bdd {
        Diagram::leaf(value)
    }

    /// Exact scalar leaf.
    pub fn scalar(&self, value: f64) -> Aadd {
        Diagram::leaf(AffineForm::constant(value))
    }

    /// Leaf ranging over `[lo, hi]` with a fresh noise symbol.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi`.
    pub fn uncertain(&self, lo: f64, hi: f64) -> Aadd {
        Diagram::leaf(self.context.interval(lo, hi))
    }

    pub fn form(&self, form: AffineForm) -> Aadd {
        Diagram::leaf(form)
    }

    /// Boolean diagram that is `true` exactly where condition `id` holds.
    pub fn decision(&self, id: CondId) -> Bdd {
        Diagram::branch(id, self.one(), self.zero())
    }

    /// Follows the diagram at a concrete symbol assignment and returns the leaf
    /// reached. A condition evaluating to exactly zero takes the `then` edge.
    pub fn evaluate<'d, V: Terminal>(
        &self,
        diagram: &'d Diagram<V>,
        assignment: impl Fn(Symbol) -> f64,
    ) -> &'d V {
        let registry = self.registry.borrow();
        let mut node = diagram;
        loop {
            match node {
                Diagram::Leaf(leaf) => return &**leaf,
                Diagram::Branch {
                    index,
                    then_branch,
                    else_branch,
                } => {
                    node = if registry.get(*index).evaluate(&assignment) >= 0.0 {
                        &**then_branch
                    } else {
                        &**else_branch
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_default_manager() {
        let mgr = Manager::default();
        assert_eq!(mgr.approximation(), Approximation::Chebyshev);
        assert_eq!(mgr.num_conditions(), 0);
        mgr.set_approximation(Approximation::Secant);
        assert_eq!(mgr.approximation(), Approximation::Secant);
        assert!(format!("{:?}", mgr).contains("Secant"));
    }

    #[test]
    fn test_conditions() {
        let mgr = Manager::default();
        let x = mgr.context().interval(0.0, 1.0);
        let c = mgr.add_condition(x.clone());
        assert_eq!(mgr.condition(c), x);
        assert_eq!(mgr.num_conditions(), 1);
        assert_eq!(mgr.registry().len(), 1);
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn test_unknown_condition() {
        let mgr = Manager::default();
        mgr.condition(CondId::new(0));
    }

    #[test]
    fn test_constants() {
        let mgr = Manager::default();
        assert_eq!(mgr.one().as_leaf(), Some(&true));
        assert_eq!(mgr.zero().as_leaf(), Some(&false));
        assert_eq!(mgr.constant(true), mgr.one());
        assert_eq!(mgr.scalar(2.5).as_leaf(), Some(&AffineForm::constant(2.5)));
        let u = mgr.uncertain(1.0, 3.0);
        assert_eq!(u.as_leaf().map(|f| f.num_terms()), Some(1));
    }

    #[test]
    fn test_evaluate() {
        let mgr = Manager::default();
        let x = mgr.context().interval(-1.0, 1.0);
        let s = x.terms()[0].0;
        let c = mgr.add_condition(x);
        let d = mgr.decision(c);
        assert_eq!(mgr.evaluate(&d, |_| 0.5), &true);
        assert_eq!(mgr.evaluate(&d, |_| -0.5), &false);
        assert_eq!(mgr.evaluate(&d, |e| if e == s { 0.0 } else { 1.0 }), &true);
    }
}
