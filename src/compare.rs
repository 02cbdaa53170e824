//! Comparisons of value diagrams.
//!
//! Comparing two value diagrams subtracts them and compares the difference
//! against a small threshold. Each leaf of the difference is decided with its
//! tight bounds under the path constraints: if the whole range lies on one side
//! of the threshold the leaf becomes a boolean constant, otherwise the leaf
//! minus the threshold is registered as a new condition and the leaf becomes a
//! decision on it.
//!
//! New conditions get indices larger than every existing one, so the results
//! stay ordered.

use log::debug;

use crate::affine::{AffineForm, EPSILON};
use crate::bounds::Constraint;
use crate::diagram::Diagram;
use crate::manager::{Aadd, Bdd, Manager};

/// Strict comparisons are decided against this margin above zero.
const STRICT_MARGIN: f64 = 1e-10;

/// Relation of a value against zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Relation {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Relation {
    fn threshold(self) -> f64 {
        match self {
            Relation::Lt | Relation::Ge => 0.0,
            Relation::Le | Relation::Gt => STRICT_MARGIN,
        }
    }

    /// Result of the relation for values at or above the threshold.
    fn holds_above(self) -> bool {
        matches!(self, Relation::Gt | Relation::Ge)
    }
}

impl Manager {
    /// Compares every leaf of `f` against zero.
    pub fn compare(&self, f: &Aadd, relation: Relation) -> Bdd {
        debug!("compare(f = {}, {:?})", f.index(), relation);
        self.compare_rec(f, relation, &mut Vec::new())
    }

    fn compare_rec(&self, f: &Aadd, relation: Relation, constraints: &mut Vec<Constraint>) -> Bdd {
        match f {
            Aadd::Leaf(leaf) => self.compare_leaf(leaf, relation, constraints),
            Aadd::Branch {
                index,
                then_branch,
                else_branch,
            } => {
                let condition = self.condition(*index);

                constraints.push(Constraint::positive(condition.clone()));
                let t = self.compare_rec(then_branch, relation, constraints);
                constraints.pop();

                constraints.push(Constraint::negative(condition));
                let e = self.compare_rec(else_branch, relation, constraints);
                constraints.pop();

                Diagram::branch(*index, t, e)
            }
        }
    }

    fn compare_leaf(&self, form: &AffineForm, relation: Relation, constraints: &[Constraint]) -> Bdd {
        let threshold = relation.threshold();
        let above = relation.holds_above();
        let bounds = self.solve_lp(form, constraints);

        if bounds.max < threshold - EPSILON {
            debug!("compare: [{}, {}] below {}", bounds.min, bounds.max, threshold);
            return self.constant(!above);
        }
        if bounds.min >= threshold - EPSILON {
            debug!("compare: [{}, {}] above {}", bounds.min, bounds.max, threshold);
            return self.constant(above);
        }

        let id = self.add_condition(form - threshold);
        debug!(
            "compare: [{}, {}] straddles {}, new condition {}",
            bounds.min, bounds.max, threshold, id
        );
        Diagram::branch(id, self.constant(above), self.constant(!above))
    }

    /// `f < g`
    pub fn lt(&self, f: &Aadd, g: &Aadd) -> Bdd {
        self.compare(&self.sub(f, g), Relation::Lt)
    }

    /// `f <= g`
    pub fn le(&self, f: &Aadd, g: &Aadd) -> Bdd {
        self.compare(&self.sub(f, g), Relation::Le)
    }

    /// `f > g`
    pub fn gt(&self, f: &Aadd, g: &Aadd) -> Bdd {
        self.compare(&self.sub(f, g), Relation::Gt)
    }

    /// `f >= g`
    pub fn ge(&self, f: &Aadd, g: &Aadd) -> Bdd {
        self.compare(&self.sub(f, g), Relation::Ge)
    }

    /// `f == g`, as `(f >= g) AND (f <= g)`.
    pub fn eq(&self, f: &Aadd, g: &Aadd) -> Bdd {
        let ge = self.ge(f, g);
        let le = self.le(f, g);
        self.apply_and(&ge, &le)
    }

    /// `f != g`
    pub fn ne(&self, f: &Aadd, g: &Aadd) -> Bdd {
        self.apply_not(&self.eq(f, g))
    }
}
