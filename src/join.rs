//! Optional merging of sibling leaves.
//!
//! Every comparison on an uncertain value can double the number of leaves of
//! the diagrams built from it. [`Manager::join`] trades precision for size: a
//! branch node whose two children are leaves with overlapping tight ranges and
//! at least one common noise symbol is replaced by a single leaf enclosing both.
//!
//! The merged leaf keeps, for every common symbol whose coefficients agree in
//! sign, the coefficient of smaller magnitude, and takes the mean of both
//! centers. Its offsets are the tight range of the difference between each
//! original leaf and the merged linear part, over the region where that leaf
//! applies, so the merged leaf encloses both.

use log::debug;

use crate::affine::{merge_terms, AffineForm};
use crate::bounds::Constraint;
use crate::diagram::Diagram;
use crate::manager::{Aadd, Manager};
use crate::types::CondId;

impl Manager {
    /// Merges sibling leaves bottom-up where possible.
    pub fn join(&self, f: &Aadd) -> Aadd {
        debug!("join(f = {})", f.index());
        self.join_rec(f, &mut Vec::new())
    }

    fn join_rec(&self, f: &Aadd, constraints: &mut Vec<Constraint>) -> Aadd {
        let Aadd::Branch {
            index,
            then_branch,
            else_branch,
        } = f
        else {
            return f.clone();
        };

        let condition = self.condition(*index);
        constraints.push(Constraint::positive(condition.clone()));
        let t = self.join_rec(then_branch, constraints);
        constraints.pop();
        constraints.push(Constraint::negative(condition));
        let e = self.join_rec(else_branch, constraints);
        constraints.pop();

        if let (Some(a), Some(b)) = (t.as_leaf(), e.as_leaf()) {
            if let Some(merged) = self.merge_leaves(*index, a, b, constraints) {
                return Diagram::leaf(merged);
            }
        }
        Diagram::branch(*index, t, e)
    }

    /// Merges the leaves `a` (where condition `index` holds) and `b` (where it
    /// does not), or returns `None` if they should be kept apart.
    fn merge_leaves(
        &self,
        index: CondId,
        a: &AffineForm,
        b: &AffineForm,
        constraints: &mut Vec<Constraint>,
    ) -> Option<AffineForm> {
        if !a.shares_symbols(b) {
            debug!("join: leaves under {} share no symbols", index);
            return None;
        }

        let condition = self.condition(index);
        let then_region = |c: &mut Vec<Constraint>| c.push(Constraint::positive(condition.clone()));
        let else_region = |c: &mut Vec<Constraint>| c.push(Constraint::negative(condition.clone()));

        then_region(constraints);
        let range_a = self.solve_lp(a, constraints);
        constraints.pop();
        else_region(constraints);
        let range_b = self.solve_lp(b, constraints);
        constraints.pop();

        if range_a.max < range_b.min || range_b.max < range_a.min {
            debug!("join: leaves under {} have disjoint ranges", index);
            return None;
        }

        let terms = merge_terms(a.terms(), b.terms(), |x, y| {
            if x * y > 0.0 {
                if x.abs() <= y.abs() {
                    x
                } else {
                    y
                }
            } else {
                0.0
            }
        });
        let base = AffineForm::from_parts(0.5 * (a.center() + b.center()), terms, 0.0, 0.0);

        then_region(constraints);
        let rest_a = self.solve_lp(&(a - &base), constraints);
        constraints.pop();
        else_region(constraints);
        let rest_b = self.solve_lp(&(b - &base), constraints);
        constraints.pop();

        let offset_min = rest_a.min.min(rest_b.min);
        let offset_max = rest_a.max.max(rest_b.max).max(offset_min);
        let merged = base.with_offsets(offset_min, offset_max);
        debug!("join: merged leaves under {} into {}", index, merged);
        Some(merged)
    }
}
