//! Bound tightening.
//!
//! The interval `[min, max]` of a leaf's affine form ignores what is known on
//! the path leading to it: every branch node taken adds a linear constraint
//! `c >= 0` or `c <= 0` over the noise symbols. [`Manager::find_bounds`]
//! collects these constraints on the way down and asks the LP solver for the
//! tight range of each leaf under them.

use log::{debug, warn};

use crate::affine::AffineForm;
use crate::lp::{Direction, LinearProgram, Sense};
use crate::manager::{Aadd, Manager};
use crate::types::Symbol;

/// Side of a branch condition taken on a path.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Sign {
    /// `condition >= 0`, the `then` edge.
    Positive,
    /// `condition <= 0`, the `else` edge.
    Negative,
}

/// A branch condition together with the side taken.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub condition: AffineForm,
    pub sign: Sign,
}

impl Constraint {
    pub fn positive(condition: AffineForm) -> Self {
        Constraint {
            condition,
            sign: Sign::Positive,
        }
    }

    pub fn negative(condition: AffineForm) -> Self {
        Constraint {
            condition,
            sign: Sign::Negative,
        }
    }
}

/// A closed range `[min, max]`.
///
/// The empty range has `min = +inf` and `max = -inf`, so that it is the unit
/// of [`Bounds::union`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    pub fn empty() -> Self {
        Bounds {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Envelope of an affine form.
    pub fn of(form: &AffineForm) -> Self {
        Bounds::new(form.min(), form.max())
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Manager {
    /// Tight range of the diagram `f`, reached under `constraints`.
    ///
    /// `constraints` is used as a stack and is left as it was on return.
    pub fn find_bounds(&self, f: &Aadd, constraints: &mut Vec<Constraint>) -> Bounds {
        match f {
            Aadd::Leaf(leaf) => self.solve_lp(leaf, constraints),
            Aadd::Branch {
                index,
                then_branch,
                else_branch,
            } => {
                debug!("find_bounds: branch {} under {} constraints", index, constraints.len());
                let condition = self.condition(*index);

                constraints.push(Constraint::positive(condition.clone()));
                let t = self.find_bounds(then_branch, constraints);
                constraints.pop();

                constraints.push(Constraint::negative(condition));
                let e = self.find_bounds(else_branch, constraints);
                constraints.pop();

                t.union(e)
            }
        }
    }

    /// Tight range of `form` subject to `constraints`.
    ///
    /// Without constraints, or for a form without noise terms, this is the
    /// envelope of the form. If the solver fails, a warning is logged and the
    /// envelope is returned, which is always sound.
    pub fn solve_lp(&self, form: &AffineForm, constraints: &[Constraint]) -> Bounds {
        let envelope = Bounds::of(form);
        if form.num_terms() == 0 || constraints.is_empty() {
            return envelope;
        }

        let mut symbols: Vec<Symbol> = form.symbols().collect();
        for c in constraints {
            symbols.extend(c.condition.symbols());
        }
        symbols.sort();
        symbols.dedup();
        let row_of = |form: &AffineForm| {
            let mut row = vec![0.0; symbols.len()];
            for &(s, k) in form.terms() {
                if let Ok(j) = symbols.binary_search(&s) {
                    row[j] = k;
                }
            }
            row
        };

        let mut lp = LinearProgram::new(symbols.len());
        for c in constraints {
            let form = &c.condition;
            let (nominal, sense) = match c.sign {
                Sign::Positive => (form.center() + form.offset_max(), Sense::Ge),
                Sign::Negative => (form.center() + form.offset_min(), Sense::Le),
            };
            lp.add_row(nominal, row_of(form), sense);
        }
        lp.set_objective(row_of(form));

        let solver = self.solver();
        let max = match solver.solve(&lp, Direction::Maximize) {
            Ok(v) => (form.center() + v + form.offset_max()).min(envelope.max),
            Err(e) => {
                warn!("solve_lp: {}, falling back to the envelope of {}", e, form);
                envelope.max
            }
        };
        let min = match solver.solve(&lp, Direction::Minimize) {
            Ok(v) => (form.center() + v + form.offset_min()).max(envelope.min),
            Err(e) => {
                warn!("solve_lp: {}, falling back to the envelope of {}", e, form);
                envelope.min
            }
        };
        debug!(
            "solve_lp: {} under {} constraints -> [{}, {}]",
            form,
            constraints.len(),
            min,
            max
        );
        Bounds::new(min, max)
    }

    /// Tight range of a value diagram over all its paths.
    pub fn bounds(&self, f: &Aadd) -> Bounds {
        self.find_bounds(f, &mut Vec::new())
    }

    pub fn min(&self, f: &Aadd) -> f64 {
        self.bounds(f).min
    }

    pub fn max(&self, f: &Aadd) -> f64 {
        self.bounds(f).max
    }
}
