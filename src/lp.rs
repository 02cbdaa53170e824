//! Linear programs over noise symbols.
//!
//! Bound tightening needs only a small slice of linear programming: every
//! column is a noise symbol bounded to `[-1, 1]`, plus one nominal column pinned
//! to `1`; every row is `nominal + sum(a_j * e_j) >= 0` or `<= 0`; the objective
//! is linear in the symbols. [`LpSolver`] is that interface, and [`Simplex`] is a
//! dense two-phase simplex implementing it.

use log::debug;
use thiserror::Error;

const EPS: f64 = 1e-9;

/// Sense of a row, relative to zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Sense {
    /// `row >= 0`
    Ge,
    /// `row <= 0`
    Le,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Maximize,
    Minimize,
}

/// A constraint `nominal + sum(coefficients[j] * e_j) (>=|<=) 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub nominal: f64,
    pub coefficients: Vec<f64>,
    pub sense: Sense,
}

/// A linear program over `num_columns` symbols, each bounded to `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    num_columns: usize,
    rows: Vec<Row>,
    objective: Vec<f64>,
}

impl LinearProgram {
    pub fn new(num_columns: usize) -> Self {
        LinearProgram {
            num_columns,
            rows: Vec::new(),
            objective: vec![0.0; num_columns],
        }
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// # Panics
    ///
    /// Panics if the number of coefficients differs from the number of columns.
    pub fn add_row(&mut self, nominal: f64, coefficients: Vec<f64>, sense: Sense) {
        assert_eq!(
            coefficients.len(),
            self.num_columns,
            "Row has {} coefficients, expected {}",
            coefficients.len(),
            self.num_columns
        );
        self.rows.push(Row {
            nominal,
            coefficients,
            sense,
        });
    }

    /// # Panics
    ///
    /// Panics if the number of coefficients differs from the number of columns.
    pub fn set_objective(&mut self, coefficients: Vec<f64>) {
        assert_eq!(
            coefficients.len(),
            self.num_columns,
            "Objective has {} coefficients, expected {}",
            coefficients.len(),
            self.num_columns
        );
        self.objective = coefficients;
    }
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum LpError {
    #[error("linear program is infeasible")]
    Infeasible,

    #[error("linear program is unbounded")]
    Unbounded,

    #[error("simplex iteration limit reached")]
    IterationLimit,
}

/// Anything that can optimize a [`LinearProgram`].
pub trait LpSolver {
    /// Returns the optimal value of the objective in the given direction.
    fn solve(&self, lp: &LinearProgram, direction: Direction) -> Result<f64, LpError>;
}

/// Dense two-phase tableau simplex with Bland's rule.
///
/// Symbols are shifted to `y = e + 1` so that every variable is non-negative,
/// and the upper bounds `y <= 2` become ordinary rows.
#[derive(Debug, Copy, Clone)]
pub struct Simplex {
    iteration_limit: usize,
}

impl Simplex {
    pub fn new(iteration_limit: usize) -> Self {
        Simplex { iteration_limit }
    }
}

impl Default for Simplex {
    fn default() -> Self {
        Simplex::new(10_000)
    }
}

impl LpSolver for Simplex {
    fn solve(&self, lp: &LinearProgram, direction: Direction) -> Result<f64, LpError> {
        let n = lp.num_columns();
        let sign = match direction {
            Direction::Maximize => 1.0,
            Direction::Minimize => -1.0,
        };
        let costs: Vec<f64> = lp.objective().iter().map(|&c| sign * c).collect();

        // Substitute e = y - 1: the row `a0 + a.e` becomes `a.y - (sum(a) - a0)`.
        let mut constraints = Vec::with_capacity(lp.rows().len() + n);
        for row in lp.rows() {
            let rhs = row.coefficients.iter().sum::<f64>() - row.nominal;
            constraints.push((row.coefficients.clone(), row.sense, rhs));
        }
        for j in 0..n {
            let mut unit = vec![0.0; n];
            unit[j] = 1.0;
            constraints.push((unit, Sense::Le, 2.0));
        }

        let mut tableau = Tableau::new(n, constraints);
        let best = tableau.optimize(&costs, self.iteration_limit)?;
        let value = best - costs.iter().sum::<f64>();
        debug!("simplex: {:?} over {} columns -> {}", direction, n, sign * value);
        Ok(sign * value)
    }
}

/// Simplex tableau for `max c.x` subject to the stored rows and `x >= 0`.
struct Tableau {
    /// Each row holds the coefficients of every column followed by the rhs.
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    num_original: usize,
    /// Columns at or past this index are artificial.
    first_artificial: usize,
}

impl Tableau {
    fn new(num_original: usize, constraints: Vec<(Vec<f64>, Sense, f64)>) -> Self {
        // Normalize to non-negative right-hand sides.
        let constraints: Vec<_> = constraints
            .into_iter()
            .map(|(a, sense, b)| {
                if b < 0.0 {
                    let flipped = match sense {
                        Sense::Ge => Sense::Le,
                        Sense::Le => Sense::Ge,
                    };
                    (a.into_iter().map(|x| -x).collect::<Vec<_>>(), flipped, -b)
                } else {
                    (a, sense, b)
                }
            })
            .collect();

        let m = constraints.len();
        let num_artificial = constraints.iter().filter(|(_, s, _)| *s == Sense::Ge).count();
        let first_artificial = num_original + m;
        let width = first_artificial + num_artificial;

        let mut rows = Vec::with_capacity(m);
        let mut basis = Vec::with_capacity(m);
        let mut next_artificial = first_artificial;
        for (i, (a, sense, b)) in constraints.into_iter().enumerate() {
            let mut row = vec![0.0; width + 1];
            row[..num_original].copy_from_slice(&a);
            row[width] = b;
            let slack = num_original + i;
            match sense {
                Sense::Le => {
                    row[slack] = 1.0;
                    basis.push(slack);
                }
                Sense::Ge => {
                    row[slack] = -1.0;
                    row[next_artificial] = 1.0;
                    basis.push(next_artificial);
                    next_artificial += 1;
                }
            }
            rows.push(row);
        }

        Tableau {
            rows,
            basis,
            num_original,
            first_artificial,
        }
    }

    fn width(&self) -> usize {
        self.rows.first().map_or(self.first_artificial, |row| row.len() - 1)
    }

    /// Maximizes `costs . x` over the original columns.
    fn optimize(&mut self, costs: &[f64], iteration_limit: usize) -> Result<f64, LpError> {
        let width = self.width();

        if width > self.first_artificial {
            // Phase 1: maximize the negated sum of artificial variables.
            let mut phase1 = vec![0.0; width];
            for c in phase1.iter_mut().skip(self.first_artificial) {
                *c = -1.0;
            }
            let value = self.run(&phase1, true, iteration_limit)?;
            if value < -EPS {
                return Err(LpError::Infeasible);
            }
            self.drive_out_artificials();
        }

        let mut phase2 = vec![0.0; width];
        phase2[..self.num_original].copy_from_slice(costs);
        self.run(&phase2, false, iteration_limit)
    }

    /// Runs simplex iterations for `max costs . x` from the current basis.
    fn run(&mut self, costs: &[f64], artificials_enter: bool, iteration_limit: usize) -> Result<f64, LpError> {
        let width = self.width();

        // Reduced costs: objective row `z - c.x = 0`, made consistent with the basis.
        let mut objective = vec![0.0; width + 1];
        for (j, &c) in costs.iter().enumerate() {
            objective[j] = -c;
        }
        for (i, &b) in self.basis.iter().enumerate() {
            let factor = objective[b];
            if factor != 0.0 {
                for (o, r) in objective.iter_mut().zip(&self.rows[i]) {
                    *o -= factor * r;
                }
            }
        }

        for _ in 0..iteration_limit {
            let limit = if artificials_enter { width } else { self.first_artificial };
            let Some(entering) = (0..limit).find(|&j| objective[j] < -EPS) else {
                return Ok(objective[width]);
            };

            let mut leaving: Option<(usize, f64)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                if row[entering] > EPS {
                    let ratio = row[width] / row[entering];
                    let better = match leaving {
                        None => true,
                        Some((k, best)) => {
                            ratio < best - EPS || (ratio <= best + EPS && self.basis[i] < self.basis[k])
                        }
                    };
                    if better {
                        leaving = Some((i, ratio));
                    }
                }
            }
            let Some((pivot_row, _)) = leaving else {
                return Err(LpError::Unbounded);
            };

            self.pivot(pivot_row, entering);
            let factor = objective[entering];
            for (o, r) in objective.iter_mut().zip(&self.rows[pivot_row]) {
                *o -= factor * r;
            }
        }
        Err(LpError::IterationLimit)
    }

    fn pivot(&mut self, pivot_row: usize, column: usize) {
        let p = self.rows[pivot_row][column];
        for x in self.rows[pivot_row].iter_mut() {
            *x /= p;
        }
        let pivot = self.rows[pivot_row].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == pivot_row {
                continue;
            }
            let factor = row[column];
            if factor != 0.0 {
                for (x, p) in row.iter_mut().zip(&pivot) {
                    *x -= factor * p;
                }
            }
        }
        self.basis[pivot_row] = column;
    }

    /// Replaces artificial variables left in the basis at level zero by
    /// non-artificial columns. Rows where that is impossible are redundant.
    fn drive_out_artificials(&mut self) {
        for i in 0..self.rows.len() {
            if self.basis[i] < self.first_artificial {
                continue;
            }
            if let Some(j) = (0..self.first_artificial).find(|&j| self.rows[i][j].abs() > EPS) {
                self.pivot(i, j);
            }
        }
    }
}
