//! Affine forms.
//!
//! An [`AffineForm`] represents an uncertain real quantity as
//!
//! ```text
//! x = x0 + x1*e1 + ... + xn*en + [offset_min, offset_max]
//! ```
//!
//! where every noise symbol `ei` ranges over `[-1, 1]` and the offset interval
//! absorbs residual error of nonlinear operations without growing the term list.
//! Forms mentioning the same symbol are correlated, so `x - x` is exactly zero.
//!
//! The linear operations (addition, subtraction, negation, scalar operations)
//! live here as `std::ops` implementations. Nonlinear operations need a source
//! of fresh noise symbols and an approximation mode, and are provided by
//! [`AffineContext`][crate::approx::AffineContext].
//!
//! # Examples
//!
//! ```
//! use aadd_rs::affine::AffineForm;
//! use aadd_rs::types::Symbol;
//!
//! let a = AffineForm::interval(0.0, 2.0, Symbol::new(1));
//! let b = &a + &a;
//! assert_eq!(b.min(), 0.0);
//! assert_eq!(b.max(), 4.0);
//!
//! let zero = &a - &a;
//! assert!(zero.is_constant());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{Error, Result};
use crate::types::Symbol;

/// Lower bounds at or below this value are treated as zero by domain checks.
pub const EPSILON: f64 = 1e-20;

/// Below this width an interval is considered degenerate and nonlinear
/// functions use the derivative at the midpoint instead of a secant.
pub const MIN_RADIUS: f64 = 1e-10;

/// Tolerance used by equality of centers and coefficients.
pub const TOLERANCE: f64 = 1e-16;

/// An affine form with a sparse, sorted list of noise-symbol terms.
///
/// # Invariants
///
/// - `terms` is sorted by symbol, without duplicates and without zero coefficients
/// - `offset_min <= offset_max`
#[derive(Debug, Clone, Default)]
pub struct AffineForm {
    center: f64,
    terms: Vec<(Symbol, f64)>,
    offset_min: f64,
    offset_max: f64,
}

impl AffineForm {
    /// Creates an exact constant.
    pub fn constant(value: f64) -> Self {
        AffineForm {
            center: value,
            terms: Vec::new(),
            offset_min: 0.0,
            offset_max: 0.0,
        }
    }

    /// Creates a form ranging over `[lo, hi]` using the given noise symbol.
    ///
    /// A point interval produces an exact constant and does not mention `symbol`.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi`.
    pub fn interval(lo: f64, hi: f64, symbol: Symbol) -> Self {
        assert!(lo <= hi, "Interval bounds out of order: [{}, {}]", lo, hi);
        if lo == hi {
            return AffineForm::constant(lo);
        }
        let center = 0.5 * lo + 0.5 * hi;
        let mut radius = 0.5 * hi - 0.5 * lo;
        // The offsets absorb the rounding of center and radius, so that the
        // envelope is exactly [lo, hi]. If both ends rounded outward the
        // corrections would cross, so the radius is narrowed until they don't.
        while radius > 0.0 {
            let offset_min = lo - (center - radius);
            let offset_max = hi - (center + radius);
            if offset_min <= offset_max {
                return AffineForm {
                    center,
                    terms: vec![(symbol, radius)],
                    offset_min,
                    offset_max,
                };
            }
            let narrowed = radius - 0.5 * (offset_min - offset_max);
            radius = if narrowed < radius {
                narrowed
            } else {
                f64::from_bits(radius.to_bits() - 1)
            };
        }
        // Bounds closer than the smallest representable radius.
        AffineForm::constant(center).with_offsets(lo - center, hi - center)
    }

    /// Creates a form from raw parts.
    ///
    /// Terms are sorted, duplicate symbols are summed and zero coefficients dropped.
    ///
    /// # Panics
    ///
    /// Panics if `offset_min > offset_max`.
    pub fn from_parts(
        center: f64,
        terms: impl IntoIterator<Item = (Symbol, f64)>,
        offset_min: f64,
        offset_max: f64,
    ) -> Self {
        assert!(
            offset_min <= offset_max,
            "Offsets out of order: [{}, {}]",
            offset_min,
            offset_max
        );
        let mut terms: Vec<_> = terms.into_iter().collect();
        terms.sort_by_key(|&(s, _)| s);
        let mut normalized: Vec<(Symbol, f64)> = Vec::with_capacity(terms.len());
        for (s, c) in terms {
            match normalized.last_mut() {
                Some((last, acc)) if *last == s => *acc += c,
                _ => normalized.push((s, c)),
            }
        }
        normalized.retain(|&(_, c)| c != 0.0);
        AffineForm {
            center,
            terms: normalized,
            offset_min,
            offset_max,
        }
    }

    /// Returns the same form with the offset interval replaced.
    ///
    /// # Panics
    ///
    /// Panics if `offset_min > offset_max`.
    pub fn with_offsets(mut self, offset_min: f64, offset_max: f64) -> Self {
        assert!(
            offset_min <= offset_max,
            "Offsets out of order: [{}, {}]",
            offset_min,
            offset_max
        );
        self.offset_min = offset_min;
        self.offset_max = offset_max;
        self
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn terms(&self) -> &[(Symbol, f64)] {
        &self.terms
    }

    pub fn offset_min(&self) -> f64 {
        self.offset_min
    }

    pub fn offset_max(&self) -> f64 {
        self.offset_max
    }

    /// Number of noise symbols the form depends on.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the form has neither noise terms nor offsets.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty() && self.offset_min == 0.0 && self.offset_max == 0.0
    }

    /// Sum of the absolute coefficients.
    pub fn radius(&self) -> f64 {
        self.terms.iter().map(|&(_, c)| c.abs()).sum()
    }

    /// Lower end of the enclosing interval.
    pub fn min(&self) -> f64 {
        self.center - self.radius() + self.offset_min
    }

    /// Upper end of the enclosing interval.
    pub fn max(&self) -> f64 {
        self.center + self.radius() + self.offset_max
    }

    /// Coefficient of `symbol`, zero if the form does not mention it.
    pub fn coefficient(&self, symbol: Symbol) -> f64 {
        self.terms
            .binary_search_by_key(&symbol, |&(s, _)| s)
            .map_or(0.0, |i| self.terms[i].1)
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terms.iter().map(|&(s, _)| s)
    }

    /// Returns `true` if both forms mention at least one common symbol.
    pub fn shares_symbols(&self, other: &AffineForm) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() && j < other.terms.len() {
            match self.terms[i].0.cmp(&other.terms[j].0) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Value of the linear part at a concrete symbol assignment.
    ///
    /// The offset interval is not included; the true value lies within
    /// `[v + offset_min, v + offset_max]` for the returned `v`.
    pub fn evaluate(&self, assignment: impl Fn(Symbol) -> f64) -> f64 {
        self.terms
            .iter()
            .fold(self.center, |acc, &(s, c)| acc + c * assignment(s))
    }

    /// Interval comparison: the whole envelope lies strictly below `other`'s.
    pub fn is_lt(&self, other: &AffineForm) -> bool {
        self.max() < other.min()
    }

    pub fn is_le(&self, other: &AffineForm) -> bool {
        self.max() <= other.min()
    }

    pub fn is_gt(&self, other: &AffineForm) -> bool {
        self.min() > other.max()
    }

    pub fn is_ge(&self, other: &AffineForm) -> bool {
        self.min() >= other.max()
    }

    /// Divides by a scalar.
    pub fn checked_div_scalar(&self, k: f64) -> Result<AffineForm> {
        if k == 0.0 {
            return Err(Error::DivisionByZero { lo: 0.0, hi: 0.0 });
        }
        Ok(self.map_linear(|x| x / k, k < 0.0))
    }

    /// Widens the offsets so that they also cover `[lo, hi]` added on top.
    pub fn widen(&self, lo: f64, hi: f64) -> AffineForm {
        let mut form = self.clone();
        form.offset_min += lo.min(hi);
        form.offset_max += lo.max(hi);
        form
    }

    /// Applies a linear map `v -> f(v)` to center, terms and offsets.
    /// `flips` tells whether the map reverses the order of the offsets.
    fn map_linear(&self, f: impl Fn(f64) -> f64, flips: bool) -> AffineForm {
        let terms = self
            .terms
            .iter()
            .map(|&(s, c)| (s, f(c)))
            .filter(|&(_, c)| c != 0.0)
            .collect();
        let (lo, hi) = (f(self.offset_min), f(self.offset_max));
        let (offset_min, offset_max) = if flips { (hi, lo) } else { (lo, hi) };
        AffineForm {
            center: f(self.center),
            terms,
            offset_min,
            offset_max,
        }
    }
}

/// Merges two sorted term lists in one pass, combining coefficients with `f`.
///
/// Symbols missing from one side contribute a zero coefficient.
/// Zero results are dropped.
pub(crate) fn merge_terms(
    a: &[(Symbol, f64)],
    b: &[(Symbol, f64)],
    f: impl Fn(f64, f64) -> f64,
) -> Vec<(Symbol, f64)> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    loop {
        let (symbol, x, y) = match (a.get(i), b.get(j)) {
            (Some(&(s, x)), Some(&(t, y))) => match s.cmp(&t) {
                Ordering::Less => {
                    i += 1;
                    (s, x, 0.0)
                }
                Ordering::Greater => {
                    j += 1;
                    (t, 0.0, y)
                }
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                    (s, x, y)
                }
            },
            (Some(&(s, x)), None) => {
                i += 1;
                (s, x, 0.0)
            }
            (None, Some(&(t, y))) => {
                j += 1;
                (t, 0.0, y)
            }
            (None, None) => break,
        };
        let c = f(x, y);
        if c != 0.0 {
            result.push((symbol, c));
        }
    }
    result
}

impl PartialEq for AffineForm {
    fn eq(&self, other: &Self) -> bool {
        if self.terms.len() != other.terms.len() {
            return false;
        }
        if (self.center - other.center).abs() > TOLERANCE {
            return false;
        }
        if (self.offset_min - other.offset_min).abs() > TOLERANCE
            || (self.offset_max - other.offset_max).abs() > TOLERANCE
        {
            return false;
        }
        self.terms
            .iter()
            .zip(&other.terms)
            .all(|(&(s, x), &(t, y))| s == t && (x - y).abs() <= TOLERANCE)
    }
}

impl From<f64> for AffineForm {
    fn from(value: f64) -> Self {
        AffineForm::constant(value)
    }
}

impl fmt::Display for AffineForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.center)?;
        for &(s, c) in &self.terms {
            if c < 0.0 {
                write!(f, " - {}*{}", -c, s)?;
            } else {
                write!(f, " + {}*{}", c, s)?;
            }
        }
        if self.offset_min != 0.0 || self.offset_max != 0.0 {
            write!(f, " + [{}, {}]", self.offset_min, self.offset_max)?;
        }
        Ok(())
    }
}

impl Add<&AffineForm> for &AffineForm {
    type Output = AffineForm;

    fn add(self, rhs: &AffineForm) -> AffineForm {
        AffineForm {
            center: self.center + rhs.center,
            terms: merge_terms(&self.terms, &rhs.terms, |x, y| x + y),
            offset_min: self.offset_min + rhs.offset_min,
            offset_max: self.offset_max + rhs.offset_max,
        }
    }
}

impl Sub<&AffineForm> for &AffineForm {
    type Output = AffineForm;

    fn sub(self, rhs: &AffineForm) -> AffineForm {
        AffineForm {
            center: self.center - rhs.center,
            terms: merge_terms(&self.terms, &rhs.terms, |x, y| x - y),
            offset_min: self.offset_min - rhs.offset_max,
            offset_max: self.offset_max - rhs.offset_min,
        }
    }
}

macro_rules! forward_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<AffineForm> for AffineForm {
            type Output = AffineForm;

            fn $method(self, rhs: AffineForm) -> AffineForm {
                (&self).$method(&rhs)
            }
        }

        impl $imp<&AffineForm> for AffineForm {
            type Output = AffineForm;

            fn $method(self, rhs: &AffineForm) -> AffineForm {
                (&self).$method(rhs)
            }
        }

        impl $imp<AffineForm> for &AffineForm {
            type Output = AffineForm;

            fn $method(self, rhs: AffineForm) -> AffineForm {
                self.$method(&rhs)
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);

impl Neg for &AffineForm {
    type Output = AffineForm;

    fn neg(self) -> AffineForm {
        self.map_linear(|x| -x, true)
    }
}

impl Neg for AffineForm {
    type Output = AffineForm;

    fn neg(self) -> AffineForm {
        -&self
    }
}

impl Add<f64> for &AffineForm {
    type Output = AffineForm;

    fn add(self, rhs: f64) -> AffineForm {
        let mut form = self.clone();
        form.center += rhs;
        form
    }
}

impl Add<f64> for AffineForm {
    type Output = AffineForm;

    fn add(mut self, rhs: f64) -> AffineForm {
        self.center += rhs;
        self
    }
}

impl Sub<f64> for &AffineForm {
    type Output = AffineForm;

    fn sub(self, rhs: f64) -> AffineForm {
        self + (-rhs)
    }
}

impl Sub<f64> for AffineForm {
    type Output = AffineForm;

    fn sub(self, rhs: f64) -> AffineForm {
        self + (-rhs)
    }
}

impl Mul<f64> for &AffineForm {
    type Output = AffineForm;

    fn mul(self, rhs: f64) -> AffineForm {
        if rhs == 0.0 {
            return AffineForm::constant(0.0);
        }
        self.map_linear(|x| x * rhs, rhs < 0.0)
    }
}

impl Mul<f64> for AffineForm {
    type Output = AffineForm;

    fn mul(self, rhs: f64) -> AffineForm {
        &self * rhs
    }
}

impl Mul<&AffineForm> for f64 {
    type Output = AffineForm;

    fn mul(self, rhs: &AffineForm) -> AffineForm {
        rhs * self
    }
}

impl AddAssign<&AffineForm> for AffineForm {
    fn add_assign(&mut self, rhs: &AffineForm) {
        *self = &*self + rhs;
    }
}

impl SubAssign<&AffineForm> for AffineForm {
    fn sub_assign(&mut self, rhs: &AffineForm) {
        *self = &*self - rhs;
    }
}

impl AddAssign<f64> for AffineForm {
    fn add_assign(&mut self, rhs: f64) {
        self.center += rhs;
    }
}

impl SubAssign<f64> for AffineForm {
    fn sub_assign(&mut self, rhs: f64) {
        self.center -= rhs;
    }
}

impl MulAssign<f64> for AffineForm {
    fn mul_assign(&mut self, rhs: f64) {
        *self = &*self * rhs;
    }
}
