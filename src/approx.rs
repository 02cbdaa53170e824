//! Nonlinear operations on affine forms.
//!
//! Products, reciprocals and elementary functions cannot be represented exactly
//! by an affine form. They are replaced by a linear approximation `alpha*x + dzeta`
//! plus an error term of half-width `delta`, which is carried by one fresh noise
//! symbol. The slope `alpha` is chosen by the configured [`Approximation`].
//!
//! Whatever the slope, the error term is computed from the residual
//! `f(t) - alpha*t` over the whole enclosing interval of the argument, so every
//! mode yields a sound enclosure; the modes differ only in tightness.
//!
//! # Examples
//!
//! ```
//! use aadd_rs::approx::{AffineContext, Approximation};
//!
//! let ctx = AffineContext::new(Approximation::Chebyshev);
//! let x = ctx.interval(1.0, 4.0);
//! let y = ctx.sqrt(&x).unwrap();
//! assert!(y.min() <= 1.0 && y.max() >= 2.0);
//! ```

use std::cell::Cell;
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::affine::{merge_terms, AffineForm, EPSILON, MIN_RADIUS};
use crate::elementary::{Atan, Elementary, Exp, InvSqrt, Log, LogExp, Power, Reciprocal, Sqrt, Tanh};
use crate::error::{Error, Result};
use crate::types::Symbol;

/// Number of sample points of the least-squares fit used by `sin`.
const SIN_SAMPLES: usize = 8;

/// Strategy for choosing the slope of nonlinear approximations.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Approximation {
    /// Slope at the end of the interval that minimizes the range of the result.
    MinRange,
    /// Secant slope, with the error term centered between the two tangents
    /// parallel to it.
    #[default]
    Chebyshev,
    /// Secant slope; the error goes into the offsets instead of a fresh symbol.
    Secant,
    /// Chebyshev slopes; products and reciprocals fall back to a fresh symbol
    /// over the exact interval-arithmetic result when that range is tighter.
    IntervalExact,
}

impl fmt::Display for Approximation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Approximation::MinRange => "min-range",
            Approximation::Chebyshev => "chebyshev",
            Approximation::Secant => "secant",
            Approximation::IntervalExact => "interval-exact",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Approximation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "min-range" | "minrange" => Ok(Approximation::MinRange),
            "chebyshev" => Ok(Approximation::Chebyshev),
            "secant" => Ok(Approximation::Secant),
            "interval-exact" | "exact" => Ok(Approximation::IntervalExact),
            _ => Err(format!("unknown approximation mode: {}", s)),
        }
    }
}

/// Source of fresh noise symbols and holder of the approximation mode.
///
/// Symbols are never reused: every call to [`fresh_symbol`](Self::fresh_symbol)
/// returns a symbol larger than all previous ones.
#[derive(Debug, Default)]
pub struct AffineContext {
    next_symbol: Cell<u64>,
    approximation: Cell<Approximation>,
}

impl AffineContext {
    pub fn new(approximation: Approximation) -> Self {
        AffineContext {
            next_symbol: Cell::new(0),
            approximation: Cell::new(approximation),
        }
    }

    pub fn approximation(&self) -> Approximation {
        self.approximation.get()
    }

    pub fn set_approximation(&self, approximation: Approximation) {
        debug!("approximation mode set to {}", approximation);
        self.approximation.set(approximation);
    }

    pub fn fresh_symbol(&self) -> Symbol {
        let id = self.next_symbol.get();
        self.next_symbol.set(id + 1);
        Symbol::new(id)
    }

    /// Number of symbols minted so far.
    pub fn num_symbols(&self) -> u64 {
        self.next_symbol.get()
    }

    /// Creates a form ranging over `[lo, hi]` with a fresh noise symbol.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi`.
    pub fn interval(&self, lo: f64, hi: f64) -> AffineForm {
        if lo == hi {
            return AffineForm::constant(lo);
        }
        AffineForm::interval(lo, hi, self.fresh_symbol())
    }

    /// Product of two forms.
    ///
    /// The linear part `c1*y + c2*x` is exact; the quadratic remainder
    /// `c1*[oy] + c2*[ox] + Dx*Dy` goes into the offsets, where `Dx` is the
    /// envelope of the deviation of `x` from its center.
    pub fn mul(&self, x: &AffineForm, y: &AffineForm) -> AffineForm {
        if y.is_constant() {
            return x * y.center();
        }
        if x.is_constant() {
            return y * x.center();
        }

        let (cx, cy) = (x.center(), y.center());
        let terms = merge_terms(x.terms(), y.terms(), |a, b| cy * a + cx * b);

        let (rx, ry) = (x.radius(), y.radius());
        let dx = (x.offset_min() - rx, x.offset_max() + rx);
        let dy = (y.offset_min() - ry, y.offset_max() + ry);
        let quadratic = interval_mul(dx, dy);
        let from_x = interval_scale((x.offset_min(), x.offset_max()), cy);
        let from_y = interval_scale((y.offset_min(), y.offset_max()), cx);

        let result = AffineForm::from_parts(
            cx * cy,
            terms,
            quadratic.0 + from_x.0 + from_y.0,
            quadratic.1 + from_x.1 + from_y.1,
        );
        if self.approximation() == Approximation::IntervalExact {
            let (lo, hi) = interval_mul((x.min(), x.max()), (y.min(), y.max()));
            return self.narrower(result, lo, hi);
        }
        result
    }

    /// Reciprocal `1/x`.
    ///
    /// Fails with [`Error::DivisionByZero`] if the enclosing interval of `x`
    /// contains zero.
    pub fn inv(&self, x: &AffineForm) -> Result<AffineForm> {
        if x.is_constant() {
            let c = x.center();
            if c == 0.0 {
                return Err(Error::DivisionByZero { lo: c, hi: c });
            }
            return Ok(AffineForm::constant(1.0 / c));
        }
        let (a, b) = (x.min(), x.max());
        if a <= 0.0 && b >= 0.0 {
            return Err(Error::DivisionByZero { lo: a, hi: b });
        }
        let result = self.linearize(x, &Reciprocal);
        if self.approximation() == Approximation::IntervalExact {
            return Ok(self.narrower(result, 1.0 / b, 1.0 / a));
        }
        Ok(result)
    }

    /// Quotient `x / y`, computed as `x * inv(y)`.
    pub fn div(&self, x: &AffineForm, y: &AffineForm) -> Result<AffineForm> {
        if y.is_constant() {
            return x.checked_div_scalar(y.center());
        }
        if x == y {
            return Ok(AffineForm::constant(1.0));
        }
        let inverse = self.inv(y)?;
        Ok(self.mul(x, &inverse))
    }

    /// Integer power `x^n`.
    pub fn pow(&self, x: &AffineForm, n: i32) -> Result<AffineForm> {
        match n {
            0 => return Ok(AffineForm::constant(1.0)),
            1 => return Ok(x.clone()),
            -1 => return self.inv(x),
            _ => {}
        }
        if x.is_constant() {
            let c = x.center();
            if n < 0 && c == 0.0 {
                return Err(Error::DivisionByZero { lo: c, hi: c });
            }
            return Ok(AffineForm::constant(c.powi(n)));
        }
        let (a, b) = (x.min(), x.max());
        if n < 0 && a * b < EPSILON {
            return Err(Error::DivisionByZero { lo: a, hi: b });
        }
        Ok(self.linearize(x, &Power(n)))
    }

    /// Square root. Fails with [`Error::NegativeRoot`] if the argument may be
    /// at or below zero.
    pub fn sqrt(&self, x: &AffineForm) -> Result<AffineForm> {
        if x.is_constant() {
            let c = x.center();
            if c < 0.0 {
                return Err(Error::NegativeRoot { lo: c, hi: c });
            }
            return Ok(AffineForm::constant(c.sqrt()));
        }
        let (a, b) = (x.min(), x.max());
        if a <= EPSILON {
            return Err(Error::NegativeRoot { lo: a, hi: b });
        }
        Ok(self.linearize(x, &Sqrt))
    }

    /// Inverse square root `1/sqrt(x)`.
    pub fn isqrt(&self, x: &AffineForm) -> Result<AffineForm> {
        if x.is_constant() {
            let c = x.center();
            if c <= 0.0 {
                return Err(Error::NegativeRoot { lo: c, hi: c });
            }
            return Ok(AffineForm::constant(1.0 / c.sqrt()));
        }
        let (a, b) = (x.min(), x.max());
        if a <= EPSILON {
            return Err(Error::NegativeRoot { lo: a, hi: b });
        }
        Ok(self.linearize(x, &InvSqrt))
    }

    pub fn exp(&self, x: &AffineForm) -> AffineForm {
        if x.is_constant() {
            return AffineForm::constant(x.center().exp());
        }
        self.linearize(x, &Exp)
    }

    /// Natural logarithm. Fails with [`Error::NegativeLog`] if the argument may
    /// be at or below zero.
    pub fn log(&self, x: &AffineForm) -> Result<AffineForm> {
        if x.is_constant() {
            let c = x.center();
            if c <= 0.0 {
                return Err(Error::NegativeLog { lo: c, hi: c });
            }
            return Ok(AffineForm::constant(c.ln()));
        }
        let (a, b) = (x.min(), x.max());
        if a <= EPSILON {
            return Err(Error::NegativeLog { lo: a, hi: b });
        }
        Ok(self.linearize(x, &Log))
    }

    /// `ln(1 + exp(x))`
    pub fn logexp(&self, x: &AffineForm) -> AffineForm {
        if x.is_constant() {
            return AffineForm::constant(LogExp.value(x.center()));
        }
        self.linearize(x, &LogExp)
    }

    pub fn atan(&self, x: &AffineForm) -> AffineForm {
        if x.is_constant() {
            return AffineForm::constant(x.center().atan());
        }
        self.linearize(x, &Atan)
    }

    pub fn tanh(&self, x: &AffineForm) -> AffineForm {
        if x.is_constant() {
            return AffineForm::constant(x.center().tanh());
        }
        self.linearize(x, &Tanh)
    }

    /// Sine.
    ///
    /// Sine is neither monotonic nor convex over an arbitrary interval, so the
    /// slope comes from a least-squares line through evenly spaced samples.
    /// The error bound is the largest sampled residual plus `h^2/8` for the
    /// sample spacing `h`, which covers the residual between samples since
    /// `|sin''| <= 1`.
    pub fn sin(&self, x: &AffineForm) -> AffineForm {
        if x.is_constant() {
            return AffineForm::constant(x.center().sin());
        }
        let (a, b) = (x.min(), x.max());
        if b - a >= 2.0 * PI {
            return self.combine(x, 0.0, 0.0, 1.0);
        }

        let (alpha, beta, samples, h) = if b - a < MIN_RADIUS {
            let m = 0.5 * (a + b);
            let alpha = m.cos();
            (alpha, m.sin() - alpha * m, vec![a, b], b - a)
        } else {
            let h = (b - a) / (SIN_SAMPLES - 1) as f64;
            let samples: Vec<f64> = (0..SIN_SAMPLES).map(|i| a + h * i as f64).collect();
            let n = SIN_SAMPLES as f64;
            let mean_x = samples.iter().sum::<f64>() / n;
            let mean_y = samples.iter().map(|t| t.sin()).sum::<f64>() / n;
            let mut sxy = 0.0;
            let mut sxx = 0.0;
            for &t in &samples {
                sxy += (t - mean_x) * (t.sin() - mean_y);
                sxx += (t - mean_x) * (t - mean_x);
            }
            let alpha = sxy / sxx;
            (alpha, mean_y - alpha * mean_x, samples, h)
        };

        let residual = samples
            .iter()
            .map(|&t| (t.sin() - (alpha * t + beta)).abs())
            .fold(0.0, f64::max);
        self.combine(x, alpha, beta, residual + h * h / 8.0)
    }

    pub fn cos(&self, x: &AffineForm) -> AffineForm {
        if x.is_constant() {
            return AffineForm::constant(x.center().cos());
        }
        self.sin(&(x + FRAC_PI_2))
    }

    /// Tangent as `sin(x) / cos(x)`.
    pub fn tan(&self, x: &AffineForm) -> Result<AffineForm> {
        if x.is_constant() {
            return Ok(AffineForm::constant(x.center().tan()));
        }
        let sin = self.sin(x);
        let cos = self.cos(x);
        self.div(&sin, &cos)
    }

    /// Cotangent as `cos(x) / sin(x)`.
    pub fn cotan(&self, x: &AffineForm) -> Result<AffineForm> {
        if x.is_constant() {
            let c = x.center();
            if c.sin() == 0.0 {
                return Err(Error::DivisionByZero { lo: c, hi: c });
            }
            return Ok(AffineForm::constant(c.cos() / c.sin()));
        }
        let sin = self.sin(x);
        let cos = self.cos(x);
        self.div(&cos, &sin)
    }

    /// Rounds to the nearest integer.
    ///
    /// If both ends of the enclosing interval round to the same integer the
    /// result is that constant; otherwise the offsets are widened by `0.5` on
    /// each side.
    pub fn round(&self, x: &AffineForm) -> AffineForm {
        let (lo, hi) = (x.min().round(), x.max().round());
        if lo == hi {
            return AffineForm::constant(lo);
        }
        x.widen(-0.5, 0.5)
    }

    /// Linear approximation of `f` over the enclosing interval of `x`.
    fn linearize<F: Elementary>(&self, x: &AffineForm, f: &F) -> AffineForm {
        let (a, b) = (x.min(), x.max());
        let alpha = if b - a < MIN_RADIUS {
            f.derivative(0.5 * (a + b))
        } else {
            match self.approximation() {
                Approximation::MinRange => f.min_range_slope(a, b),
                _ => (f.value(b) - f.value(a)) / (b - a),
            }
        };

        // The residual f(t) - alpha*t reaches its extremes at the ends or
        // where f'(t) == alpha.
        let residual = |t: f64| f.value(t) - alpha * t;
        let (mut lo, mut hi) = (residual(a), residual(a));
        let interior = f.tangent_points(alpha).into_iter().filter(|&t| t > a && t < b);
        for t in std::iter::once(b).chain(interior) {
            let r = residual(t);
            lo = lo.min(r);
            hi = hi.max(r);
        }
        let dzeta = 0.5 * (lo + hi);
        let delta = 0.5 * (hi - lo);
        debug!(
            "linearize over [{}, {}]: alpha = {}, dzeta = {}, delta = {}",
            a, b, alpha, dzeta, delta
        );
        self.combine(x, alpha, dzeta, delta)
    }

    /// Picks the tighter of `result` and a form over the exact range `[lo, hi]`.
    ///
    /// The exact range gets a fresh symbol: it encloses the true value but
    /// loses the correlation with the operands.
    fn narrower(&self, result: AffineForm, lo: f64, hi: f64) -> AffineForm {
        if hi - lo < result.max() - result.min() {
            debug!("exact range [{}, {}] is tighter than {}", lo, hi, result);
            self.interval(lo, hi)
        } else {
            result
        }
    }

    /// Builds `alpha*x + dzeta +- delta`.
    fn combine(&self, x: &AffineForm, alpha: f64, dzeta: f64, delta: f64) -> AffineForm {
        let mut terms: Vec<_> = x.terms().iter().map(|&(s, c)| (s, alpha * c)).collect();
        let (mut offset_min, mut offset_max) = interval_scale((x.offset_min(), x.offset_max()), alpha);
        if delta > 0.0 {
            if self.approximation() == Approximation::Secant {
                offset_min -= delta;
                offset_max += delta;
            } else {
                let symbol = self.fresh_symbol();
                debug!("fresh symbol {} carries approximation error {}", symbol, delta);
                terms.push((symbol, delta));
            }
        }
        AffineForm::from_parts(alpha * x.center() + dzeta, terms, offset_min, offset_max)
    }
}

fn interval_scale((lo, hi): (f64, f64), k: f64) -> (f64, f64) {
    if k >= 0.0 {
        (k * lo, k * hi)
    } else {
        (k * hi, k * lo)
    }
}

fn interval_mul((a, b): (f64, f64), (c, d): (f64, f64)) -> (f64, f64) {
    let products = [a * c, a * d, b * c, b * d];
    let lo = products.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = products.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    const TOL: f64 = 1e-9;

    /// Evaluates `x` at the corners and center of the symbol box and checks
    /// that `f` of those points lies within `y`.
    fn assert_encloses(x: &AffineForm, y: &AffineForm, f: impl Fn(f64) -> f64) {
        let symbols: Vec<_> = x.symbols().collect();
        for k in 0..=20 {
            let e = -1.0 + 0.1 * k as f64;
            let v = x.evaluate(|s| if symbols.first() == Some(&s) { e } else { -e });
            let fv = f(v);
            assert!(
                y.min() - TOL <= fv && fv <= y.max() + TOL,
                "f({}) = {} not in [{}, {}]",
                v,
                fv,
                y.min(),
                y.max()
            );
        }
    }

    #[test]
    fn test_fresh_symbols_increase() {
        let ctx = AffineContext::default();
        let a = ctx.fresh_symbol();
        let b = ctx.fresh_symbol();
        assert!(a < b);
        assert_eq!(ctx.num_symbols(), 2);
    }

    #[test]
    fn test_interval_mints_symbol() {
        let ctx = AffineContext::default();
        let a = ctx.interval(0.0, 2.0);
        let b = ctx.interval(0.0, 2.0);
        assert_ne!(a, b);
        assert_eq!(ctx.num_symbols(), 2);
        let c = ctx.interval(3.0, 3.0);
        assert!(c.is_constant());
        assert_eq!(ctx.num_symbols(), 2);
    }

    #[test]
    fn test_mul_encloses_product() {
        let ctx = AffineContext::default();
        let x = ctx.interval(-1.0, 3.0);
        let y = ctx.interval(2.0, 5.0);
        let p = ctx.mul(&x, &y);
        for i in 0..=10 {
            for j in 0..=10 {
                let (ex, ey) = (-1.0 + 0.2 * i as f64, -1.0 + 0.2 * j as f64);
                let (sx, sy) = (x.terms()[0].0, y.terms()[0].0);
                let vx = x.evaluate(|s| if s == sx { ex } else { 0.0 });
                let vy = y.evaluate(|s| if s == sy { ey } else { 0.0 });
                assert!(p.min() - TOL <= vx * vy && vx * vy <= p.max() + TOL);
            }
        }
    }

    #[test]
    fn test_mul_by_constant() {
        let ctx = AffineContext::default();
        let x = ctx.interval(1.0, 3.0);
        let p = ctx.mul(&x, &AffineForm::constant(2.0));
        assert_eq!(p.min(), 2.0);
        assert_eq!(p.max(), 6.0);
        assert_eq!(ctx.num_symbols(), 1);
    }

    #[test]
    fn test_mul_interval_exact_takes_tighter_range() {
        let ctx = AffineContext::new(Approximation::IntervalExact);
        let x = ctx.interval(1.0, 2.0);
        let y = ctx.interval(3.0, 4.0);
        let p = ctx.mul(&x, &y);
        assert_eq!(p.min(), 3.0);
        assert_eq!(p.max(), 8.0);
        assert_eq!(p.num_terms(), 1);
        assert!(!p.shares_symbols(&x) && !p.shares_symbols(&y));

        // Here the affine product is tighter than the interval one and is kept.
        let (s0, s1) = (ctx.fresh_symbol(), ctx.fresh_symbol());
        let u = AffineForm::from_parts(10.0, [(s0, 1.0), (s1, 1.0)], 0.0, 0.0);
        let v = AffineForm::from_parts(10.0, [(s0, 1.0), (s1, -1.0)], 0.0, 0.0);
        let q = ctx.mul(&u, &v);
        assert!(q.shares_symbols(&u));
        assert!(q.max() - q.min() < 80.0);
    }

    #[test]
    fn test_correlated_follow_up_stays_sound() {
        for mode in [
            Approximation::Chebyshev,
            Approximation::MinRange,
            Approximation::Secant,
            Approximation::IntervalExact,
        ] {
            let ctx = AffineContext::new(mode);
            let x = ctx.interval(1.0, 3.0);
            let y = ctx.interval(1.0, 3.0);
            // x*y - 2x - 2y cancels the linear part of the product.
            let p = ctx.mul(&x, &y);
            let q = &(&p - &(&x * 2.0)) - &(&y * 2.0);
            let r = &ctx.inv(&x).unwrap() + &(&x * 0.25);

            let (sx, sy) = (x.terms()[0].0, y.terms()[0].0);
            for i in 0..=10 {
                for j in 0..=10 {
                    let (ex, ey) = (-1.0 + 0.2 * i as f64, -1.0 + 0.2 * j as f64);
                    let at = |s: Symbol| if s == sx { ex } else if s == sy { ey } else { 0.0 };
                    let (vx, vy) = (x.evaluate(at), y.evaluate(at));

                    let v = vx * vy - 2.0 * vx - 2.0 * vy;
                    assert!(
                        q.min() - TOL <= v && v <= q.max() + TOL,
                        "{}: {} not in [{}, {}] at x = {}, y = {}",
                        mode,
                        v,
                        q.min(),
                        q.max(),
                        vx,
                        vy
                    );

                    let w = 1.0 / vx + 0.25 * vx;
                    assert!(r.min() - TOL <= w && w <= r.max() + TOL, "{}: {} not in {}", mode, w, r);
                }
            }
        }
    }

    #[test]
    fn test_inv_point_interval() {
        let ctx = AffineContext::default();
        let x = ctx.interval(2.0, 2.0);
        let y = ctx.inv(&x).unwrap();
        assert!(y.is_constant());
        assert_eq!(y.center(), 0.5);
        assert_eq!(y.num_terms(), 0);
    }

    #[test]
    fn test_inv_straddling_zero() {
        let ctx = AffineContext::default();
        let x = ctx.interval(-1.0, 2.0);
        assert_eq!(ctx.inv(&x), Err(Error::DivisionByZero { lo: -1.0, hi: 2.0 }));
        let z = AffineForm::constant(0.0);
        assert!(matches!(ctx.inv(&z), Err(Error::DivisionByZero { .. })));
    }

    #[test]
    fn test_inv_encloses() {
        for mode in [
            Approximation::Chebyshev,
            Approximation::MinRange,
            Approximation::Secant,
            Approximation::IntervalExact,
        ] {
            let ctx = AffineContext::new(mode);
            let x = ctx.interval(1.0, 4.0);
            let y = ctx.inv(&x).unwrap();
            assert_encloses(&x, &y, |v| 1.0 / v);
            let x = ctx.interval(-5.0, -0.5);
            let y = ctx.inv(&x).unwrap();
            assert_encloses(&x, &y, |v| 1.0 / v);
        }
    }

    #[test]
    fn test_div_self_is_one() {
        let ctx = AffineContext::default();
        let x = ctx.interval(1.0, 2.0);
        let q = ctx.div(&x, &x).unwrap();
        assert!(q.is_constant());
        assert_eq!(q.center(), 1.0);
    }

    #[test]
    fn test_div_by_constant() {
        let ctx = AffineContext::default();
        let x = ctx.interval(2.0, 4.0);
        let q = ctx.div(&x, &AffineForm::constant(2.0)).unwrap();
        assert_eq!(q.min(), 1.0);
        assert_eq!(q.max(), 2.0);
        assert!(ctx.div(&x, &AffineForm::constant(0.0)).is_err());
    }

    #[test]
    fn test_div_encloses() {
        let ctx = AffineContext::default();
        let x = ctx.interval(1.0, 2.0);
        let y = ctx.interval(4.0, 8.0);
        let q = ctx.div(&x, &y).unwrap();
        assert!(q.min() <= 0.125 + TOL);
        assert!(q.max() >= 0.5 - TOL);
    }

    #[test]
    fn test_pow_special_exponents() {
        let ctx = AffineContext::default();
        let x = ctx.interval(1.0, 2.0);
        assert_eq!(ctx.pow(&x, 0).unwrap(), AffineForm::constant(1.0));
        assert_eq!(ctx.pow(&x, 1).unwrap(), x);
        let p = ctx.pow(&x, -1).unwrap();
        let q = ctx.inv(&x).unwrap();
        assert!((p.min() - q.min()).abs() < TOL);
        assert!((p.max() - q.max()).abs() < TOL);
    }

    #[test]
    fn test_pow_encloses() {
        for mode in [Approximation::Chebyshev, Approximation::MinRange, Approximation::Secant] {
            let ctx = AffineContext::new(mode);
            for n in [2, 3, 4, 5] {
                let x = ctx.interval(-1.5, 2.0);
                let y = ctx.pow(&x, n).unwrap();
                assert_encloses(&x, &y, |v| v.powi(n));
            }
            let x = ctx.interval(0.5, 2.0);
            let y = ctx.pow(&x, -2).unwrap();
            assert_encloses(&x, &y, |v| v.powi(-2));
        }
    }

    #[test]
    fn test_pow_smallest_exponent() {
        for mode in [Approximation::Chebyshev, Approximation::MinRange] {
            let ctx = AffineContext::new(mode);
            let x = ctx.interval(1.0, 2.0);
            let y = ctx.pow(&x, i32::MIN).unwrap();
            assert!(y.min() <= TOL);
            assert!(y.max() >= 1.0 - TOL);
        }
    }

    #[test]
    fn test_pow_negative_through_zero() {
        let ctx = AffineContext::default();
        let x = ctx.interval(-1.0, 1.0);
        assert!(matches!(ctx.pow(&x, -2), Err(Error::DivisionByZero { .. })));
    }

    #[test]
    fn test_sqrt_negative_root() {
        let ctx = AffineContext::default();
        let x = ctx.interval(-1.0, 4.0);
        assert_eq!(ctx.sqrt(&x), Err(Error::NegativeRoot { lo: -1.0, hi: 4.0 }));
        assert!(matches!(ctx.isqrt(&x), Err(Error::NegativeRoot { .. })));
        assert!(matches!(ctx.log(&x), Err(Error::NegativeLog { .. })));
        assert!(matches!(
            ctx.sqrt(&AffineForm::constant(-2.0)),
            Err(Error::NegativeRoot { .. })
        ));
    }

    #[test]
    fn test_unary_functions_enclose() {
        for mode in [
            Approximation::Chebyshev,
            Approximation::MinRange,
            Approximation::Secant,
            Approximation::IntervalExact,
        ] {
            let ctx = AffineContext::new(mode);
            let x = ctx.interval(0.5, 3.0);
            assert_encloses(&x, &ctx.sqrt(&x).unwrap(), f64::sqrt);
            assert_encloses(&x, &ctx.isqrt(&x).unwrap(), |v| 1.0 / v.sqrt());
            assert_encloses(&x, &ctx.log(&x).unwrap(), f64::ln);

            let x = ctx.interval(-2.0, 1.5);
            assert_encloses(&x, &ctx.exp(&x), f64::exp);
            assert_encloses(&x, &ctx.logexp(&x), |v| v.exp().ln_1p());
            assert_encloses(&x, &ctx.atan(&x), f64::atan);
            assert_encloses(&x, &ctx.tanh(&x), f64::tanh);
            assert_encloses(&x, &ctx.sin(&x), f64::sin);
            assert_encloses(&x, &ctx.cos(&x), f64::cos);
        }
    }

    #[test]
    fn test_secant_adds_no_symbol() {
        let ctx = AffineContext::new(Approximation::Secant);
        let x = ctx.interval(1.0, 2.0);
        let before = ctx.num_symbols();
        let y = ctx.exp(&x);
        assert_eq!(ctx.num_symbols(), before);
        assert_eq!(y.num_terms(), 1);
        assert!(y.offset_min() < 0.0 && y.offset_max() > 0.0);
    }

    #[test]
    fn test_chebyshev_adds_one_symbol() {
        let ctx = AffineContext::new(Approximation::Chebyshev);
        let x = ctx.interval(1.0, 2.0);
        let before = ctx.num_symbols();
        let y = ctx.exp(&x);
        assert_eq!(ctx.num_symbols(), before + 1);
        assert_eq!(y.num_terms(), 2);
    }

    #[test]
    fn test_constant_shortcut() {
        let ctx = AffineContext::default();
        let c = AffineForm::constant(4.0);
        assert_eq!(ctx.sqrt(&c).unwrap(), AffineForm::constant(2.0));
        assert_eq!(ctx.exp(&AffineForm::constant(0.0)), AffineForm::constant(1.0));
        assert_eq!(ctx.num_symbols(), 0);
    }

    #[test]
    fn test_sin_wide_interval() {
        let ctx = AffineContext::default();
        let x = ctx.interval(0.0, 10.0);
        let y = ctx.sin(&x);
        assert_eq!(y.center(), 0.0);
        assert_eq!(y.min(), -1.0);
        assert_eq!(y.max(), 1.0);
    }

    #[test]
    fn test_tan_and_cotan() {
        let ctx = AffineContext::default();
        let x = ctx.interval(0.2, 0.6);
        let t = ctx.tan(&x).unwrap();
        assert!(t.min() <= 0.2f64.tan() + TOL);
        assert!(t.max() >= 0.6f64.tan() - TOL);
        let c = ctx.cotan(&x).unwrap();
        assert!(c.min() <= 1.0 / 0.6f64.tan() + TOL);
        assert!(c.max() >= 1.0 / 0.2f64.tan() - TOL);

        let around_zero = ctx.interval(-0.5, 0.5);
        assert!(ctx.cotan(&around_zero).is_err());
    }

    #[test]
    fn test_round() {
        let ctx = AffineContext::default();
        let x = ctx.interval(1.6, 2.4);
        assert_eq!(ctx.round(&x), AffineForm::constant(2.0));

        let y = ctx.interval(1.0, 3.0);
        let r = ctx.round(&y);
        assert_eq!(r.min(), 0.5);
        assert_eq!(r.max(), 3.5);
    }

    #[test]
    fn test_approximation_from_str() {
        assert_eq!("secant".parse::<Approximation>(), Ok(Approximation::Secant));
        assert_eq!("min-range".parse::<Approximation>(), Ok(Approximation::MinRange));
        assert!("bogus".parse::<Approximation>().is_err());
        assert_eq!(Approximation::default(), Approximation::Chebyshev);
        assert_eq!(Approximation::IntervalExact.to_string(), "interval-exact");
    }
}
