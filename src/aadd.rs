//! Affine decision diagrams.
//!
//! Value diagrams ([`Aadd`]) carry an affine form in every leaf. Arithmetic is
//! lifted from leaves to diagrams with Apply; the product, quotient and unary
//! functions use the manager's [`AffineContext`][crate::approx::AffineContext],
//! so they share its noise symbols and approximation mode.
//!
//! Data-dependent choice is expressed with [`Manager::ite`], built on the
//! selection primitive [`Manager::b_times_a`].
//!
//! # Examples
//!
//! ```
//! use aadd_rs::manager::Manager;
//!
//! let mgr = Manager::default();
//! let x = mgr.uncertain(0.0, 4.0);
//! let big = mgr.gt(&x, &mgr.scalar(1.0));
//! let y = mgr.ite(&big, &mgr.add_scalar(&x, 10.0), &mgr.add_scalar(&x, -10.0));
//! assert_eq!(y.num_leaves(), 2);
//! ```

use log::debug;

use crate::affine::AffineForm;
use crate::diagram::Diagram;
use crate::error::{Error, Result};
use crate::manager::{Aadd, Bdd, Manager};

/// Lifts a unary function of the affine context to value diagrams.
macro_rules! lift_unary {
    ($($(#[$attr:meta])* $name:ident;)*) => {
        $(
            $(#[$attr])*
            pub fn $name(&self, f: &Aadd) -> Aadd {
                debug!("{}(f = {})", stringify!($name), f.index());
                f.map(|x| self.context().$name(x))
            }
        )*
    };
}

/// Same as `lift_unary`, for functions with a restricted domain.
macro_rules! lift_unary_checked {
    ($($(#[$attr:meta])* $name:ident;)*) => {
        $(
            $(#[$attr])*
            pub fn $name(&self, f: &Aadd) -> Result<Aadd> {
                debug!("{}(f = {})", stringify!($name), f.index());
                f.try_map(&mut |x| self.context().$name(x))
            }
        )*
    };
}

fn combine_leaves(f: &Aadd, g: &Aadd, mut op: impl FnMut(&AffineForm, &AffineForm) -> AffineForm) -> Aadd {
    f.apply(g, |f, g| match (f.as_leaf(), g.as_leaf()) {
        (Some(a), Some(b)) => Some(Diagram::leaf(op(a, b))),
        _ => None,
    })
}

fn try_combine_leaves(
    f: &Aadd,
    g: &Aadd,
    mut op: impl FnMut(&AffineForm, &AffineForm) -> Result<AffineForm>,
) -> Result<Aadd> {
    f.try_apply(g, &mut |f: &Aadd, g: &Aadd| match (f.as_leaf(), g.as_leaf()) {
        (Some(a), Some(b)) => op(a, b).map(|v| Some(Diagram::leaf(v))),
        _ => Ok(None),
    })
}

/// Value of a leaf without uncertainty.
fn exact_value(operation: &'static str, x: &AffineForm) -> Result<f64> {
    if x.is_constant() {
        Ok(x.center())
    } else {
        Err(Error::UncertainOperand {
            operation,
            lo: x.min(),
            hi: x.max(),
        })
    }
}

impl Manager {
    pub fn add(&self, f: &Aadd, g: &Aadd) -> Aadd {
        debug!("add(f = {}, g = {})", f.index(), g.index());
        combine_leaves(f, g, |a, b| a + b)
    }

    pub fn sub(&self, f: &Aadd, g: &Aadd) -> Aadd {
        debug!("sub(f = {}, g = {})", f.index(), g.index());
        combine_leaves(f, g, |a, b| a - b)
    }

    pub fn neg(&self, f: &Aadd) -> Aadd {
        f.map(|x| -x)
    }

    pub fn mul(&self, f: &Aadd, g: &Aadd) -> Aadd {
        debug!("mul(f = {}, g = {})", f.index(), g.index());
        combine_leaves(f, g, |a, b| self.context().mul(a, b))
    }

    /// Quotient. Fails if some divisor leaf may be zero.
    pub fn div(&self, f: &Aadd, g: &Aadd) -> Result<Aadd> {
        debug!("div(f = {}, g = {})", f.index(), g.index());
        try_combine_leaves(f, g, |a, b| self.context().div(a, b))
    }

    pub fn add_scalar(&self, f: &Aadd, k: f64) -> Aadd {
        f.map(|x| x + k)
    }

    pub fn mul_scalar(&self, f: &Aadd, k: f64) -> Aadd {
        f.map(|x| x * k)
    }

    pub fn div_scalar(&self, f: &Aadd, k: f64) -> Result<Aadd> {
        f.try_map(&mut |x| x.checked_div_scalar(k))
    }

    lift_unary! {
        exp;
        /// `ln(1 + exp(x))`
        logexp;
        atan;
        tanh;
        sin;
        cos;
        /// Rounds every leaf to the nearest integer.
        round;
    }

    lift_unary_checked! {
        sqrt;
        /// `1/sqrt(x)`
        isqrt;
        log;
        inv;
        tan;
        cotan;
    }

    pub fn pow(&self, f: &Aadd, n: i32) -> Result<Aadd> {
        debug!("pow(f = {}, n = {})", f.index(), n);
        f.try_map(&mut |x| self.context().pow(x, n))
    }

    /// Absolute value, as `ite(f < 0, -f, f)`.
    pub fn abs(&self, f: &Aadd) -> Aadd {
        debug!("abs(f = {})", f.index());
        let negative = self.lt(f, &self.scalar(0.0));
        self.ite(&negative, &self.neg(f), f)
    }

    /// Rounds every leaf down. Leaves must be exact.
    pub fn floor(&self, f: &Aadd) -> Result<Aadd> {
        f.try_map(&mut |x| exact_value("floor", x).map(|v| AffineForm::constant(v.floor())))
    }

    /// Integer remainder of the truncated leaf values by `n`, with the sign of
    /// the dividend. Leaves must be exact.
    pub fn remainder(&self, f: &Aadd, n: i64) -> Result<Aadd> {
        if n == 0 {
            return Err(Error::RemainderByZero);
        }
        f.try_map(&mut |x| {
            let v = exact_value("remainder", x)?;
            Ok(AffineForm::constant((v.trunc() as i64).wrapping_rem(n) as f64))
        })
    }

    /// Boolean-gated selection: `g` where `c` holds, `0` elsewhere.
    pub fn b_times_a(&self, c: &Bdd, g: &Aadd) -> Aadd {
        debug!("b_times_a(c = {}, g = {})", c.index(), g.index());
        c.apply(g, |c, g| match c.as_leaf() {
            Some(false) => {
                debug!("b_times_a(0,G) => 0");
                Some(self.scalar(0.0))
            }
            Some(true) => {
                debug!("b_times_a(1,G) => G");
                Some(g.clone())
            }
            None => None,
        })
    }

    /// `t` where `c` holds, `e` elsewhere.
    pub fn ite(&self, c: &Bdd, t: &Aadd, e: &Aadd) -> Aadd {
        debug!("ite(c = {}, t = {}, e = {})", c.index(), t.index(), e.index());
        match c.as_leaf() {
            Some(true) => {
                debug!("ite(1,T,E) => T");
                return t.clone();
            }
            Some(false) => {
                debug!("ite(0,T,E) => E");
                return e.clone();
            }
            None => {}
        }
        if t == e {
            debug!("ite(C,T,T) => T");
            return t.clone();
        }
        let then_part = self.b_times_a(c, t);
        let else_part = self.b_times_a(&self.apply_not(c), e);
        self.add(&then_part, &else_part)
    }
}
