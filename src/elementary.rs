//! Elementary functions used by the nonlinear affine operations.
//!
//! Each function provides its value, its derivative, the slope preferred by the
//! min-range approximation, and the points where its derivative takes a given
//! value. The last one is what makes the enclosures tight: the residual
//! `f(t) - alpha*t` can only reach its extremes at the interval ends or at
//! those points.

pub(crate) trait Elementary {
    fn value(&self, x: f64) -> f64;

    fn derivative(&self, x: f64) -> f64;

    /// Slope minimizing the range of the enclosure over `[a, b]`.
    fn min_range_slope(&self, a: f64, b: f64) -> f64;

    /// All `t` with `derivative(t) == alpha`.
    fn tangent_points(&self, alpha: f64) -> Vec<f64>;
}

/// Endpoint of `[a, b]` farther from zero.
fn farthest(a: f64, b: f64) -> f64 {
    if a.abs() > b.abs() {
        a
    } else {
        b
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

pub(crate) struct Sqrt;

impl Elementary for Sqrt {
    fn value(&self, x: f64) -> f64 {
        x.sqrt()
    }

    fn derivative(&self, x: f64) -> f64 {
        0.5 / x.sqrt()
    }

    fn min_range_slope(&self, _a: f64, b: f64) -> f64 {
        self.derivative(b)
    }

    fn tangent_points(&self, alpha: f64) -> Vec<f64> {
        if alpha > 0.0 {
            vec![0.25 / (alpha * alpha)]
        } else {
            vec![]
        }
    }
}

/// `1/sqrt(x)`
pub(crate) struct InvSqrt;

impl Elementary for InvSqrt {
    fn value(&self, x: f64) -> f64 {
        1.0 / x.sqrt()
    }

    fn derivative(&self, x: f64) -> f64 {
        -0.5 / (x * x.sqrt())
    }

    fn min_range_slope(&self, _a: f64, b: f64) -> f64 {
        self.derivative(b)
    }

    fn tangent_points(&self, alpha: f64) -> Vec<f64> {
        if alpha < 0.0 {
            vec![(-0.5 / alpha).powf(2.0 / 3.0)]
        } else {
            vec![]
        }
    }
}

pub(crate) struct Exp;

impl Elementary for Exp {
    fn value(&self, x: f64) -> f64 {
        x.exp()
    }

    fn derivative(&self, x: f64) -> f64 {
        x.exp()
    }

    fn min_range_slope(&self, a: f64, _b: f64) -> f64 {
        a.exp()
    }

    fn tangent_points(&self, alpha: f64) -> Vec<f64> {
        if alpha > 0.0 {
            vec![alpha.ln()]
        } else {
            vec![]
        }
    }
}

pub(crate) struct Log;

impl Elementary for Log {
    fn value(&self, x: f64) -> f64 {
        x.ln()
    }

    fn derivative(&self, x: f64) -> f64 {
        1.0 / x
    }

    fn min_range_slope(&self, _a: f64, b: f64) -> f64 {
        1.0 / b
    }

    fn tangent_points(&self, alpha: f64) -> Vec<f64> {
        if alpha > 0.0 {
            vec![1.0 / alpha]
        } else {
            vec![]
        }
    }
}

/// `ln(1 + exp(x))`, evaluated without overflow.
pub(crate) struct LogExp;

impl Elementary for LogExp {
    fn value(&self, x: f64) -> f64 {
        if x > 0.0 {
            x + (-x).exp().ln_1p()
        } else {
            x.exp().ln_1p()
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        sigmoid(x)
    }

    fn min_range_slope(&self, a: f64, _b: f64) -> f64 {
        sigmoid(a)
    }

    fn tangent_points(&self, alpha: f64) -> Vec<f64> {
        if alpha > 0.0 && alpha < 1.0 {
            vec![(alpha / (1.0 - alpha)).ln()]
        } else {
            vec![]
        }
    }
}

pub(crate) struct Atan;

impl Elementary for Atan {
    fn value(&self, x: f64) -> f64 {
        x.atan()
    }

    fn derivative(&self, x: f64) -> f64 {
        1.0 / (1.0 + x * x)
    }

    fn min_range_slope(&self, a: f64, b: f64) -> f64 {
        self.derivative(farthest(a, b))
    }

    fn tangent_points(&self, alpha: f64) -> Vec<f64> {
        if alpha > 0.0 && alpha <= 1.0 {
            let t = (1.0 / alpha - 1.0).sqrt();
            vec![t, -t]
        } else {
            vec![]
        }
    }
}

pub(crate) struct Tanh;

impl Elementary for Tanh {
    fn value(&self, x: f64) -> f64 {
        x.tanh()
    }

    fn derivative(&self, x: f64) -> f64 {
        let t = x.tanh();
        1.0 - t * t
    }

    fn min_range_slope(&self, a: f64, b: f64) -> f64 {
        self.derivative(farthest(a, b))
    }

    fn tangent_points(&self, alpha: f64) -> Vec<f64> {
        if alpha > 0.0 && alpha <= 1.0 {
            let t = (1.0 - alpha).sqrt().atanh();
            vec![t, -t]
        } else {
            vec![]
        }
    }
}

/// `1/x` on an interval that excludes zero.
pub(crate) struct Reciprocal;

impl Elementary for Reciprocal {
    fn value(&self, x: f64) -> f64 {
        1.0 / x
    }

    fn derivative(&self, x: f64) -> f64 {
        -1.0 / (x * x)
    }

    fn min_range_slope(&self, a: f64, b: f64) -> f64 {
        self.derivative(farthest(a, b))
    }

    fn tangent_points(&self, alpha: f64) -> Vec<f64> {
        if alpha < 0.0 {
            let t = (-1.0 / alpha).sqrt();
            vec![t, -t]
        } else {
            vec![]
        }
    }
}

/// `x^n` for an integer exponent other than 0 and 1.
pub(crate) struct Power(pub i32);

impl Elementary for Power {
    fn value(&self, x: f64) -> f64 {
        x.powi(self.0)
    }

    fn derivative(&self, x: f64) -> f64 {
        match self.0.checked_sub(1) {
            Some(m) => f64::from(self.0) * x.powi(m),
            None => f64::from(self.0) * x.powi(self.0) / x,
        }
    }

    fn min_range_slope(&self, a: f64, b: f64) -> f64 {
        let n = self.0;
        if a < 0.0 && b > 0.0 {
            0.0
        } else if (n > 0 && a >= 0.0) || (n < 0 && b < 0.0) {
            self.derivative(a)
        } else {
            self.derivative(b)
        }
    }

    fn tangent_points(&self, alpha: f64) -> Vec<f64> {
        // Solve t^m = q with m = n - 1, kept in i64 so that i32::MIN does not overflow.
        let m = i64::from(self.0) - 1;
        let q = alpha / f64::from(self.0);
        if q == 0.0 {
            return if m > 0 { vec![0.0] } else { vec![] };
        }
        let root = q.abs().powf(1.0 / m as f64);
        if m % 2 == 0 {
            if q > 0.0 {
                vec![root, -root]
            } else {
                vec![]
            }
        } else {
            vec![root.copysign(q)]
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn assert_tangent<F: Elementary>(f: &F, alpha: f64) {
        let points = f.tangent_points(alpha);
        assert!(!points.is_empty());
        for t in points {
            assert!(
                (f.derivative(t) - alpha).abs() < 1e-9,
                "derivative at {} is {}, expected {}",
                t,
                f.derivative(t),
                alpha
            );
        }
    }

    #[test]
    fn test_tangent_points() {
        assert_tangent(&Sqrt, 0.3);
        assert_tangent(&InvSqrt, -0.2);
        assert_tangent(&Exp, 2.5);
        assert_tangent(&Log, 0.5);
        assert_tangent(&LogExp, 0.25);
        assert_tangent(&Atan, 0.4);
        assert_tangent(&Tanh, 0.6);
        assert_tangent(&Reciprocal, -4.0);
        assert_tangent(&Power(2), -3.0);
        assert_tangent(&Power(3), 12.0);
        assert_tangent(&Power(4), -0.5);
        assert_tangent(&Power(-2), 0.25);
        assert_tangent(&Power(-3), -3.0);
    }

    #[test]
    fn test_no_tangent_points() {
        assert!(Sqrt.tangent_points(-1.0).is_empty());
        assert!(Exp.tangent_points(0.0).is_empty());
        assert!(LogExp.tangent_points(1.5).is_empty());
        assert!(Power(3).tangent_points(-1.0).is_empty());
        assert!(Power(-2).tangent_points(0.0).is_empty());
    }

    #[test]
    fn test_logexp_is_stable() {
        assert!((LogExp.value(1000.0) - 1000.0).abs() < 1e-9);
        assert!(LogExp.value(-1000.0) >= 0.0);
        assert!((LogExp.value(0.0) - std::f64::consts::LN_2).abs() < 1e-15);
    }

    #[test]
    fn test_power_of_smallest_exponent() {
        let p = Power(i32::MIN);
        assert_eq!(p.derivative(1.0), f64::from(i32::MIN));
        let points = p.tangent_points(-1.0);
        assert_eq!(points.len(), 1);
        assert!(points[0] > 1.0 && points[0] < 1.001);
    }

    #[test]
    fn test_power_min_range_table() {
        // Straddling zero: flat slope.
        assert_eq!(Power(2).min_range_slope(-1.0, 2.0), 0.0);
        // Positive interval, positive exponent: left end.
        assert_eq!(Power(2).min_range_slope(1.0, 3.0), 2.0);
        // Negative interval, positive exponent: right end.
        assert_eq!(Power(2).min_range_slope(-3.0, -1.0), -2.0);
        // Negative exponent on a positive interval: right end.
        assert_eq!(Power(-1).min_range_slope(1.0, 2.0), -0.25);
    }
}
