use aadd_rs::affine::AffineForm;
use aadd_rs::approx::{AffineContext, Approximation};
use aadd_rs::error::Error;
use aadd_rs::manager::Manager;
use test_log::test;

#[test]
fn test_self_addition_shares_symbol() {
    let ctx = AffineContext::default();
    let a = ctx.interval(0.0, 2.0);
    let b = &a + &a;
    assert_eq!(b.min(), 0.0);
    assert_eq!(b.max(), 4.0);
    assert_eq!(b.num_terms(), 1);
    assert_eq!(b.terms()[0].1, 2.0);
}

#[test]
fn test_independent_addition() {
    let ctx = AffineContext::default();
    let a = ctx.interval(0.0, 2.0);
    let b = ctx.interval(0.0, 2.0);
    let c = &a + &b;
    assert_eq!(c.min(), 0.0);
    assert_eq!(c.max(), 4.0);
    assert_eq!(c.num_terms(), 2);
    // Unlike plain intervals, the difference of a value with itself is exact.
    assert_eq!(&a - &a, AffineForm::constant(0.0));
    assert_eq!((&a - &b).min(), -2.0);
}

#[test]
fn test_comparison_fully_below() {
    let mgr = Manager::default();
    let x = mgr.uncertain(1.0, 3.0);
    let c = mgr.gt(&x, &mgr.scalar(4.0));
    assert_eq!(c, mgr.zero());
    assert_eq!(c.num_leaves(), 1);
}

#[test]
fn test_comparison_straddling() {
    let mgr = Manager::default();
    let x = mgr.uncertain(0.0, 3.0);
    let c = mgr.gt(&x, &mgr.scalar(1.0));
    assert_eq!(c.num_leaves(), 2);
    assert_eq!(c.num_nodes(), 1);
}

#[test]
fn test_inverse_of_point() {
    let ctx = AffineContext::default();
    let x = ctx.interval(2.0, 2.0);
    let y = ctx.inv(&x).unwrap();
    assert_eq!(y.num_terms(), 0);
    assert_eq!(y.min(), 0.5);
    assert_eq!(y.max(), 0.5);
}

#[test]
fn test_sqrt_of_negative_range() {
    let ctx = AffineContext::default();
    let x = ctx.interval(-1.0, 4.0);
    match ctx.sqrt(&x) {
        Err(Error::NegativeRoot { lo, hi }) => {
            assert_eq!(lo, -1.0);
            assert_eq!(hi, 4.0);
        }
        other => panic!("expected a negative root error, got {:?}", other),
    }

    let mgr = Manager::default();
    let y = mgr.uncertain(-1.0, 4.0);
    assert!(matches!(mgr.sqrt(&y), Err(Error::NegativeRoot { .. })));
}

#[test]
fn test_interval_round_trip() {
    let ctx = AffineContext::default();
    for &(lo, hi) in &[(0.0, 2.0), (-3.0, 5.0), (1.5, 1.75), (-10.0, -2.0), (-7.183, -6.453), (0.1, 0.7)] {
        let x = ctx.interval(lo, hi);
        assert_eq!(x.min(), lo);
        assert_eq!(x.max(), hi);
    }
}

#[test]
fn test_ite_on_constant_condition() {
    let mgr = Manager::default();
    let t = mgr.uncertain(0.0, 1.0);
    let e = mgr.uncertain(5.0, 6.0);
    assert_eq!(mgr.ite(&mgr.one(), &t, &e), t);
    assert_eq!(mgr.ite(&mgr.zero(), &t, &e), e);
}

#[test]
fn test_division_by_range_with_zero() {
    for mode in [Approximation::Chebyshev, Approximation::MinRange, Approximation::IntervalExact] {
        let mgr = Manager::new(mode);
        let x = mgr.uncertain(1.0, 2.0);
        let y = mgr.uncertain(-1.0, 1.0);
        assert!(matches!(mgr.div(&x, &y), Err(Error::DivisionByZero { .. })));
    }
}

#[test]
fn test_remainder_of_uncertain_value() {
    let mgr = Manager::default();
    let x = mgr.uncertain(0.0, 1.0);
    assert!(matches!(
        mgr.remainder(&x, 3),
        Err(Error::UncertainOperand {
            operation: "remainder",
            ..
        })
    ));
    let seven = mgr.scalar(7.0);
    assert_eq!(mgr.remainder(&seven, 3).unwrap(), mgr.scalar(1.0));
}
