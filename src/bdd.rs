//! Boolean decision diagrams.
//!
//! Predicate diagrams ([`Bdd`]) have the two canonical boolean leaves and are
//! produced by comparisons of value diagrams. The logic operators below are
//! built on [`Diagram::apply`] with the usual absorbing shortcuts, so that for
//! instance `false AND g` is resolved without descending into `g`.
//!
//! # Examples
//!
//! ```
//! use aadd_rs::manager::Manager;
//!
//! let mgr = Manager::default();
//! let x = mgr.uncertain(-1.0, 1.0);
//! let p = mgr.gt(&x, &mgr.scalar(0.0));
//! let q = mgr.apply_not(&p);
//! assert_eq!(mgr.apply_and(&p, &q), mgr.zero());
//! assert_eq!(mgr.apply_or(&p, &q), mgr.one());
//! ```

use log::debug;

use crate::diagram::Diagram;
use crate::manager::{Bdd, Manager};

impl Manager {
    pub fn apply_not(&self, f: &Bdd) -> Bdd {
        debug!("apply_not(f = {})", f.index());
        f.map(|&v| !v)
    }

    pub fn apply_and(&self, f: &Bdd, g: &Bdd) -> Bdd {
        debug!("apply_and(f = {}, g = {})", f.index(), g.index());
        f.apply(g, |f, g| match (f.as_leaf(), g.as_leaf()) {
            (Some(false), _) | (_, Some(false)) => Some(self.zero()),
            (Some(true), _) => Some(g.clone()),
            (_, Some(true)) => Some(f.clone()),
            _ if f == g => Some(f.clone()),
            _ => None,
        })
    }

    pub fn apply_or(&self, f: &Bdd, g: &Bdd) -> Bdd {
        debug!("apply_or(f = {}, g = {})", f.index(), g.index());
        f.apply(g, |f, g| match (f.as_leaf(), g.as_leaf()) {
            (Some(true), _) | (_, Some(true)) => Some(self.one()),
            (Some(false), _) => Some(g.clone()),
            (_, Some(false)) => Some(f.clone()),
            _ if f == g => Some(f.clone()),
            _ => None,
        })
    }

    pub fn apply_xor(&self, f: &Bdd, g: &Bdd) -> Bdd {
        debug!("apply_xor(f = {}, g = {})", f.index(), g.index());
        f.apply(g, |f, g| match (f.as_leaf(), g.as_leaf()) {
            (Some(&a), Some(&b)) => Some(Diagram::leaf(a ^ b)),
            (Some(false), _) => Some(g.clone()),
            (_, Some(false)) => Some(f.clone()),
            (Some(true), _) => Some(self.apply_not(g)),
            (_, Some(true)) => Some(self.apply_not(f)),
            _ if f == g => Some(self.zero()),
            _ => None,
        })
    }

    pub fn apply_nand(&self, f: &Bdd, g: &Bdd) -> Bdd {
        self.apply_not(&self.apply_and(f, g))
    }

    pub fn apply_nor(&self, f: &Bdd, g: &Bdd) -> Bdd {
        self.apply_not(&self.apply_or(f, g))
    }

    pub fn apply_xnor(&self, f: &Bdd, g: &Bdd) -> Bdd {
        self.apply_not(&self.apply_xor(f, g))
    }

    /// `f -> g`
    pub fn apply_imply(&self, f: &Bdd, g: &Bdd) -> Bdd {
        self.apply_or(&self.apply_not(f), g)
    }

    /// `(f AND g) OR (NOT f AND h)`
    pub fn apply_ite(&self, f: &Bdd, g: &Bdd, h: &Bdd) -> Bdd {
        debug!("apply_ite(f = {}, g = {}, h = {})", f.index(), g.index(), h.index());

        match f.as_leaf() {
            Some(true) => {
                debug!("ite(1,G,H) => G");
                return g.clone();
            }
            Some(false) => {
                debug!("ite(0,G,H) => H");
                return h.clone();
            }
            None => {}
        }
        if g == h {
            debug!("ite(F,G,G) => G");
            return g.clone();
        }

        let then_part = self.apply_and(f, g);
        let else_part = self.apply_and(&self.apply_not(f), h);
        self.apply_or(&then_part, &else_part)
    }

    /// Returns `true` if `f` is the constant `true`.
    pub fn is_one(&self, f: &Bdd) -> bool {
        f.as_leaf() == Some(&true)
    }

    /// Returns `true` if `f` is the constant `false`.
    pub fn is_zero(&self, f: &Bdd) -> bool {
        f.as_leaf() == Some(&false)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::types::Symbol;

    /// Two independent decisions `e_a >= 0` and `e_b >= 0`, and all four
    /// sign assignments of their symbols.
    fn setup(mgr: &Manager) -> (Bdd, Bdd, Vec<[f64; 2]>) {
        let a = mgr.context().interval(-1.0, 1.0);
        let b = mgr.context().interval(-1.0, 1.0);
        let x = mgr.decision(mgr.add_condition(a));
        let y = mgr.decision(mgr.add_condition(b));
        let points = vec![[1.0, 1.0], [1.0, -1.0], [-1.0, 1.0], [-1.0, -1.0]];
        (x, y, points)
    }

    fn at(point: [f64; 2]) -> impl Fn(Symbol) -> f64 {
        move |s| point[s.id() as usize]
    }

    #[test]
    fn test_truth_tables() {
        let mgr = Manager::default();
        let (x, y, points) = setup(&mgr);

        type Op = fn(&Manager, &Bdd, &Bdd) -> Bdd;
        let ops: [(Op, fn(bool, bool) -> bool); 7] = [
            (Manager::apply_and, |a, b| a && b),
            (Manager::apply_or, |a, b| a || b),
            (Manager::apply_xor, |a, b| a ^ b),
            (Manager::apply_nand, |a, b| !(a && b)),
            (Manager::apply_nor, |a, b| !(a || b)),
            (Manager::apply_xnor, |a, b| a == b),
            (Manager::apply_imply, |a, b| !a || b),
        ];
        for (op, expected) in ops {
            let f = op(&mgr, &x, &y);
            for &p in &points {
                let (a, b) = (p[0] >= 0.0, p[1] >= 0.0);
                assert_eq!(*mgr.evaluate(&f, at(p)), expected(a, b));
            }
        }
    }

    #[test]
    fn test_not() {
        let mgr = Manager::default();
        let (x, _, _) = setup(&mgr);
        let nx = mgr.apply_not(&x);
        assert_eq!(mgr.apply_not(&nx), x);
        assert_eq!(mgr.apply_not(&mgr.one()), mgr.zero());
    }

    #[test]
    fn test_absorbing_elements() {
        let mgr = Manager::default();
        let (x, y, _) = setup(&mgr);
        let f = mgr.apply_or(&x, &y);
        assert_eq!(mgr.apply_and(&mgr.zero(), &f), mgr.zero());
        assert_eq!(mgr.apply_and(&mgr.one(), &f), f);
        assert_eq!(mgr.apply_or(&mgr.one(), &f), mgr.one());
        assert_eq!(mgr.apply_xor(&f, &f), mgr.zero());
        assert!(mgr.is_one(&mgr.apply_imply(&mgr.zero(), &f)));
        assert!(mgr.is_zero(&mgr.apply_and(&x, &mgr.apply_not(&x))));
    }

    #[test]
    fn test_ite_constant_condition() {
        let mgr = Manager::default();
        let (x, y, _) = setup(&mgr);
        assert_eq!(mgr.apply_ite(&mgr.one(), &x, &y), x);
        assert_eq!(mgr.apply_ite(&mgr.zero(), &x, &y), y);
    }

    #[test]
    fn test_ite_matches_definition() {
        let mgr = Manager::default();
        let (x, y, points) = setup(&mgr);
        let ny = mgr.apply_not(&y);
        let f = mgr.apply_ite(&x, &y, &ny);
        assert_eq!(f, mgr.apply_xnor(&x, &y));
        for &p in &points {
            let expected = if p[0] >= 0.0 { p[1] >= 0.0 } else { p[1] < 0.0 };
            assert_eq!(*mgr.evaluate(&f, at(p)), expected);
        }
    }

    #[test]
    fn test_reduction() {
        let mgr = Manager::default();
        let (x, y, _) = setup(&mgr);
        let f = mgr.apply_or(&mgr.apply_and(&x, &y), &mgr.apply_and(&x, &mgr.apply_not(&y)));
        assert_eq!(f, x);
        assert_eq!(f.num_nodes(), 1);
    }
}
