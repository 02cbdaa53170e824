//! # aadd-rs: Affine Arithmetic Decision Diagrams in Rust
//!
//! **`aadd-rs`** computes with uncertain real values and the decisions taken on
//! them. It is meant for symbolic simulation of numeric programs, such as
//! signal-processing and control models, where inputs are known only up to a
//! range.
//!
//! ## Affine arithmetic
//!
//! An [`AffineForm`][crate::affine::AffineForm] represents a value as
//! `x0 + x1*e1 + ... + xn*en + [omin, omax]`, where each noise symbol `ei`
//! ranges over `[-1, 1]`. Values derived from the same uncertain input share
//! its symbols, so `x - x` is exactly zero, unlike with plain intervals.
//! Nonlinear functions are linearized, and the linearization error gets a fresh
//! symbol of its own.
//!
//! ## Decision diagrams
//!
//! A comparison of uncertain values often has no single answer. Instead of
//! giving up, it returns a boolean decision diagram ([`Bdd`][crate::manager::Bdd])
//! branching on a new condition `form >= 0`. Value diagrams
//! ([`Aadd`][crate::manager::Aadd]) hold an affine form in every leaf and
//! carry on computing along each branch. The range of a leaf is tightened with
//! the conditions on its path by linear programming.
//!
//! ## Basic Usage
//!
//! ```rust
//! use aadd_rs::manager::Manager;
//!
//! // 1. Initialize the manager
//! let mgr = Manager::default();
//!
//! // 2. An input known to lie in [0, 10]
//! let level = mgr.uncertain(0.0, 10.0);
//!
//! // 3. Decide on it: the comparison cannot be resolved, so it branches
//! let high = mgr.ge(&level, &mgr.scalar(8.0));
//! assert_eq!(high.num_leaves(), 2);
//!
//! // 4. Choose a value per branch
//! let flow = mgr.ite(&high, &mgr.scalar(-1.0), &mgr.scalar(0.5));
//! let next = mgr.add(&level, &flow);
//!
//! // 5. Ranges are tightened with the path conditions
//! assert!(mgr.max(&next) <= 9.0 + 1e-9);
//! assert!(mgr.min(&next) >= 0.5 - 1e-9);
//! ```
//!
//! ## Core Components
//!
//! - **[`affine`]** and **[`approx`]**: affine forms and their arithmetic.
//! - **[`manager`]**: the [`Manager`][crate::manager::Manager] owning conditions,
//!   noise symbols and the LP solver. Operations are spread across [`bdd`],
//!   [`aadd`], [`compare`], [`bounds`] and [`join`].
//! - **[`scope`]**: turns assignments inside `if`/`else` and loops into diagram merges.
//! - **[`dot`]**, **[`debug`]**, **[`paths`]**: inspection and visualization.

pub mod aadd;
pub mod affine;
pub mod approx;
pub mod bdd;
pub mod bounds;
pub mod compare;
pub mod debug;
pub mod diagram;
pub mod dot;
mod elementary;
pub mod error;
pub mod join;
pub mod lp;
pub mod manager;
pub mod paths;
pub mod registry;
pub mod scope;
pub mod types;
