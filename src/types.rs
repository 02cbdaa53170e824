//! Type-safe wrappers for noise symbols and condition indices.
//!
//! Noise symbols and branch conditions are both identified by plain integers.
//! The newtypes below keep the two id spaces apart at compile time.
use std::fmt;

/// A noise symbol identifier.
///
/// A noise symbol is a formal variable ranging over `[-1, 1]`. Symbols are
/// minted by an [`AffineContext`][crate::approx::AffineContext] and are never
/// reused, so two forms that mention the same symbol are correlated.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Symbol(u64);

impl Symbol {
    /// Creates a symbol with the given id.
    pub const fn new(id: u64) -> Self {
        Symbol(id)
    }

    /// Returns the raw symbol id.
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<Symbol> for u64 {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// Index of a branch condition.
///
/// The index doubles as the key into the
/// [`ConditionRegistry`][crate::registry::ConditionRegistry] and as the
/// variable order used by Apply: smaller indices sit closer to the root.
///
/// # Invariants
///
/// - Indices of internal nodes are strictly smaller than [`CondId::TERMINAL`]
/// - Along every root-to-leaf path, indices are strictly increasing
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CondId(u64);

impl CondId {
    /// Sentinel index carried by leaves. Larger than every condition index.
    pub const TERMINAL: CondId = CondId(u64::MAX);

    /// Creates a condition index.
    ///
    /// # Panics
    ///
    /// Panics if `index` equals the terminal sentinel.
    pub fn new(index: u64) -> Self {
        assert_ne!(index, u64::MAX, "Condition index is reserved for leaves");
        CondId(index)
    }

    /// Returns the raw index.
    pub const fn index(self) -> u64 {
        self.0
    }

    pub const fn is_terminal(self) -> bool {
        self.0 == u64::MAX
    }
}

impl fmt::Display for CondId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_terminal() {
            write!(f, "leaf")
        } else {
            write!(f, "c{}", self.0)
        }
    }
}

impl From<CondId> for u64 {
    fn from(id: CondId) -> Self {
        id.0
    }
}
