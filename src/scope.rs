//! Control-flow scopes.
//!
//! A [`ScopeManager`] turns ordinary assignments inside symbolically executed
//! `if`/`else` and `while` blocks into diagram merges. It keeps a stack of the
//! open blocks and their conditions; [`ScopeManager::assign`] replaces the
//! target by `ITE(block condition, new value, old value)`, so sequential
//! assignments in both parts of a branch compose into one diagram.
//!
//! # Examples
//!
//! ```
//! use aadd_rs::manager::Manager;
//! use aadd_rs::scope::ScopeManager;
//!
//! let mgr = Manager::default();
//! let x = mgr.uncertain(0.0, 4.0);
//! let mut y = mgr.scalar(0.0);
//!
//! let mut scopes = ScopeManager::new(&mgr);
//! scopes.begin_branch(mgr.gt(&x, &mgr.scalar(2.0)));
//! scopes.assign(&mut y, mgr.scalar(1.0));
//! scopes.begin_else()?;
//! scopes.assign(&mut y, mgr.scalar(-1.0));
//! scopes.end_branch()?;
//!
//! assert_eq!(y.num_leaves(), 2);
//! assert_eq!(mgr.min(&y), -1.0);
//! assert_eq!(mgr.max(&y), 1.0);
//! # Ok::<(), aadd_rs::error::ScopeError>(())
//! ```

use log::debug;

use crate::affine::AffineForm;
use crate::diagram::{Diagram, Terminal};
use crate::error::ScopeError;
use crate::manager::{Bdd, Manager};

/// Leaf kinds that can be merged under a boolean condition.
pub trait Assignable: Terminal {
    /// `ITE(condition, then_value, else_value)`
    fn select(
        mgr: &Manager,
        condition: &Bdd,
        then_value: &Diagram<Self>,
        else_value: &Diagram<Self>,
    ) -> Diagram<Self>;
}

impl Assignable for bool {
    fn select(mgr: &Manager, condition: &Bdd, then_value: &Bdd, else_value: &Bdd) -> Bdd {
        mgr.apply_ite(condition, then_value, else_value)
    }
}

impl Assignable for AffineForm {
    fn select(
        mgr: &Manager,
        condition: &Bdd,
        then_value: &Diagram<AffineForm>,
        else_value: &Diagram<AffineForm>,
    ) -> Diagram<AffineForm> {
        mgr.ite(condition, then_value, else_value)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BlockKind {
    Branch,
    Loop,
}

impl BlockKind {
    fn name(self) -> &'static str {
        match self {
            BlockKind::Branch => "branch",
            BlockKind::Loop => "loop",
        }
    }
}

#[derive(Debug, Clone)]
struct Block {
    kind: BlockKind,
    condition: Bdd,
    in_else: bool,
}

/// Stack of open branches and loops.
#[derive(Debug)]
pub struct ScopeManager<'a> {
    mgr: &'a Manager,
    blocks: Vec<Block>,
}

impl<'a> ScopeManager<'a> {
    pub fn new(mgr: &'a Manager) -> Self {
        ScopeManager {
            mgr,
            blocks: Vec::new(),
        }
    }

    pub fn manager(&self) -> &'a Manager {
        self.mgr
    }

    /// Number of open blocks.
    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if an assignment would be merged rather than replace.
    pub fn is_active(&self) -> bool {
        !self.blocks.is_empty()
    }

    /// Opens the then-part of a branch on `condition`.
    pub fn begin_branch(&mut self, condition: Bdd) {
        debug!("begin_branch(depth = {}, cond = {})", self.depth(), condition.index());
        self.blocks.push(Block {
            kind: BlockKind::Branch,
            condition,
            in_else: false,
        });
    }

    /// Switches the innermost branch to its else-part.
    pub fn begin_else(&mut self) -> Result<(), ScopeError> {
        let block = match self.blocks.last_mut() {
            Some(block) if block.kind == BlockKind::Branch => block,
            _ => return Err(ScopeError::ElseWithoutBranch),
        };
        if block.in_else {
            return Err(ScopeError::DuplicateElse);
        }
        debug!("begin_else(cond = {})", block.condition.index());
        block.in_else = true;
        Ok(())
    }

    /// Closes the innermost branch.
    pub fn end_branch(&mut self) -> Result<(), ScopeError> {
        self.close(BlockKind::Branch)
    }

    /// Enters one iteration of a loop guarded by `condition`.
    ///
    /// Called once per iteration: if the innermost block is already a loop,
    /// its condition is replaced, otherwise a new loop block is opened. The
    /// caller stops iterating once `condition` is the constant `false`.
    pub fn begin_loop(&mut self, condition: Bdd) {
        debug!("begin_loop(depth = {}, cond = {})", self.depth(), condition.index());
        match self.blocks.last_mut() {
            Some(block) if block.kind == BlockKind::Loop => block.condition = condition,
            _ => self.blocks.push(Block {
                kind: BlockKind::Loop,
                condition,
                in_else: false,
            }),
        }
    }

    /// Closes the innermost loop.
    pub fn end_loop(&mut self) -> Result<(), ScopeError> {
        self.close(BlockKind::Loop)
    }

    fn close(&mut self, kind: BlockKind) -> Result<(), ScopeError> {
        match self.blocks.last() {
            Some(block) if block.kind == kind => {
                debug!("end {} (depth = {})", kind.name(), self.depth());
                self.blocks.pop();
                Ok(())
            }
            _ => Err(ScopeError::Unbalanced(kind.name())),
        }
    }

    /// Conjunction of the conditions of all open blocks, each negated when in
    /// its else-part. Outside of any block this is `true`.
    pub fn current_block_condition(&self) -> Bdd {
        self.blocks.iter().fold(self.mgr.one(), |acc, block| {
            if block.in_else {
                let negated = self.mgr.apply_not(&block.condition);
                self.mgr.apply_and(&acc, &negated)
            } else {
                self.mgr.apply_and(&acc, &block.condition)
            }
        })
    }

    /// Assigns `value` to `var` under the current block condition.
    pub fn assign<V: Assignable>(&self, var: &mut Diagram<V>, value: Diagram<V>) {
        if !self.is_active() {
            *var = value;
            return;
        }
        let condition = self.current_block_condition();
        debug!("assign(cond = {}, depth = {})", condition.index(), self.depth());
        *var = V::select(self.mgr, &condition, &value, var);
    }
}
