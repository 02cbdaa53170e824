//! Condition registry.
//!
//! Every branch node of a decision diagram refers to a condition `c >= 0` by its
//! [`CondId`]. The registry maps these indices to their affine forms. Indices are
//! handed out in increasing order, which makes them the global variable order
//! used by Apply.

use log::debug;

use crate::affine::AffineForm;
use crate::types::CondId;

/// Append-only table of branch conditions.
#[derive(Debug, Default, Clone)]
pub struct ConditionRegistry {
    conditions: Vec<AffineForm>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `form` as the condition `form >= 0` and returns its index.
    pub fn add(&mut self, form: AffineForm) -> CondId {
        let id = CondId::new(self.conditions.len() as u64);
        debug!("registered condition {}: {} >= 0", id, form);
        self.conditions.push(form);
        id
    }

    /// Returns the condition registered under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this registry.
    pub fn get(&self, id: CondId) -> &AffineForm {
        match self.conditions.get(id.index() as usize) {
            Some(form) => form,
            None => panic!(
                "Condition {} is not registered ({} conditions known)",
                id,
                self.conditions.len()
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CondId, &AffineForm)> {
        self.conditions
            .iter()
            .enumerate()
            .map(|(i, form)| (CondId::new(i as u64), form))
    }
}
