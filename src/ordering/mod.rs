//! Contiguous 1-based ordering for sibling items under a parent.
//!
//! Lessons under a class, questions under a quiz, and options under a
//! question all keep a dense `position` in `{1..N}`. This module owns the
//! whole protocol: pure order resolution ([`assign`]), pure shift planning
//! ([`plan`]), the storage seams ([`store`]), and the generic
//! load-plan-commit flows ([`resequence`]). Storage adapters live with the
//! entity repositories.

pub(crate) mod assign;
pub(crate) mod plan;
pub(crate) mod resequence;
pub(crate) mod store;

#[cfg(test)]
pub(crate) mod memory;

pub(crate) use resequence::{delete_item, insert_item, move_item, ResequenceError};
