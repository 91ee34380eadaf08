//! Domain logic: turn a list of elements plus an ordering policy into a
//! deterministic desired order, violations, and spacing requirements.
//!
//! This crate owns *what* is out of order and why. It does not own *how*
//! text edits are synthesized or applied; that's the `ordfix-edit` crate.
//!
//! The engine is pure and synchronous. One call processes one sortable
//! region to completion; every map and set it builds is scoped to that
//! call, so independent regions can be processed in any order.

mod comparator;
mod compile;
mod dependency;
mod error;
mod groups;
mod newlines;
mod partition;
mod reconcile;

pub use compile::CompiledPolicy;
pub use error::PolicyError;
pub use reconcile::Reconciler;
