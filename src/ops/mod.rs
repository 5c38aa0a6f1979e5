//! High-level operations.
//!
//! Component and reference resolution, and the reconciler that ties them
//! into a batch.

pub mod reconcile;
pub mod references;
pub mod resolve;

pub use reconcile::Reconciler;
pub use references::{build_create_or_update_model, ReferenceResolver};
pub use resolve::{ComponentResolver, Resolution};
