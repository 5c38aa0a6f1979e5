//! Core data structures for depsync.
//!
//! Value types shared by every layer:
//! - Dependencies and their identity rules
//! - Workspaces and the enum-indexed workspace table
//! - References, relationships and outcome counts
//! - The inbound synchronization request

pub mod dependency;
pub mod reference;
pub mod relationship;
pub mod request;
pub mod status;
pub mod workspace;

pub use dependency::Dependency;
pub use reference::{ExistingReference, ReferenceBody, ReferenceFields};
pub use relationship::Relationship;
pub use request::SyncRequest;
pub use status::{ComponentStatus, StatusCounts};
pub use workspace::{Workspace, WorkspaceSettings, WorkspaceTable};
