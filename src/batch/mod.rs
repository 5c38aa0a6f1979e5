//! Batch operation sets.
//!
//! A batch is one atomic request carrying creates, updates and deletes for
//! components and references. This module holds the wire model only;
//! submission lives in `remote::batch`.

pub mod model;
pub mod response;

pub use model::{
    BatchCreate, BatchDelete, BatchModel, BatchOptions, BatchRequest, BatchUpdate, ComponentBody,
    ReferenceModel, VersionMatch,
};
pub use response::{BatchItem, BatchResponse, BatchResult, BatchType};
