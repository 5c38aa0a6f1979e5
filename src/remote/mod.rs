//! Remote inventory store access.
//!
//! [`Transport`] is the only seam to the network. Everything above it
//! (repositories, resolvers, the reconciler) works against the trait, so
//! tests swap in a scripted transport.

pub mod batch;
pub mod cache;
pub mod components;
pub mod references;
pub mod report;
pub mod transport;

pub use batch::BatchRepository;
pub use cache::ComponentCache;
pub use components::ComponentRepository;
pub use references::ReferenceRepository;
pub use report::{ReportEntry, ReportRepository};
pub use transport::{HttpTransport, RemoteResponse, Transport};
