//! Fabric policy model
//!
//! Indexes the entities that configure connectivity on a multi-tenant network
//! fabric and classifies candidate flows against them:
//!
//! - A `Tenant` is the top-level isolation domain; it owns networks and
//!   policies.
//! - Each `Network` is an L2/L3 broadcast domain within a tenant and owns
//!   endpoint groups.
//! - Each `EndpointGroup` is the attachment point for policies. Attachments
//!   are weak references by name; a policy outlives any group referencing it.
//! - Each `Policy` owns ordered ACL `Rule`s scoped to the tenant.
//!
//! ```text
//! [ Tenant ] -> [ Network ] -> [ EndpointGroup ] --(attach)--> [ Policy ] -> [ Rule ]
//! ```
//!
//! Mutations validate their inputs and enforce referential integrity before
//! touching state, so the index is always structurally sound. Flow checks
//! (`Index::check_flow`) are read-only over a consistent snapshot: callers
//! share the index behind `Arc<RwLock<_>>`, mutate under the write lock, and
//! classify flows in parallel under read locks.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod check;
mod error;
mod global;
mod group;
mod index;
mod network;
mod policy;
mod tenant;


pub use self::{
    error::{Error, Result},
    global::FabricMode,
    index::{Index, SharedIndex},
    network::Encap,
};
