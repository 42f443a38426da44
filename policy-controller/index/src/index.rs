//! Holds all model state. The resource-specific modules (`tenant`, `network`,
//! `group`, `policy`, `global`) implement the mutations; `check` implements
//! the read-only flow classification over this state.

use crate::{error::Error, global::FabricMode, network::Network, policy::Policy, Result};
use ahash::AHashMap as HashMap;
use parking_lot::RwLock;
use std::sync::Arc;

pub type SharedIndex = Arc<RwLock<Index>>;

/// Holds all model state. Mutations take `&mut self` and are serialized by
/// the shared lock; flow checks are pure reads.
#[derive(Debug, Default)]
pub struct Index {
    pub(crate) tenants: HashMap<String, Tenant>,

    pub(crate) fabric_mode: FabricMode,
}

/// The state of a single tenant.
#[derive(Debug, Default)]
pub(crate) struct Tenant {
    /// Name of the tenant's default network; empty when unset. Held as a weak
    /// reference, like policy attachments.
    pub(crate) default_network: String,

    /// Networks owned by the tenant, by name.
    pub(crate) networks: HashMap<String, Network>,

    /// Policies owned by the tenant, by name.
    pub(crate) policies: HashMap<String, Policy>,
}

// === impl Index ===

impl Index {
    pub fn shared() -> SharedIndex {
        Arc::new(RwLock::new(Self::default()))
    }

    pub(crate) fn tenant(&self, name: &str) -> Result<&Tenant> {
        self.tenants
            .get(name)
            .ok_or_else(|| Error::not_found("tenant", name))
    }

    pub(crate) fn tenant_mut(&mut self, name: &str) -> Result<&mut Tenant> {
        self.tenants
            .get_mut(name)
            .ok_or_else(|| Error::not_found("tenant", name))
    }
}
