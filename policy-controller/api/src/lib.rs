//! Wire-facing types for the fabric policy API.
//!
//! These mirror the JSON bodies and composite resource keys of the REST
//! surface (`/api/tenants/`, `/api/networks/`, `/api/endpointGroups/`,
//! `/api/policys/`, `/api/rules/`, `/api/globals/`). The transport itself
//! lives elsewhere; this crate only defines the contract the model consumes.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod keys;
mod lease;
mod spec;

pub use self::{
    keys::{GroupKey, KeyError, NetworkKey, PolicyKey, RuleKey},
    lease::{leader_key, LeaderRecord, LEADER_KEY_BASE, ROLE_LEADER},
    spec::{
        EndpointGroupSpec, GlobalSpec, NetworkSpec, PolicySpec, RuleSpec, TenantSpec,
        INFRA_TYPE_ACI, INFRA_TYPE_DEFAULT,
    },
};
