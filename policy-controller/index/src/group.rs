use crate::{error::Error, Index, Result};
use ahash::AHashSet as HashSet;
use fabric_policy_controller_api::{EndpointGroupSpec, GroupKey, PolicyKey};
use tracing::{debug, instrument};

/// An endpoint group: the attachment point for policies.
#[derive(Debug, Default)]
pub(crate) struct Group {
    /// Names of attached policies. These are weak references; a policy
    /// deleted out from under a group simply contributes no rules.
    pub(crate) policies: HashSet<String>,
}

// === impl Index ===

impl Index {
    /// Creates or updates an endpoint group. Re-applying an existing group
    /// replaces its policy attachment set.
    #[instrument(skip(self, spec), fields(
        tenant = %spec.tenant_name,
        network = %spec.network_name,
        group = %spec.group_name,
    ))]
    pub fn apply_group(&mut self, spec: EndpointGroupSpec) -> Result<()> {
        if spec.group_name.is_empty() {
            return Err(Error::Validation("endpoint group has no name".into()));
        }

        let tenant = self.tenant_mut(&spec.tenant_name)?;
        for policy in &spec.policies {
            if !tenant.policies.contains_key(policy) {
                let key = PolicyKey::new(&spec.tenant_name, policy);
                return Err(Error::not_found("policy", key));
            }
        }

        let network = tenant.networks.get_mut(&spec.network_name).ok_or_else(|| {
            let key = format!("{}:{}", spec.tenant_name, spec.network_name);
            Error::not_found("network", key)
        })?;

        let group = network.groups.entry(spec.group_name).or_default();
        group.policies = spec.policies.into_iter().collect();
        debug!("Applied group");
        Ok(())
    }

    #[instrument(skip(self, key), fields(group = %key))]
    pub fn delete_group(&mut self, key: &GroupKey) -> Result<()> {
        let tenant = self.tenant_mut(&key.tenant)?;
        let network = tenant
            .networks
            .get_mut(&key.network)
            .ok_or_else(|| Error::not_found("network", format!("{}:{}", key.tenant, key.network)))?;

        if network.groups.remove(&key.group).is_none() {
            return Err(Error::not_found("endpoint group", key));
        }
        debug!("Removed group");
        Ok(())
    }

    /// Attaches a policy to an existing group. Fails if the attachment is
    /// already present.
    #[instrument(skip(self, key, policy), fields(group = %key, policy = %policy))]
    pub fn attach_policy(&mut self, key: &GroupKey, policy: &str) -> Result<()> {
        let tenant = self.tenant_mut(&key.tenant)?;
        if !tenant.policies.contains_key(policy) {
            return Err(Error::not_found("policy", PolicyKey::new(&key.tenant, policy)));
        }

        let group = tenant
            .networks
            .get_mut(&key.network)
            .and_then(|n| n.groups.get_mut(&key.group))
            .ok_or_else(|| Error::not_found("endpoint group", key))?;

        if !group.policies.insert(policy.to_string()) {
            return Err(Error::conflict("attachment", format!("{key}:{policy}")));
        }
        debug!("Attached policy");
        Ok(())
    }

    /// Detaches a policy from a group. The policy itself is unaffected.
    #[instrument(skip(self, key, policy), fields(group = %key, policy = %policy))]
    pub fn detach_policy(&mut self, key: &GroupKey, policy: &str) -> Result<()> {
        let group = self
            .tenant_mut(&key.tenant)?
            .networks
            .get_mut(&key.network)
            .and_then(|n| n.groups.get_mut(&key.group))
            .ok_or_else(|| Error::not_found("endpoint group", key))?;

        if !group.policies.remove(policy) {
            return Err(Error::not_found("attachment", format!("{key}:{policy}")));
        }
        debug!("Detached policy");
        Ok(())
    }

    /// Snapshot of a network's endpoint groups, in name order with sorted
    /// attachment lists.
    pub fn groups(&self, tenant: &str, network: &str) -> Result<Vec<EndpointGroupSpec>> {
        let net = self
            .tenant(tenant)?
            .networks
            .get(network)
            .ok_or_else(|| Error::not_found("network", format!("{tenant}:{network}")))?;

        let mut groups = net
            .groups
            .iter()
            .map(|(name, g)| {
                let mut policies = g.policies.iter().cloned().collect::<Vec<_>>();
                policies.sort();
                EndpointGroupSpec {
                    tenant_name: tenant.to_string(),
                    network_name: network.to_string(),
                    group_name: name.clone(),
                    policies,
                }
            })
            .collect::<Vec<_>>();
        groups.sort_by(|a, b| a.group_name.cmp(&b.group_name));
        Ok(groups)
    }
}
