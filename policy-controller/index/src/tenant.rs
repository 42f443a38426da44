use crate::{error::Error, index::Tenant, Index, Result};
use fabric_policy_controller_api::TenantSpec;
use tracing::{debug, instrument};

// === impl Index ===

impl Index {
    #[instrument(skip(self, spec), fields(tenant = %spec.tenant_name))]
    pub fn apply_tenant(&mut self, spec: TenantSpec) -> Result<()> {
        if spec.tenant_name.is_empty() {
            return Err(Error::Validation("tenant has no name".into()));
        }
        if self.tenants.contains_key(&spec.tenant_name) {
            return Err(Error::conflict("tenant", &spec.tenant_name));
        }

        self.tenants.insert(
            spec.tenant_name,
            Tenant {
                default_network: spec.default_network,
                ..Tenant::default()
            },
        );
        debug!("Created tenant");
        Ok(())
    }

    /// Deletes a tenant. Fails while the tenant still owns networks or
    /// policies unless `cascade` is set, in which case the whole subtree is
    /// removed.
    #[instrument(skip(self))]
    pub fn delete_tenant(&mut self, name: &str, cascade: bool) -> Result<()> {
        let tenant = self.tenant(name)?;

        if !cascade {
            let mut dependents = tenant
                .networks
                .keys()
                .map(|n| format!("network {n}"))
                .chain(tenant.policies.keys().map(|p| format!("policy {p}")))
                .collect::<Vec<_>>();
            if !dependents.is_empty() {
                dependents.sort();
                return Err(Error::Dependency {
                    kind: "tenant",
                    key: name.to_string(),
                    dependents,
                });
            }
        }

        self.tenants.remove(name);
        debug!("Removed tenant");
        Ok(())
    }

    /// Snapshot of all tenants, in name order.
    pub fn tenants(&self) -> Vec<TenantSpec> {
        let mut tenants = self
            .tenants
            .iter()
            .map(|(name, t)| TenantSpec {
                tenant_name: name.clone(),
                default_network: t.default_network.clone(),
            })
            .collect::<Vec<_>>();
        tenants.sort_by(|a, b| a.tenant_name.cmp(&b.tenant_name));
        tenants
    }
}
