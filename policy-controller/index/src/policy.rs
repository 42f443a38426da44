use crate::{error::Error, index::Tenant, Index, Result};
use ahash::AHashMap as HashMap;
use fabric_policy_controller_api::{PolicyKey, PolicySpec, RuleKey, RuleSpec};
use fabric_policy_controller_core::{
    Direction, GroupRef, NetworkMatch, PeerMatch, Protocol, Rule, RuleAction,
};
use tracing::{debug, instrument};

/// A named, ordered collection of rules scoped to a tenant.
#[derive(Debug, Default)]
pub(crate) struct Policy {
    /// Rules by rule id.
    pub(crate) rules: HashMap<String, PolicyRule>,
}

/// A stored rule: the wire spec it was created from, plus the evaluator
/// instances it normalized into (two for `direction=both`).
#[derive(Debug)]
pub(crate) struct PolicyRule {
    pub(crate) spec: RuleSpec,
    pub(crate) instances: Vec<Rule>,
}

// === impl Index ===

impl Index {
    #[instrument(skip(self, spec), fields(tenant = %spec.tenant_name, policy = %spec.policy_name))]
    pub fn apply_policy(&mut self, spec: PolicySpec) -> Result<()> {
        if spec.policy_name.is_empty() {
            return Err(Error::Validation("policy has no name".into()));
        }

        let tenant = self.tenant_mut(&spec.tenant_name)?;
        if tenant.policies.contains_key(&spec.policy_name) {
            let key = PolicyKey::new(&spec.tenant_name, &spec.policy_name);
            return Err(Error::conflict("policy", key));
        }

        tenant.policies.insert(spec.policy_name, Policy::default());
        debug!("Created policy");
        Ok(())
    }

    /// Deletes a policy and its rules. Fails while any endpoint group still
    /// references the policy unless `cascade` is set, in which case the
    /// attachments are removed first.
    #[instrument(skip(self, key), fields(policy = %key))]
    pub fn delete_policy(&mut self, key: &PolicyKey, cascade: bool) -> Result<()> {
        let tenant = self.tenant_mut(&key.tenant)?;
        if !tenant.policies.contains_key(&key.policy) {
            return Err(Error::not_found("policy", key));
        }

        let mut dependents = Vec::new();
        for (net_name, network) in tenant.networks.iter() {
            for (group_name, group) in network.groups.iter() {
                if group.policies.contains(&key.policy) {
                    dependents.push(format!("{net_name}:{group_name}"));
                }
            }
        }
        dependents.sort();

        if !dependents.is_empty() {
            if !cascade {
                return Err(Error::Dependency {
                    kind: "policy",
                    key: key.to_string(),
                    dependents,
                });
            }
            for network in tenant.networks.values_mut() {
                for group in network.groups.values_mut() {
                    group.policies.remove(&key.policy);
                }
            }
        }

        tenant.policies.remove(&key.policy);
        debug!("Removed policy");
        Ok(())
    }

    #[instrument(skip(self, spec), fields(
        tenant = %spec.tenant_name,
        policy = %spec.policy_name,
        rule = %spec.rule_id,
    ))]
    pub fn apply_rule(&mut self, spec: RuleSpec) -> Result<()> {
        if spec.rule_id.is_empty() {
            return Err(Error::Validation("rule has no id".into()));
        }

        let tenant = self.tenant_mut(&spec.tenant_name)?;
        let key = RuleKey::new(&spec.tenant_name, &spec.policy_name, &spec.rule_id);
        {
            let policy = tenant.policies.get(&spec.policy_name).ok_or_else(|| {
                Error::not_found("policy", PolicyKey::new(&spec.tenant_name, &spec.policy_name))
            })?;
            if policy.rules.contains_key(&spec.rule_id) {
                return Err(Error::conflict("rule", &key));
            }
        }

        let instances = mk_rule(&spec, tenant, &key)?;

        let policy = tenant
            .policies
            .get_mut(&spec.policy_name)
            .ok_or_else(|| {
                Error::not_found("policy", PolicyKey::new(&spec.tenant_name, &spec.policy_name))
            })?;
        let rule_id = spec.rule_id.clone();
        policy.rules.insert(rule_id, PolicyRule { spec, instances });
        debug!("Created rule");
        Ok(())
    }

    #[instrument(skip(self, key), fields(rule = %key))]
    pub fn delete_rule(&mut self, key: &RuleKey) -> Result<()> {
        let policy = self
            .tenant_mut(&key.tenant)?
            .policies
            .get_mut(&key.policy)
            .ok_or_else(|| Error::not_found("policy", PolicyKey::new(&key.tenant, &key.policy)))?;

        if policy.rules.remove(&key.rule).is_none() {
            return Err(Error::not_found("rule", key));
        }
        debug!("Removed rule");
        Ok(())
    }

    /// Snapshot of a tenant's policies, in name order.
    pub fn policies(&self, tenant: &str) -> Result<Vec<PolicySpec>> {
        let mut policies = self
            .tenant(tenant)?
            .policies
            .keys()
            .map(|name| PolicySpec {
                tenant_name: tenant.to_string(),
                policy_name: name.clone(),
            })
            .collect::<Vec<_>>();
        policies.sort_by(|a, b| a.policy_name.cmp(&b.policy_name));
        Ok(policies)
    }

    /// Snapshot of a policy's rules, in rule-id order.
    pub fn rules(&self, key: &PolicyKey) -> Result<Vec<RuleSpec>> {
        let policy = self
            .tenant(&key.tenant)?
            .policies
            .get(&key.policy)
            .ok_or_else(|| Error::not_found("policy", key))?;

        let mut rules = policy
            .rules
            .values()
            .map(|r| r.spec.clone())
            .collect::<Vec<_>>();
        rules.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));
        Ok(rules)
    }
}

/// Validates a rule spec and normalizes it into evaluator instances: one for
/// `in` or `out`, two for `both` (the `from*` side feeds the `in` instance,
/// the `to*` side the `out` instance).
fn mk_rule(spec: &RuleSpec, tenant: &Tenant, key: &RuleKey) -> Result<Vec<Rule>> {
    let action = match spec.action.as_str() {
        "allow" => RuleAction::Allow,
        "deny" => RuleAction::Deny,
        "" => return Err(Error::Validation(format!("rule {key} has no action"))),
        action => {
            return Err(Error::Validation(format!(
                "rule {key} has invalid action: {action:?}"
            )))
        }
    };

    let protocol = match spec.protocol.as_str() {
        "" => None,
        "tcp" => Some(Protocol::Tcp),
        "udp" => Some(Protocol::Udp),
        "icmp" => Some(Protocol::Icmp),
        protocol => {
            return Err(Error::Validation(format!(
                "rule {key} has invalid protocol: {protocol:?}"
            )))
        }
    };
    if spec.port != 0 && !matches!(protocol, Some(Protocol::Tcp) | Some(Protocol::Udp)) {
        return Err(Error::Validation(format!(
            "rule {key} constrains a port without tcp or udp"
        )));
    }

    let (instance_in, instance_out) = match spec.direction.as_str() {
        "in" => (true, false),
        "out" => (false, true),
        "both" => (true, true),
        "" => return Err(Error::Validation(format!("rule {key} has no direction"))),
        direction => {
            return Err(Error::Validation(format!(
                "rule {key} has invalid direction: {direction:?}"
            )))
        }
    };

    // An `in` rule selects on the flow's source; `to*` fields are senseless
    // there, and vice versa.
    if spec.direction == "in"
        && !(spec.to_endpoint_group.is_empty()
            && spec.to_network.is_empty()
            && spec.to_ip_address.is_empty())
    {
        return Err(Error::Validation(format!(
            "rule {key} has 'to' selectors on an incoming rule"
        )));
    }
    if spec.direction == "out"
        && !(spec.from_endpoint_group.is_empty()
            && spec.from_network.is_empty()
            && spec.from_ip_address.is_empty())
    {
        return Err(Error::Validation(format!(
            "rule {key} has 'from' selectors on an outgoing rule"
        )));
    }

    let mut instances = Vec::with_capacity(2);
    if instance_in {
        instances.push(Rule {
            direction: Direction::In,
            action,
            priority: spec.priority,
            protocol,
            port: spec.port,
            peer: mk_peer(
                &spec.from_endpoint_group,
                &spec.from_network,
                &spec.from_ip_address,
                tenant,
                key,
            )?,
        });
    }
    if instance_out {
        instances.push(Rule {
            direction: Direction::Out,
            action,
            priority: spec.priority,
            protocol,
            port: spec.port,
            peer: mk_peer(
                &spec.to_endpoint_group,
                &spec.to_network,
                &spec.to_ip_address,
                tenant,
                key,
            )?,
        });
    }
    Ok(instances)
}

/// Builds the peer selector for one direction side, verifying referents.
fn mk_peer(
    group: &str,
    network: &str,
    ip: &str,
    tenant: &Tenant,
    key: &RuleKey,
) -> Result<PeerMatch> {
    match (!group.is_empty(), !network.is_empty(), !ip.is_empty()) {
        (false, false, false) => Ok(PeerMatch::Any),

        (true, false, false) => resolve_group(group, tenant, key).map(PeerMatch::Group),

        (false, true, false) => {
            if !tenant.networks.contains_key(network) {
                return Err(Error::not_found(
                    "network",
                    format!("{}:{}", key.tenant, network),
                ));
            }
            Ok(PeerMatch::Network(network.to_string()))
        }

        (false, false, true) => {
            // Accept a bare address or a CIDR.
            if let Ok(net) = ip.parse::<ipnet::IpNet>() {
                return Ok(PeerMatch::Addr(NetworkMatch::from(net)));
            }
            ip.parse::<std::net::IpAddr>()
                .map(|addr| PeerMatch::Addr(NetworkMatch::from(addr)))
                .map_err(|_| Error::Validation(format!("rule {key} has invalid ip range: {ip:?}")))
        }

        _ => Err(Error::AmbiguousSelector(key.to_string())),
    }
}

/// Resolves a selector's group reference. An explicit `network:group` form is
/// looked up directly; a bare group name must be unique across the tenant's
/// networks.
fn resolve_group(selector: &str, tenant: &Tenant, key: &RuleKey) -> Result<GroupRef> {
    if let Some((network, group)) = selector.split_once(':') {
        let exists = tenant
            .networks
            .get(network)
            .is_some_and(|n| n.groups.contains_key(group));
        if !exists {
            return Err(Error::not_found(
                "endpoint group",
                format!("{}:{}:{}", key.tenant, network, group),
            ));
        }
        return Ok(GroupRef::new(network, group));
    }

    let mut owners = tenant
        .networks
        .iter()
        .filter(|(_, n)| n.groups.contains_key(selector))
        .map(|(name, _)| name.clone())
        .collect::<Vec<_>>();
    match owners.len() {
        0 => Err(Error::not_found(
            "endpoint group",
            format!("{}:{}", key.tenant, selector),
        )),
        1 => Ok(GroupRef::new(owners.remove(0), selector)),
        _ => {
            owners.sort();
            Err(Error::Validation(format!(
                "rule {key} group selector {selector:?} is ambiguous across networks {owners:?}"
            )))
        }
    }
}
