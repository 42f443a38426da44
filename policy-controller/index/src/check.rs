//! Flow classification over the indexed model.
//!
//! Each call answers one direction: `In` consults the policies attached to
//! the destination's endpoint groups, `Out` the source's. A connection is
//! typically admitted only when both directions allow it independently;
//! `check_connection` composes the two.

use crate::Index;
use fabric_policy_controller_core::{evaluate, Direction, Flow, Rule, Verdict};
use tracing::{debug, trace};

// === impl Index ===

impl Index {
    /// Classifies a flow for one direction.
    ///
    /// An endpoint whose attached policies hold no rules for the requested
    /// direction is unrestricted in that direction; in particular, no
    /// attached policy at all means unrestricted. Once any direction-matching
    /// rule applies, an unmatched flow is denied. A dangling policy
    /// attachment contributes no rules rather than failing the check.
    pub fn check_flow(&self, flow: &Flow, direction: Direction) -> Verdict {
        let subject = match direction {
            Direction::In => &flow.dst,
            Direction::Out => &flow.src,
        };

        let tenant = match self.tenants.get(&subject.tenant) {
            Some(tenant) => tenant,
            None => {
                trace!(tenant = %subject.tenant, "Unknown tenant; unrestricted");
                return Verdict::Allow;
            }
        };

        let mut rules = Vec::<&Rule>::new();
        for group_ref in &subject.groups {
            let group = tenant
                .networks
                .get(&group_ref.network)
                .and_then(|n| n.groups.get(&group_ref.group));
            let group = match group {
                Some(group) => group,
                None => continue,
            };

            for name in &group.policies {
                match tenant.policies.get(name) {
                    Some(policy) => rules.extend(
                        policy
                            .rules
                            .values()
                            .flat_map(|r| r.instances.iter())
                            .filter(|r| r.direction == direction),
                    ),
                    None => trace!(policy = %name, "Dangling policy attachment"),
                }
            }
        }

        if rules.is_empty() {
            trace!(%direction, "No applicable rules; unrestricted");
            return Verdict::Allow;
        }

        let verdict = evaluate(rules, flow, direction);
        debug!(%direction, ?verdict, "Classified flow");
        verdict
    }

    /// Classifies a connection: allowed only when the source's outgoing rules
    /// and the destination's incoming rules both permit it.
    pub fn check_connection(&self, flow: &Flow) -> Verdict {
        match (
            self.check_flow(flow, Direction::Out),
            self.check_flow(flow, Direction::In),
        ) {
            (Verdict::Allow, Verdict::Allow) => Verdict::Allow,
            _ => Verdict::Deny,
        }
    }
}
