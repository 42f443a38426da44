use crate::{
    flow::{Endpoint, Flow},
    rule::{Direction, Rule, RuleAction},
};

/// The outcome of classifying a flow.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Allow,
    Deny,
}

/// Classifies a flow against a set of rules for one direction.
///
/// Rules with a different direction are skipped. Among the remaining rules
/// that match the flow, the decision is taken from the highest-priority rule;
/// an equal-priority conflict resolves to deny. When no rule matches, the
/// verdict is deny.
///
/// The result is independent of rule order, so callers may hand in rules in
/// whatever order their storage yields them.
pub fn evaluate<'r, I>(rules: I, flow: &Flow, direction: Direction) -> Verdict
where
    I: IntoIterator<Item = &'r Rule>,
{
    let peer = match direction {
        Direction::In => &flow.src,
        Direction::Out => &flow.dst,
    };

    let mut best: Option<(u32, RuleAction)> = None;
    for rule in rules {
        if rule.direction != direction || !matches(rule, flow, peer) {
            continue;
        }
        best = Some(match best {
            None => (rule.priority, rule.action),
            Some((priority, action)) => {
                if rule.priority > priority
                    || (rule.priority == priority && rule.action == RuleAction::Deny)
                {
                    (rule.priority, rule.action)
                } else {
                    (priority, action)
                }
            }
        });
    }

    match best {
        Some((_, RuleAction::Allow)) => Verdict::Allow,
        Some((_, RuleAction::Deny)) | None => Verdict::Deny,
    }
}

fn matches(rule: &Rule, flow: &Flow, peer: &Endpoint) -> bool {
    if let Some(protocol) = rule.protocol {
        if protocol != flow.protocol {
            return false;
        }
    }
    if rule.port != 0 && rule.port != flow.port {
        return false;
    }
    rule.peer.matches(peer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupRef, NetworkMatch, PeerMatch, Protocol};
    use ahash::AHashSet as HashSet;
    use std::net::IpAddr;

    fn endpoint(addr: &str, network: &str, groups: &[(&str, &str)]) -> Endpoint {
        Endpoint {
            tenant: "default".into(),
            network: network.into(),
            addr: addr.parse::<IpAddr>().unwrap(),
            groups: groups
                .iter()
                .map(|(n, g)| GroupRef::new(*n, *g))
                .collect::<HashSet<_>>(),
        }
    }

    fn flow(port: u16) -> Flow {
        Flow {
            src: endpoint("20.1.1.1", "private", &[("private", "srv0")]),
            dst: endpoint("20.1.1.2", "private", &[("private", "srv1")]),
            protocol: Protocol::Tcp,
            port,
        }
    }

    fn rule(direction: Direction, action: RuleAction, priority: u32, port: u16) -> Rule {
        Rule {
            direction,
            action,
            priority,
            protocol: Some(Protocol::Tcp),
            port,
            peer: PeerMatch::Any,
        }
    }

    #[test]
    fn no_matching_rule_denies() {
        assert_eq!(evaluate(&[], &flow(8000), Direction::In), Verdict::Deny);

        // A rule for the other direction does not apply.
        let rules = [rule(Direction::Out, RuleAction::Allow, 1, 0)];
        assert_eq!(evaluate(&rules, &flow(8000), Direction::In), Verdict::Deny);
    }

    #[test]
    fn default_deny_with_port_allow() {
        let rules = [
            rule(Direction::In, RuleAction::Deny, 1, 0),
            rule(Direction::In, RuleAction::Allow, 100, 8000),
        ];
        assert_eq!(evaluate(&rules, &flow(8000), Direction::In), Verdict::Allow);
        assert_eq!(evaluate(&rules, &flow(8001), Direction::In), Verdict::Deny);
    }

    #[test]
    fn priority_order_is_total() {
        let hi_allow = [
            rule(Direction::In, RuleAction::Deny, 10, 0),
            rule(Direction::In, RuleAction::Allow, 100, 0),
        ];
        let mut reversed = hi_allow.clone();
        reversed.reverse();
        assert_eq!(
            evaluate(&hi_allow, &flow(80), Direction::In),
            Verdict::Allow
        );
        assert_eq!(
            evaluate(&reversed, &flow(80), Direction::In),
            Verdict::Allow
        );

        let hi_deny = [
            rule(Direction::In, RuleAction::Allow, 10, 0),
            rule(Direction::In, RuleAction::Deny, 100, 0),
        ];
        assert_eq!(evaluate(&hi_deny, &flow(80), Direction::In), Verdict::Deny);
    }

    #[test]
    fn equal_priority_conflict_denies() {
        let rules = [
            rule(Direction::In, RuleAction::Allow, 50, 0),
            rule(Direction::In, RuleAction::Deny, 50, 0),
        ];
        let mut reversed = rules.clone();
        reversed.reverse();
        assert_eq!(evaluate(&rules, &flow(80), Direction::In), Verdict::Deny);
        assert_eq!(evaluate(&reversed, &flow(80), Direction::In), Verdict::Deny);
    }

    #[test]
    fn protocol_wildcard_and_mismatch() {
        let mut any = rule(Direction::In, RuleAction::Allow, 1, 0);
        any.protocol = None;
        assert_eq!(
            evaluate(&[any.clone()], &flow(80), Direction::In),
            Verdict::Allow
        );

        let mut icmp_flow = flow(0);
        icmp_flow.protocol = Protocol::Icmp;
        assert_eq!(evaluate(&[any], &icmp_flow, Direction::In), Verdict::Allow);

        let tcp_only = rule(Direction::In, RuleAction::Allow, 1, 0);
        assert_eq!(
            evaluate(&[tcp_only], &icmp_flow, Direction::In),
            Verdict::Deny
        );
    }

    #[test]
    fn group_selector_follows_membership() {
        let mut r = rule(Direction::In, RuleAction::Allow, 100, 0);
        r.peer = PeerMatch::Group(GroupRef::new("private", "srv0"));
        let rules = [rule(Direction::In, RuleAction::Deny, 1, 0), r];

        // The source (peer of an `in` decision) is a member of srv0.
        assert_eq!(evaluate(&rules, &flow(80), Direction::In), Verdict::Allow);

        // Drop the source's membership; the default deny takes over.
        let mut f = flow(80);
        f.src.groups.clear();
        assert_eq!(evaluate(&rules, &f, Direction::In), Verdict::Deny);
    }

    #[test]
    fn network_and_addr_selectors() {
        let mut by_net = rule(Direction::Out, RuleAction::Allow, 100, 0);
        by_net.peer = PeerMatch::Network("private".into());
        let rules = [rule(Direction::Out, RuleAction::Deny, 1, 0), by_net];
        assert_eq!(evaluate(&rules, &flow(80), Direction::Out), Verdict::Allow);

        let mut by_addr = rule(Direction::Out, RuleAction::Allow, 100, 0);
        by_addr.peer = PeerMatch::Addr(NetworkMatch::from(
            "30.0.0.0/8".parse::<crate::IpNet>().unwrap(),
        ));
        let rules = [rule(Direction::Out, RuleAction::Deny, 1, 0), by_addr];
        // The destination (peer of an `out` decision) is 20.1.1.2.
        assert_eq!(evaluate(&rules, &flow(80), Direction::Out), Verdict::Deny);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let rules = [
            rule(Direction::In, RuleAction::Deny, 1, 0),
            rule(Direction::In, RuleAction::Allow, 100, 8000),
        ];
        let f = flow(8000);
        let first = evaluate(&rules, &f, Direction::In);
        for _ in 0..100 {
            assert_eq!(evaluate(&rules, &f, Direction::In), first);
        }
    }
}
