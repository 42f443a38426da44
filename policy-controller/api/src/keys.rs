use std::{fmt, str::FromStr};

/// A malformed composite resource key.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[error("not a valid {kind} key: {key}")]
pub struct KeyError {
    kind: &'static str,
    key: String,
}

/// Identifies a network: `tenant:network`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NetworkKey {
    pub tenant: String,
    pub network: String,
}

/// Identifies an endpoint group: `tenant:network:group`.
///
/// Only the three-part form is accepted; the legacy `tenant:group` form is
/// ambiguous when a group name is reused across networks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub tenant: String,
    pub network: String,
    pub group: String,
}

/// Identifies a policy: `tenant:policy`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PolicyKey {
    pub tenant: String,
    pub policy: String,
}

/// Identifies a rule within a policy: `tenant:policy:rule`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuleKey {
    pub tenant: String,
    pub policy: String,
    pub rule: String,
}

fn parts<const N: usize>(kind: &'static str, key: &str) -> Result<[String; N], KeyError> {
    let err = || KeyError {
        kind,
        key: key.to_string(),
    };

    let split = key.split(':').collect::<Vec<_>>();
    if split.len() != N || split.iter().any(|p| p.is_empty()) {
        return Err(err());
    }
    Ok(split
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>()
        .try_into()
        .expect("length checked above"))
}

// === impl NetworkKey ===

impl NetworkKey {
    pub fn new(tenant: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            network: network.into(),
        }
    }
}

impl FromStr for NetworkKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [tenant, network] = parts::<2>("network", s)?;
        Ok(Self { tenant, network })
    }
}

impl fmt::Display for NetworkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tenant, self.network)
    }
}

// === impl GroupKey ===

impl GroupKey {
    pub fn new(
        tenant: impl Into<String>,
        network: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            network: network.into(),
            group: group.into(),
        }
    }
}

impl FromStr for GroupKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [tenant, network, group] = parts::<3>("endpoint group", s)?;
        Ok(Self {
            tenant,
            network,
            group,
        })
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.tenant, self.network, self.group)
    }
}

// === impl PolicyKey ===

impl PolicyKey {
    pub fn new(tenant: impl Into<String>, policy: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            policy: policy.into(),
        }
    }
}

impl FromStr for PolicyKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [tenant, policy] = parts::<2>("policy", s)?;
        Ok(Self { tenant, policy })
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tenant, self.policy)
    }
}

// === impl RuleKey ===

impl RuleKey {
    pub fn new(
        tenant: impl Into<String>,
        policy: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            policy: policy.into(),
            rule: rule.into(),
        }
    }
}

impl FromStr for RuleKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [tenant, policy, rule] = parts::<3>("rule", s)?;
        Ok(Self {
            tenant,
            policy,
            rule,
        })
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.tenant, self.policy, self.rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_key_roundtrip() {
        let key = "default:private:srv0".parse::<GroupKey>().unwrap();
        assert_eq!(key, GroupKey::new("default", "private", "srv0"));
        assert_eq!(key.to_string(), "default:private:srv0");
    }

    #[test]
    fn legacy_two_part_group_key_rejected() {
        assert!("default:srv0".parse::<GroupKey>().is_err());
    }

    #[test]
    fn empty_segments_rejected() {
        assert!("default:".parse::<PolicyKey>().is_err());
        assert!(":private".parse::<NetworkKey>().is_err());
        assert!("default::r1".parse::<RuleKey>().is_err());
    }

    #[test]
    fn rule_key_roundtrip() {
        let key = "default:first:1".parse::<RuleKey>().unwrap();
        assert_eq!(key, RuleKey::new("default", "first", "1"));
        assert_eq!(key.to_string(), "default:first:1");
    }
}
