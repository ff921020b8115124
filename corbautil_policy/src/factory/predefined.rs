//! Predefined policy table
//!
//! Each predefined policy name maps to a constructor closure. The portable
//! names come from [`StandardPolicy`] and are built through the root POA; the
//! Orbix extensions are built through `ORB::create_policy`.

use super::convert::root_poa;
use super::PolicyError;
use crate::orb::{orbix, policy_type, Orb, PolicyHandle, PolicyType, PolicyValue, StandardPolicy};
use std::fmt;
use std::sync::Arc;

pub type PolicyConstructor =
    Arc<dyn Fn(&dyn Orb) -> Result<PolicyHandle, PolicyError> + Send + Sync>;

/// A parameterless policy name and the closure that builds it
#[derive(Clone)]
pub struct PredefinedPolicy {
    pub name: &'static str,
    pub constructor: PolicyConstructor,
}

impl fmt::Debug for PredefinedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredefinedPolicy")
            .field("name", &self.name)
            .finish()
    }
}

fn standard(policy: StandardPolicy) -> PredefinedPolicy {
    PredefinedPolicy {
        name: policy.name(),
        constructor: Arc::new(move |orb: &dyn Orb| {
            root_poa(orb)?
                .create_policy(policy)
                .map_err(|source| PolicyError::OrbRejected {
                    name: policy.name().to_string(),
                    source,
                })
        }),
    }
}

fn vendor(name: &'static str, policy_type: PolicyType, value: PolicyValue) -> PredefinedPolicy {
    PredefinedPolicy {
        name,
        constructor: Arc::new(move |orb: &dyn Orb| {
            orb.create_policy(policy_type, value.clone())
                .map_err(|source| PolicyError::OrbRejected {
                    name: name.to_string(),
                    source,
                })
        }),
    }
}

/// Thread, lifespan, id-uniqueness, id-assignment, implicit-activation,
/// servant-retention and request-processing values
pub fn standard_policies() -> Vec<PredefinedPolicy> {
    StandardPolicy::ALL.iter().copied().map(standard).collect()
}

/// Orbix object-deactivation and leasing extensions
pub fn orbix_extensions() -> Vec<PredefinedPolicy> {
    vec![
        vendor(
            "orbix.deliver",
            policy_type::ORBIX_OBJECT_DEACTIVATION,
            PolicyValue::Enumerant(orbix::DELIVER),
        ),
        vendor(
            "orbix.discard",
            policy_type::ORBIX_OBJECT_DEACTIVATION,
            PolicyValue::Enumerant(orbix::DISCARD),
        ),
        vendor(
            "orbix.hold",
            policy_type::ORBIX_OBJECT_DEACTIVATION,
            PolicyValue::Enumerant(orbix::HOLD),
        ),
        vendor(
            "orbix.no_lease",
            policy_type::ORBIX_LEASING,
            PolicyValue::Bool(false),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orb::memory::InMemoryOrb;
    use assert_matches::assert_matches;

    #[test]
    fn test_standard_table_covers_all_names() {
        let names: Vec<_> = standard_policies().iter().map(|p| p.name).collect();
        assert_eq!(names.len(), 15);
        assert!(names.contains(&"orb_ctrl_model"));
        assert!(names.contains(&"use_servant_manager"));
    }

    #[test]
    fn test_standard_constructor_uses_root_poa() {
        let orb = InMemoryOrb::new();
        let persistent = standard_policies()
            .into_iter()
            .find(|p| p.name == "persistent")
            .unwrap();

        let policy = (persistent.constructor)(&orb).unwrap();
        assert_eq!(policy.policy_type(), policy_type::LIFESPAN);
        assert_eq!(policy.value(), PolicyValue::Enumerant(1));

        let orb = InMemoryOrb::new().without_root_poa();
        assert_matches!(
            (persistent.constructor)(&orb),
            Err(PolicyError::RootPoaUnavailable { .. })
        );
    }

    #[test]
    fn test_orbix_constructors() {
        let orb = InMemoryOrb::new();
        let table = orbix_extensions();

        let hold = table.iter().find(|p| p.name == "orbix.hold").unwrap();
        let policy = (hold.constructor)(&orb).unwrap();
        assert_eq!(policy.policy_type(), policy_type::ORBIX_OBJECT_DEACTIVATION);
        assert_eq!(policy.value(), PolicyValue::Enumerant(orbix::HOLD));

        let no_lease = table.iter().find(|p| p.name == "orbix.no_lease").unwrap();
        let policy = (no_lease.constructor)(&orb).unwrap();
        assert_eq!(policy.value(), PolicyValue::Bool(false));

        let orb = InMemoryOrb::new().without_vendor_policies();
        assert_matches!(
            (no_lease.constructor)(&orb),
            Err(PolicyError::OrbRejected { ref name, .. }) if name == "orbix.no_lease"
        );
    }
}
