//! # corbautil CLI
//!
//! Policy-list parsing, POA construction against the in-memory ORB and a
//! bounded producer-consumer demo.

pub mod commands;

use corbautil_policy::factory::{ExtendablePolicyFactory, PolicyError, RegistrationError};
use corbautil_policy::orb::{PolicyType, PolicyValue};
use corbautil_policy::syntax::NameValue;
use corbautil_policy::{Orb, PolicyHandle, VendorProfile};
use std::sync::Arc;

/// Policy type id carried by every pass-through policy
pub const PASSTHROUGH_POLICY_TYPE: PolicyType = 0x4355_0000;

/// Create a registry with the predefined policies, the vendor's extensions
/// and one pass-through factory per name in `passthrough`
///
/// A pass-through policy is created through `ORB::create_policy` with its
/// parameters rendered as text, so the CLI can accept arbitrary custom names.
pub fn create_policy_registry(
    vendor: VendorProfile,
    passthrough: &[String],
) -> Result<Arc<ExtendablePolicyFactory>, RegistrationError> {
    let registry = ExtendablePolicyFactory::with_vendor_extensions(vendor);

    for name in passthrough {
        registry.register_policy_factory(name, passthrough_policy)?;
    }

    Ok(Arc::new(registry))
}

fn passthrough_policy(
    orb: &dyn Orb,
    _name: &str,
    params: &[NameValue],
) -> Result<PolicyHandle, PolicyError> {
    let rendered = params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    orb.create_policy(PASSTHROUGH_POLICY_TYPE, PolicyValue::Text(rendered))
        .map_err(|source| PolicyError::Orb { source })
}
