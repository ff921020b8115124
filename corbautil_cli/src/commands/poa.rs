//! `corbautil poa`: build a POA hierarchy under the in-memory ORB

use crate::create_policy_registry;
use corbautil_policy::orb::memory::InMemoryOrb;
use corbautil_policy::orb::policy_type;
use corbautil_policy::{DeploymentModel, Poa, PoaUtility, VendorProfile};
use serde::Serialize;
use std::error::Error;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PoaRequest {
    /// `/`-separated path below the root; intermediate POAs get no policies
    pub path: String,
    pub policies: String,
    pub manager_label: String,
    pub model: DeploymentModel,
    pub vendor: VendorProfile,
    pub register: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PoaPolicy {
    pub type_name: &'static str,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct PoaReport {
    pub path: String,
    pub manager: String,
    pub deployment_model: DeploymentModel,
    pub vendor_profile: VendorProfile,
    pub policies: Vec<PoaPolicy>,
}

pub fn run_poa(request: &PoaRequest) -> Result<PoaReport, Box<dyn Error>> {
    let segments: Vec<&str> = request
        .path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        return Err("POA path must name at least one POA".into());
    }

    let orb = Arc::new(InMemoryOrb::new().with_poa_manager_factory());
    let registry = create_policy_registry(request.vendor, &request.register)?;
    let utility =
        PoaUtility::with_policy_factory(orb.clone(), request.model, request.vendor, registry)?;

    let manager = utility.create_poa_manager(&request.manager_label)?;

    let mut parent: Arc<dyn Poa> = utility.root();
    let mut full_path = String::new();
    for (index, segment) in segments.iter().enumerate() {
        let policy_list = if index + 1 == segments.len() {
            request.policies.as_str()
        } else {
            ""
        };
        full_path = utility.full_poa_name(segment, parent.as_ref())?;
        parent = utility.create_poa(segment, parent.as_ref(), &manager, policy_list)?;
    }

    let created = orb
        .find(&segments.join("/"))
        .ok_or_else(|| format!("POA '{}' missing after creation", full_path))?;

    let policies = created
        .policies()
        .iter()
        .map(|(policy_type, value)| PoaPolicy {
            type_name: policy_type::name(*policy_type),
            value: value.to_string(),
        })
        .collect();

    log::debug!("created {} with manager {}", full_path, manager.label());
    Ok(PoaReport {
        path: full_path,
        manager: manager.label().to_string(),
        deployment_model: utility.deployment_model(),
        vendor_profile: utility.vendor_profile(),
        policies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str, policies: &str) -> PoaRequest {
        PoaRequest {
            path: path.to_string(),
            policies: policies.to_string(),
            manager_label: "core".to_string(),
            model: DeploymentModel::RandomPortsNoImr,
            vendor: VendorProfile::Portable,
            register: Vec::new(),
        }
    }

    #[test]
    fn test_nested_poa() {
        let report = run_poa(&request("Acme/Foo", "persistent, user_id")).unwrap();
        assert_eq!(report.manager, "core");
        assert_eq!(report.policies.len(), 2);
        assert_eq!(report.path, "Acme/Foo");
    }

    #[test]
    fn test_orbix_injects_addressing_policy() {
        let mut req = request("Acme", "persistent");
        req.vendor = VendorProfile::Orbix;
        req.model = DeploymentModel::FixedPortsNoImr;

        let report = run_poa(&req).unwrap();
        let names: Vec<_> = report.policies.iter().map(|p| p.type_name).collect();
        assert!(names.contains(&"IT_CORBA::WellKnownAddressingPolicy"));
        assert!(names.contains(&"IT_PortableServer::PersistenceModePolicy"));
    }

    #[test]
    fn test_orbacus_uses_manager_factory() {
        let mut req = request("Acme", "");
        req.vendor = VendorProfile::Orbacus;
        req.model = DeploymentModel::FixedPortsWithImr;
        assert!(run_poa(&req).is_ok());
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(run_poa(&request("/", "")).is_err());
    }

    #[test]
    fn test_bad_policy_list_reported() {
        let error = run_poa(&request("Acme", "persistent(x)")).unwrap_err();
        assert!(error.to_string().contains("Acme"));
    }
}
