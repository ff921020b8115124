//! POA and POA manager construction
//!
//! `PoaUtility` hides the differences between deployment models and ORB
//! vendors behind two calls: `create_poa_manager(label)` and
//! `create_poa(name, parent, manager, policies)`.
//!
//! The first manager handed out is the root POA's. Every later one belongs to
//! a freshly created helper POA (`_helper_POA_<n>` under the root), unless the
//! vendor supplies a labelled manager factory for fixed-port deployments.

use super::deployment::{DeploymentModel, VendorProfile};
use super::error::{CreationError, PoaUtilityError};
use crate::config::compile_time::poa::{MAX_HELPER_POAS, MAX_POA_PATH_DEPTH};
use crate::config::runtime::policy_preferences;
use crate::factory::{default_policy_factory, ExtendablePolicyFactory, PolicyError, PolicyFactory};
use crate::logging::codes;
use crate::orb::{
    orbix, policy_type, Orb, OrbError, Poa, PoaManager, PoaManagerFactory, PolicyHandle,
    PolicyValue,
};
use crate::syntax::{NameValue, PolicyListParser};
use crate::{log_debug, log_error, log_success};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A POA manager together with the label used for its proprietary policies
#[derive(Clone)]
pub struct LabelledPoaManager {
    label: String,
    manager: Arc<dyn PoaManager>,
    helper_poa: Option<Arc<dyn Poa>>,
}

impl LabelledPoaManager {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn manager(&self) -> Arc<dyn PoaManager> {
        self.manager.clone()
    }

    /// The helper POA that owns the manager, if one was needed
    pub fn helper_poa(&self) -> Option<Arc<dyn Poa>> {
        self.helper_poa.clone()
    }
}

impl fmt::Debug for LabelledPoaManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelledPoaManager")
            .field("label", &self.label)
            .field("manager", &self.manager.id())
            .field("helper_poa", &self.helper_poa.as_ref().map(|poa| poa.name()))
            .finish()
    }
}

#[derive(Debug)]
struct ManagerState {
    first_pending: bool,
    helper_count: u32,
}

/// Forwards to the process-wide default factory
struct DefaultFactory;

impl PolicyFactory for DefaultFactory {
    fn create(
        &self,
        orb: &dyn Orb,
        name: &str,
        params: &[NameValue],
    ) -> Result<PolicyHandle, PolicyError> {
        default_policy_factory().create(orb, name, params)
    }
}

pub struct PoaUtility {
    orb: Arc<dyn Orb>,
    root: Arc<dyn Poa>,
    model: DeploymentModel,
    vendor: VendorProfile,
    factory: Arc<dyn PolicyFactory>,
    manager_factory: Option<Arc<dyn PoaManagerFactory>>,
    managers: Mutex<ManagerState>,
}

impl PoaUtility {
    /// Resolve the root POA and, for vendors that need it, the POA manager
    /// factory. Policies are created through the default factory, which
    /// gains the vendor's predefined names.
    pub fn new(
        orb: Arc<dyn Orb>,
        model: DeploymentModel,
        vendor: VendorProfile,
    ) -> Result<Self, PoaUtilityError> {
        Self::build(orb, model, vendor, None)
    }

    /// `new`, creating policies through `factory` instead of the default one.
    /// Only `factory` gains the vendor's predefined names.
    pub fn with_policy_factory(
        orb: Arc<dyn Orb>,
        model: DeploymentModel,
        vendor: VendorProfile,
        factory: Arc<ExtendablePolicyFactory>,
    ) -> Result<Self, PoaUtilityError> {
        Self::build(orb, model, vendor, Some(factory))
    }

    /// `new` with the vendor profile from the runtime preferences
    pub fn with_configured_vendor(
        orb: Arc<dyn Orb>,
        model: DeploymentModel,
    ) -> Result<Self, PoaUtilityError> {
        Self::new(orb, model, policy_preferences().vendor_profile)
    }

    fn build(
        orb: Arc<dyn Orb>,
        model: DeploymentModel,
        vendor: VendorProfile,
        factory: Option<Arc<ExtendablePolicyFactory>>,
    ) -> Result<Self, PoaUtilityError> {
        let result = Self::resolve(orb, model, vendor, factory);

        match &result {
            Ok(_) => {
                log_debug!("PoaUtility created",
                    "deployment_model" => model,
                    "vendor_profile" => vendor
                );
            }
            Err(error) => {
                log_error!(codes::system::INITIALIZATION_FAILURE, "PoaUtility initialization failed",
                    "cause" => error,
                    "cause_code" => error.error_code(),
                    "vendor_profile" => vendor
                );
            }
        }

        result
    }

    fn resolve(
        orb: Arc<dyn Orb>,
        model: DeploymentModel,
        vendor: VendorProfile,
        factory: Option<Arc<ExtendablePolicyFactory>>,
    ) -> Result<Self, PoaUtilityError> {
        let root = orb
            .resolve_root_poa()
            .map_err(|source| PoaUtilityError::RootPoaUnavailable { source })?;

        let manager_factory = orb.poa_manager_factory();
        if vendor == VendorProfile::Orbacus && manager_factory.is_none() {
            return Err(PoaUtilityError::ManagerFactoryUnavailable {
                source: OrbError::InitialReferenceNotFound {
                    id: "POAManagerFactory".to_string(),
                },
            });
        }

        let extensions_failed = |source| PoaUtilityError::VendorExtensions { vendor, source };
        let factory: Arc<dyn PolicyFactory> = match factory {
            Some(factory) => {
                factory
                    .install_vendor_extensions(vendor)
                    .map_err(extensions_failed)?;
                factory
            }
            None => {
                default_policy_factory()
                    .install_vendor_extensions(vendor)
                    .map_err(extensions_failed)?;
                Arc::new(DefaultFactory)
            }
        };

        Ok(Self {
            orb,
            root,
            model,
            vendor,
            factory,
            manager_factory,
            managers: Mutex::new(ManagerState {
                first_pending: true,
                helper_count: 0,
            }),
        })
    }

    pub fn orb(&self) -> Arc<dyn Orb> {
        self.orb.clone()
    }

    pub fn root(&self) -> Arc<dyn Poa> {
        self.root.clone()
    }

    pub fn deployment_model(&self) -> DeploymentModel {
        self.model
    }

    pub fn vendor_profile(&self) -> VendorProfile {
        self.vendor
    }

    /// Hand out a POA manager for `label`
    pub fn create_poa_manager(&self, label: &str) -> Result<LabelledPoaManager, PoaUtilityError> {
        let result = self.mint_manager(label);

        match &result {
            Ok(manager) => {
                let helper = manager
                    .helper_poa
                    .as_ref()
                    .map(|poa| poa.name())
                    .unwrap_or_else(|| "none".to_string());
                log_success!(
                    codes::success::POA_MANAGER_CREATED,
                    "POA manager created",
                    "label" => label,
                    "helper_poa" => helper
                );
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(), "label" => label);
            }
        }

        result
    }

    fn mint_manager(&self, label: &str) -> Result<LabelledPoaManager, PoaUtilityError> {
        let failed = |source: CreationError| PoaUtilityError::ManagerCreation {
            label: label.to_string(),
            source,
        };

        if self.vendor.uses_manager_factory(self.model) {
            let factory = self.manager_factory.as_ref().ok_or_else(|| {
                PoaUtilityError::ManagerFactoryUnavailable {
                    source: OrbError::InitialReferenceNotFound {
                        id: "POAManagerFactory".to_string(),
                    },
                }
            })?;
            let manager = factory
                .create_poa_manager(label)
                .map_err(|source| failed(source.into()))?;
            self.managers.lock().first_pending = false;

            return Ok(LabelledPoaManager {
                label: label.to_string(),
                manager,
                helper_poa: None,
            });
        }

        let helper_number = {
            let mut state = self.managers.lock();
            if state.first_pending {
                state.first_pending = false;
                None
            } else if state.helper_count >= MAX_HELPER_POAS {
                return Err(PoaUtilityError::HelperLimit {
                    label: label.to_string(),
                });
            } else {
                state.helper_count += 1;
                Some(state.helper_count)
            }
        };

        let Some(number) = helper_number else {
            return Ok(LabelledPoaManager {
                label: label.to_string(),
                manager: self.root.the_poa_manager(),
                helper_poa: None,
            });
        };

        let helper_name = format!("_helper_POA_{}", number);
        let policies = self.create_policy_list(label, "").map_err(failed)?;
        let created = self.root.create_child(&helper_name, None, &policies);
        destroy_all(&policies);
        let helper = created.map_err(|source| failed(source.into()))?;

        Ok(LabelledPoaManager {
            label: label.to_string(),
            manager: helper.the_poa_manager(),
            helper_poa: Some(helper),
        })
    }

    /// Create `name` under `parent` with the policies in `policy_list`
    ///
    /// Policy objects are destroyed afterwards unless the vendor profile
    /// leaks them.
    pub fn create_poa(
        &self,
        name: &str,
        parent: &dyn Poa,
        manager: &LabelledPoaManager,
        policy_list: &str,
    ) -> Result<Arc<dyn Poa>, PoaUtilityError> {
        let policies = match self.create_policy_list(manager.label(), policy_list) {
            Ok(policies) => policies,
            Err(source) => return Err(self.poa_error(name, parent, policy_list, source)),
        };

        let created = parent.create_child(name, Some(manager.manager()), &policies);
        if !self.vendor.leaks_policies() {
            destroy_all(&policies);
        }

        let poa = created.map_err(|source| self.poa_error(name, parent, policy_list, source.into()))?;

        if policy_preferences().log_poa_creation {
            let path = self
                .full_poa_name(name, parent)
                .unwrap_or_else(|_| name.to_string());
            log_success!(
                codes::success::POA_CREATED,
                "POA created",
                "path" => path,
                "policies" => policies.len(),
                "manager" => manager.label()
            );
        }

        Ok(poa)
    }

    fn poa_error(
        &self,
        name: &str,
        parent: &dyn Poa,
        policy_list: &str,
        source: CreationError,
    ) -> PoaUtilityError {
        let poa_path = self
            .full_poa_name(name, parent)
            .unwrap_or_else(|_| name.to_string());

        let error = match source {
            CreationError::Orb(OrbError::InvalidPolicy { index }) => PoaUtilityError::InvalidPolicy {
                poa_path,
                index,
                policy_list: policy_list.to_string(),
            },
            source => PoaUtilityError::PoaCreation { poa_path, source },
        };

        log_error!(error.error_code(), &error.to_string());
        error
    }

    /// Parse `policy_list` and append the deployment-model policies the
    /// vendor profile requires
    pub fn create_policy_list(
        &self,
        label: &str,
        policy_list: &str,
    ) -> Result<Vec<PolicyHandle>, CreationError> {
        let mut persistent = false;
        let mut policies = PolicyListParser::new().parse_policy_list_with(
            policy_list,
            self.orb.as_ref(),
            self.factory.as_ref(),
            |clause| persistent |= clause.name == "persistent",
        )?;

        if !self.vendor.injects_policies() {
            return Ok(policies);
        }

        if persistent && !self.model.uses_imr() {
            policies.push(self.orb.create_policy(
                policy_type::ORBIX_PERSISTENCE_MODE,
                PolicyValue::Enumerant(orbix::DIRECT_PERSISTENCE),
            )?);
        }

        if self.model.uses_fixed_ports() {
            policies.push(self.orb.create_policy(
                policy_type::ORBIX_WELL_KNOWN_ADDRESSING,
                PolicyValue::Text(label.to_string()),
            )?);
        }

        Ok(policies)
    }

    /// `parent`'s path below the root, joined with `/`, followed by
    /// `local_name`
    pub fn full_poa_name(&self, local_name: &str, parent: &dyn Poa) -> Result<String, PoaUtilityError> {
        let mut segments = Vec::new();

        if !parent.is_same(self.root.as_ref()) {
            segments.push(parent.name());
            let mut next = parent.parent();
            while let Some(poa) = next {
                if poa.is_same(self.root.as_ref()) {
                    break;
                }
                if segments.len() >= MAX_POA_PATH_DEPTH {
                    return Err(PoaUtilityError::PathTooDeep {
                        local_name: local_name.to_string(),
                    });
                }
                segments.push(poa.name());
                next = poa.parent();
            }
        }

        segments.reverse();
        segments.push(local_name.to_string());
        Ok(segments.join("/"))
    }
}

fn destroy_all(policies: &[PolicyHandle]) {
    for policy in policies {
        policy.destroy();
    }
}
