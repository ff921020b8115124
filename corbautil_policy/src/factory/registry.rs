//! Extendable policy factory
//!
//! Lookup order for a policy name:
//!
//! 1. predefined names, which must not carry parameters
//! 2. registered factories, newest registration first
//! 3. otherwise the name is illegal
//!
//! Factories run outside the registry lock so a factory may itself consult
//! the registry.

use super::predefined::{orbix_extensions, standard_policies, PolicyConstructor, PredefinedPolicy};
use super::{PolicyError, PolicyFactory, RegistrationError};
use crate::config::compile_time::factory::MAX_REGISTERED_FACTORIES;
use crate::config::runtime::policy_preferences;
use crate::logging::codes;
use crate::orb::{Orb, PolicyHandle};
use crate::poa::VendorProfile;
use crate::syntax::NameValue;
use crate::{log_debug, log_error, log_success};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

struct RegisteredFactory {
    name: String,
    factory: Arc<dyn PolicyFactory>,
}

#[derive(Default)]
struct Registry {
    predefined: Vec<PredefinedPolicy>,
    vendor_extensions: Vec<VendorProfile>,
    custom: Vec<RegisteredFactory>,
}

impl Registry {
    fn predefined(&self, name: &str) -> Option<PolicyConstructor> {
        self.predefined
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.constructor.clone())
    }

    fn custom(&self, name: &str) -> Option<Arc<dyn PolicyFactory>> {
        self.custom
            .iter()
            .rev()
            .find(|entry| entry.name == name)
            .map(|entry| entry.factory.clone())
    }
}

/// Policy factory that knows the predefined names and accepts registrations
pub struct ExtendablePolicyFactory {
    registry: RwLock<Registry>,
}

impl ExtendablePolicyFactory {
    /// Factory with the portable predefined names only
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry {
                predefined: standard_policies(),
                ..Registry::default()
            }),
        }
    }

    /// Factory with the predefined names of `profile` installed
    pub fn with_vendor_extensions(profile: VendorProfile) -> Self {
        let mut registry = Registry {
            predefined: standard_policies(),
            ..Registry::default()
        };
        if let Some(extensions) = vendor_policies(profile) {
            registry.vendor_extensions.push(profile);
            registry.predefined.extend(extensions);
        }
        Self {
            registry: RwLock::new(registry),
        }
    }

    /// Add the proprietary predefined names of `profile`. Installing the same
    /// profile twice has no effect.
    ///
    /// Fails without installing anything when one of the names is already
    /// registered as a policy factory.
    pub fn install_vendor_extensions(&self, profile: VendorProfile) -> Result<(), RegistrationError> {
        let Some(extensions) = vendor_policies(profile) else {
            return Ok(());
        };

        let mut registry = self.registry.write();
        if registry.vendor_extensions.contains(&profile) {
            return Ok(());
        }
        if let Some(taken) = extensions.iter().find(|p| registry.custom(p.name).is_some()) {
            let error = RegistrationError::VendorExtensionConflict {
                name: taken.name.to_string(),
            };
            log_error!(error.error_code(), &error.to_string(),
                "name" => taken.name,
                "vendor" => profile
            );
            return Err(error);
        }
        registry.vendor_extensions.push(profile);
        registry.predefined.extend(extensions);
        Ok(())
    }

    /// Register a factory for `name`
    ///
    /// Fails when `name` is predefined or already registered.
    pub fn register_policy_factory<F>(&self, name: &str, factory: F) -> Result<(), RegistrationError>
    where
        F: PolicyFactory + 'static,
    {
        let result = self.register(name, Arc::new(factory));

        match &result {
            Ok(()) => {
                log_success!(
                    codes::success::POLICY_FACTORY_REGISTERED,
                    "Policy factory registered",
                    "name" => name
                );
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(), "name" => name);
            }
        }

        result
    }

    fn register(&self, name: &str, factory: Arc<dyn PolicyFactory>) -> Result<(), RegistrationError> {
        let mut registry = self.registry.write();

        if registry.predefined(name).is_some() {
            return Err(RegistrationError::ConflictsWithPredefined {
                name: name.to_string(),
            });
        }
        if registry.custom(name).is_some() {
            return Err(RegistrationError::Duplicate {
                name: name.to_string(),
            });
        }
        if registry.custom.len() >= MAX_REGISTERED_FACTORIES {
            return Err(RegistrationError::RegistryFull {
                name: name.to_string(),
            });
        }

        registry.custom.push(RegisteredFactory {
            name: name.to_string(),
            factory,
        });
        Ok(())
    }

    pub fn is_predefined(&self, name: &str) -> bool {
        self.registry.read().predefined(name).is_some()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.read().custom(name).is_some()
    }

    /// Registered names, oldest first
    pub fn registered_names(&self) -> Vec<String> {
        self.registry
            .read()
            .custom
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    pub fn predefined_names(&self) -> Vec<&'static str> {
        self.registry.read().predefined.iter().map(|p| p.name).collect()
    }
}

impl Default for ExtendablePolicyFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyFactory for ExtendablePolicyFactory {
    fn create(
        &self,
        orb: &dyn Orb,
        name: &str,
        params: &[NameValue],
    ) -> Result<PolicyHandle, PolicyError> {
        let (predefined, custom) = {
            let registry = self.registry.read();
            (registry.predefined(name), registry.custom(name))
        };

        let policy = if let Some(constructor) = predefined {
            if !params.is_empty() {
                return Err(PolicyError::UnexpectedParameters {
                    name: name.to_string(),
                });
            }
            constructor(orb)?
        } else if let Some(factory) = custom {
            factory
                .create(orb, name, params)
                .map_err(|error| match error {
                    PolicyError::Orb { source } => PolicyError::OrbRejected {
                        name: name.to_string(),
                        source,
                    },
                    other => other,
                })?
        } else {
            return Err(PolicyError::IllegalPolicyName {
                name: name.to_string(),
            });
        };

        log_debug!(
            "Policy created",
            "name" => name,
            "type" => crate::orb::policy_type::name(policy.policy_type()),
            "value" => policy.value()
        );

        Ok(policy)
    }
}

fn vendor_policies(profile: VendorProfile) -> Option<Vec<PredefinedPolicy>> {
    match profile {
        VendorProfile::Orbix => Some(orbix_extensions()),
        VendorProfile::Portable | VendorProfile::Orbacus => None,
    }
}

static DEFAULT_FACTORY: OnceLock<ExtendablePolicyFactory> = OnceLock::new();

/// Process-wide factory used by the convenience parsing functions
///
/// Created on first use with the vendor extensions of the configured
/// vendor profile.
pub fn default_policy_factory() -> &'static ExtendablePolicyFactory {
    DEFAULT_FACTORY.get_or_init(|| {
        ExtendablePolicyFactory::with_vendor_extensions(policy_preferences().vendor_profile)
    })
}
