//! Policy creation and registration errors

use crate::config::compile_time::factory::MAX_REGISTERED_FACTORIES;
use crate::logging::{codes, Code};
use crate::orb::OrbError;

/// Errors raised while turning one parsed policy into a policy object
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("illegal policy name")]
    IllegalPolicyName { name: String },

    #[error("policy '{name}' does not take any parameters")]
    UnexpectedParameters { name: String },

    #[error("illegal boolean value ('{value}') used as a parameter in policy list")]
    IllegalBoolean { value: String },

    #[error("illegal integer value ('{value}') used as a parameter in policy list")]
    IllegalInteger { value: String },

    #[error("illegal floating-point value ('{value}') used as a parameter in policy list")]
    IllegalFloat { value: String },

    #[error("resolve_initial_references(\"RootPOA\") failed: {source}")]
    RootPoaUnavailable {
        #[source]
        source: OrbError,
    },

    /// ORB failure raised inside a factory, before the registry adds context
    #[error("{source}")]
    Orb {
        #[source]
        source: OrbError,
    },

    /// ORB failure with the name of the policy being created
    #[error("{source}")]
    OrbRejected {
        name: String,
        #[source]
        source: OrbError,
    },

    #[error("invalid parameter for policy '{policy}': {message}")]
    InvalidParameter { policy: String, message: String },
}

impl PolicyError {
    pub fn invalid_parameter(policy: &str, message: &str) -> Self {
        Self::InvalidParameter {
            policy: policy.to_string(),
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            PolicyError::IllegalPolicyName { .. } => codes::factory::ILLEGAL_POLICY_NAME,
            PolicyError::UnexpectedParameters { .. } => codes::factory::UNEXPECTED_PARAMETERS,
            PolicyError::IllegalBoolean { .. } => codes::factory::ILLEGAL_BOOLEAN,
            PolicyError::IllegalInteger { .. } => codes::factory::ILLEGAL_INTEGER,
            PolicyError::IllegalFloat { .. } => codes::factory::ILLEGAL_FLOAT,
            PolicyError::RootPoaUnavailable { .. } => codes::factory::ROOT_POA_UNAVAILABLE,
            PolicyError::Orb { .. } | PolicyError::OrbRejected { .. } => {
                codes::factory::ORB_REJECTED_POLICY
            }
            PolicyError::InvalidParameter { .. } => codes::factory::INVALID_PARAMETER,
        }
    }
}

impl From<OrbError> for PolicyError {
    fn from(source: OrbError) -> Self {
        PolicyError::Orb { source }
    }
}

/// Errors raised by `register_policy_factory`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error(
        "PoaUtility::registerPolicyFactory() failed: attempted registration of '{name}' \
         conflicts with a predefined policy of the same name"
    )]
    ConflictsWithPredefined { name: String },

    #[error(
        "PoaUtility::registerPolicyFactory() failed: attempted re-registration of '{name}' policy"
    )]
    Duplicate { name: String },

    #[error(
        "PoaUtility::registerPolicyFactory() failed: registry is full \
         ({MAX_REGISTERED_FACTORIES} factories)"
    )]
    RegistryFull { name: String },

    #[error(
        "cannot install vendor policies: predefined name '{name}' is already registered \
         as a policy factory"
    )]
    VendorExtensionConflict { name: String },
}

impl RegistrationError {
    pub fn error_code(&self) -> Code {
        match self {
            RegistrationError::ConflictsWithPredefined { .. } => {
                codes::registration::CONFLICTS_WITH_PREDEFINED
            }
            RegistrationError::Duplicate { .. } => codes::registration::DUPLICATE_REGISTRATION,
            RegistrationError::RegistryFull { .. } => codes::registration::REGISTRY_FULL,
            RegistrationError::VendorExtensionConflict { .. } => {
                codes::registration::VENDOR_EXTENSION_CONFLICT
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RegistrationError::ConflictsWithPredefined { name }
            | RegistrationError::Duplicate { name }
            | RegistrationError::RegistryFull { name }
            | RegistrationError::VendorExtensionConflict { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_messages() {
        let conflict = RegistrationError::ConflictsWithPredefined {
            name: "persistent".to_string(),
        };
        assert_eq!(
            conflict.to_string(),
            "PoaUtility::registerPolicyFactory() failed: attempted registration of \
             'persistent' conflicts with a predefined policy of the same name"
        );

        let duplicate = RegistrationError::Duplicate {
            name: "foo".to_string(),
        };
        assert_eq!(
            duplicate.to_string(),
            "PoaUtility::registerPolicyFactory() failed: attempted re-registration of 'foo' policy"
        );
        assert_eq!(duplicate.name(), "foo");
    }

    #[test]
    fn test_orb_errors_convert_without_context() {
        let error: PolicyError = OrbError::system("NO_RESOURCES").into();
        assert_eq!(error.to_string(), "NO_RESOURCES");
        assert_eq!(error.error_code(), codes::factory::ORB_REJECTED_POLICY);
    }
}
