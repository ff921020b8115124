//! PoaUtility errors

use super::deployment::VendorProfile;
use crate::config::compile_time::poa::{MAX_HELPER_POAS, MAX_POA_PATH_DEPTH};
use crate::factory::RegistrationError;
use crate::logging::{codes, Code};
use crate::orb::OrbError;
use crate::syntax::ParseError;

/// Why a policy list, POA or POA manager could not be built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CreationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Orb(#[from] OrbError),
}

impl CreationError {
    pub fn error_code(&self) -> Code {
        match self {
            CreationError::Parse(error) => error.error_code(),
            CreationError::Orb(error) => error.error_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoaUtilityError {
    #[error("Invalid DeploymentModel '{value}'")]
    InvalidDeploymentModel { value: String },

    #[error("Invalid VendorProfile '{value}'")]
    InvalidVendorProfile { value: String },

    #[error("resolve_initial_references(\"RootPOA\") failed: {source}")]
    RootPoaUnavailable {
        #[source]
        source: OrbError,
    },

    #[error("resolve_initial_references(\"POAManagerFactory\") failed: {source}")]
    ManagerFactoryUnavailable {
        #[source]
        source: OrbError,
    },

    #[error("Error occurred when installing the {vendor} predefined policies: {source}")]
    VendorExtensions {
        vendor: VendorProfile,
        #[source]
        source: RegistrationError,
    },

    #[error(
        "Error occurred when creating POA \"{poa_path}\": InvalidPolicy \
         (index {index} in \"{policy_list}\")"
    )]
    InvalidPolicy {
        poa_path: String,
        index: usize,
        policy_list: String,
    },

    #[error("Error occurred when creating POA '{poa_path}': {source}")]
    PoaCreation {
        poa_path: String,
        #[source]
        source: CreationError,
    },

    #[error("Error occurred when creating POA Manager '{label}': {source}")]
    ManagerCreation {
        label: String,
        #[source]
        source: CreationError,
    },

    #[error("POA hierarchy below '{local_name}' is deeper than {MAX_POA_PATH_DEPTH} levels")]
    PathTooDeep { local_name: String },

    #[error("Error occurred when creating POA Manager '{label}': more than {MAX_HELPER_POAS} helper POAs")]
    HelperLimit { label: String },
}

impl PoaUtilityError {
    pub fn error_code(&self) -> Code {
        match self {
            PoaUtilityError::InvalidDeploymentModel { .. } => codes::poa::INVALID_DEPLOYMENT_MODEL,
            PoaUtilityError::InvalidVendorProfile { .. } => codes::poa::INVALID_VENDOR_PROFILE,
            PoaUtilityError::RootPoaUnavailable { .. } => codes::factory::ROOT_POA_UNAVAILABLE,
            PoaUtilityError::ManagerFactoryUnavailable { .. } => {
                codes::poa::MANAGER_FACTORY_UNAVAILABLE
            }
            PoaUtilityError::VendorExtensions { source, .. } => source.error_code(),
            PoaUtilityError::InvalidPolicy { .. } => codes::poa::POA_INVALID_POLICY,
            PoaUtilityError::PoaCreation { .. } => codes::poa::POA_CREATION_FAILED,
            PoaUtilityError::ManagerCreation { .. } => codes::poa::MANAGER_CREATION_FAILED,
            PoaUtilityError::PathTooDeep { .. } => codes::poa::PATH_TOO_DEEP,
            PoaUtilityError::HelperLimit { .. } => codes::poa::HELPER_LIMIT_REACHED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_policy_message() {
        let error = PoaUtilityError::InvalidPolicy {
            poa_path: "Bank/Accounts".to_string(),
            index: 1,
            policy_list: "persistent transient".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Error occurred when creating POA \"Bank/Accounts\": InvalidPolicy \
             (index 1 in \"persistent transient\")"
        );
        assert_eq!(error.error_code(), codes::poa::POA_INVALID_POLICY);
    }

    #[test]
    fn test_wrapped_messages() {
        let error = PoaUtilityError::PoaCreation {
            poa_path: "Bank".to_string(),
            source: OrbError::AdapterAlreadyExists {
                name: "Bank".to_string(),
            }
            .into(),
        };
        assert_eq!(
            error.to_string(),
            "Error occurred when creating POA 'Bank': AdapterAlreadyExists: POA 'Bank' already exists"
        );

        let error = PoaUtilityError::ManagerCreation {
            label: "core".to_string(),
            source: OrbError::system("NO_RESOURCES").into(),
        };
        assert_eq!(
            error.to_string(),
            "Error occurred when creating POA Manager 'core': NO_RESOURCES"
        );
    }
}
