//! ORB collaborator interfaces
//!
//! The policy machinery never talks to a concrete ORB. It reaches the root
//! POA, creates policies and builds child POAs through these traits, so any
//! vendor binding (or the in-memory implementation in [`memory`]) can sit
//! behind them.

pub mod memory;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::logging::{codes, Code};

/// Numeric CORBA policy type id
pub type PolicyType = u32;

/// Policy type ids understood by the policy factories
pub mod policy_type {
    use super::PolicyType;

    pub const THREAD: PolicyType = 16;
    pub const LIFESPAN: PolicyType = 17;
    pub const ID_UNIQUENESS: PolicyType = 18;
    pub const ID_ASSIGNMENT: PolicyType = 19;
    pub const IMPLICIT_ACTIVATION: PolicyType = 20;
    pub const SERVANT_RETENTION: PolicyType = 21;
    pub const REQUEST_PROCESSING: PolicyType = 22;

    /// Base of the IONA vendor policy id range
    pub const IONA_VPVID: PolicyType = 0x4954_5F00;

    pub const ORBIX_PERSISTENCE_MODE: PolicyType = IONA_VPVID | 0x0A;
    pub const ORBIX_WELL_KNOWN_ADDRESSING: PolicyType = IONA_VPVID | 0x0B;
    pub const ORBIX_OBJECT_DEACTIVATION: PolicyType = IONA_VPVID | 0x0C;
    pub const ORBIX_LEASING: PolicyType = IONA_VPVID | 0x31;

    /// Human-readable name of a policy type id
    pub fn name(policy_type: PolicyType) -> &'static str {
        match policy_type {
            THREAD => "ThreadPolicy",
            LIFESPAN => "LifespanPolicy",
            ID_UNIQUENESS => "IdUniquenessPolicy",
            ID_ASSIGNMENT => "IdAssignmentPolicy",
            IMPLICIT_ACTIVATION => "ImplicitActivationPolicy",
            SERVANT_RETENTION => "ServantRetentionPolicy",
            REQUEST_PROCESSING => "RequestProcessingPolicy",
            ORBIX_PERSISTENCE_MODE => "IT_PortableServer::PersistenceModePolicy",
            ORBIX_WELL_KNOWN_ADDRESSING => "IT_CORBA::WellKnownAddressingPolicy",
            ORBIX_OBJECT_DEACTIVATION => "IT_PortableServer::ObjectDeactivationPolicy",
            ORBIX_LEASING => "IT_Leasing::LeasingPolicy",
            _ => "UnknownPolicy",
        }
    }
}

/// Enumerant values of the Orbix proprietary policies
pub mod orbix {
    pub const DELIVER: u32 = 0;
    pub const DISCARD: u32 = 1;
    pub const HOLD: u32 = 2;

    pub const DIRECT_PERSISTENCE: u32 = 0;
    pub const INDIRECT_PERSISTENCE: u32 = 1;
}

/// The value carried inside a policy, standing in for a CORBA `any`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PolicyValue {
    Bool(bool),
    Long(i32),
    ULong(u32),
    Float(f32),
    Text(String),
    Enumerant(u32),
}

impl fmt::Display for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyValue::Bool(v) => write!(f, "{}", v),
            PolicyValue::Long(v) => write!(f, "{}", v),
            PolicyValue::ULong(v) => write!(f, "{}", v),
            PolicyValue::Float(v) => write!(f, "{}", v),
            PolicyValue::Text(v) => write!(f, "\"{}\"", v),
            PolicyValue::Enumerant(v) => write!(f, "#{}", v),
        }
    }
}

/// The fifteen portable POA policy values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardPolicy {
    OrbCtrlModel,
    SingleThreadModel,
    Transient,
    Persistent,
    UniqueId,
    MultipleId,
    UserId,
    SystemId,
    ImplicitActivation,
    NoImplicitActivation,
    Retain,
    NonRetain,
    UseActiveObjectMapOnly,
    UseDefaultServant,
    UseServantManager,
}

impl StandardPolicy {
    pub const ALL: [StandardPolicy; 15] = [
        StandardPolicy::OrbCtrlModel,
        StandardPolicy::SingleThreadModel,
        StandardPolicy::Transient,
        StandardPolicy::Persistent,
        StandardPolicy::UniqueId,
        StandardPolicy::MultipleId,
        StandardPolicy::UserId,
        StandardPolicy::SystemId,
        StandardPolicy::ImplicitActivation,
        StandardPolicy::NoImplicitActivation,
        StandardPolicy::Retain,
        StandardPolicy::NonRetain,
        StandardPolicy::UseActiveObjectMapOnly,
        StandardPolicy::UseDefaultServant,
        StandardPolicy::UseServantManager,
    ];

    /// The name used for this value in a policy list
    pub fn name(&self) -> &'static str {
        match self {
            StandardPolicy::OrbCtrlModel => "orb_ctrl_model",
            StandardPolicy::SingleThreadModel => "single_thread_model",
            StandardPolicy::Transient => "transient",
            StandardPolicy::Persistent => "persistent",
            StandardPolicy::UniqueId => "unique_id",
            StandardPolicy::MultipleId => "multiple_id",
            StandardPolicy::UserId => "user_id",
            StandardPolicy::SystemId => "system_id",
            StandardPolicy::ImplicitActivation => "implicit_activation",
            StandardPolicy::NoImplicitActivation => "no_implicit_activation",
            StandardPolicy::Retain => "retain",
            StandardPolicy::NonRetain => "non_retain",
            StandardPolicy::UseActiveObjectMapOnly => "use_active_object_map_only",
            StandardPolicy::UseDefaultServant => "use_default_servant",
            StandardPolicy::UseServantManager => "use_servant_manager",
        }
    }

    pub fn policy_type(&self) -> PolicyType {
        match self {
            StandardPolicy::OrbCtrlModel | StandardPolicy::SingleThreadModel => {
                policy_type::THREAD
            }
            StandardPolicy::Transient | StandardPolicy::Persistent => policy_type::LIFESPAN,
            StandardPolicy::UniqueId | StandardPolicy::MultipleId => policy_type::ID_UNIQUENESS,
            StandardPolicy::UserId | StandardPolicy::SystemId => policy_type::ID_ASSIGNMENT,
            StandardPolicy::ImplicitActivation | StandardPolicy::NoImplicitActivation => {
                policy_type::IMPLICIT_ACTIVATION
            }
            StandardPolicy::Retain | StandardPolicy::NonRetain => policy_type::SERVANT_RETENTION,
            StandardPolicy::UseActiveObjectMapOnly
            | StandardPolicy::UseDefaultServant
            | StandardPolicy::UseServantManager => policy_type::REQUEST_PROCESSING,
        }
    }

    /// CORBA enumerant within the policy type
    pub fn enumerant(&self) -> u32 {
        match self {
            StandardPolicy::OrbCtrlModel
            | StandardPolicy::Transient
            | StandardPolicy::UniqueId
            | StandardPolicy::UserId
            | StandardPolicy::ImplicitActivation
            | StandardPolicy::Retain
            | StandardPolicy::UseActiveObjectMapOnly => 0,
            StandardPolicy::SingleThreadModel
            | StandardPolicy::Persistent
            | StandardPolicy::MultipleId
            | StandardPolicy::SystemId
            | StandardPolicy::NoImplicitActivation
            | StandardPolicy::NonRetain
            | StandardPolicy::UseDefaultServant => 1,
            StandardPolicy::UseServantManager => 2,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }
}

/// Errors raised by ORB collaborators
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrbError {
    #[error("InvalidPolicy (index {index})")]
    InvalidPolicy { index: usize },

    #[error("AdapterAlreadyExists: POA '{name}' already exists")]
    AdapterAlreadyExists { name: String },

    #[error("InvalidName: no initial reference for '{id}'")]
    InitialReferenceNotFound { id: String },

    #[error("PolicyError: BAD_POLICY_VALUE for {}", policy_type::name(*.policy_type))]
    BadPolicyValue { policy_type: PolicyType },

    #[error("PolicyError: UNSUPPORTED_POLICY {}", policy_type::name(*.policy_type))]
    UnsupportedPolicy { policy_type: PolicyType },

    #[error("{message}")]
    System { message: String },
}

impl OrbError {
    pub fn system(message: &str) -> Self {
        Self::System {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            OrbError::InvalidPolicy { .. } => codes::orb::INVALID_POLICY,
            OrbError::AdapterAlreadyExists { .. } => codes::orb::ADAPTER_ALREADY_EXISTS,
            OrbError::InitialReferenceNotFound { .. } => codes::orb::INITIAL_REFERENCE_NOT_FOUND,
            OrbError::BadPolicyValue { .. } => codes::orb::BAD_POLICY_VALUE,
            OrbError::UnsupportedPolicy { .. } => codes::orb::UNSUPPORTED_POLICY,
            OrbError::System { .. } => codes::orb::SYSTEM_EXCEPTION,
        }
    }
}

/// An ORB policy object
pub trait Policy: Send + Sync + fmt::Debug {
    fn policy_type(&self) -> PolicyType;

    fn value(&self) -> PolicyValue;

    /// Release the policy; further use by a POA is invalid
    fn destroy(&self);

    /// Whether `destroy` has been called, for bindings that track it
    fn is_destroyed(&self) -> bool {
        false
    }
}

/// Shared handle to a policy object
pub type PolicyHandle = Arc<dyn Policy>;

/// A POA manager
pub trait PoaManager: Send + Sync {
    fn id(&self) -> u64;
}

/// Vendor factory for POA managers that carry a label (e.g. for fixed ports)
pub trait PoaManagerFactory: Send + Sync {
    fn create_poa_manager(&self, label: &str) -> Result<Arc<dyn PoaManager>, OrbError>;
}

/// A portable object adapter
pub trait Poa: Send + Sync {
    /// Identity used by [`Poa::is_same`]
    fn id(&self) -> u64;

    /// Local name, not the full path
    fn name(&self) -> String;

    /// `None` for the root POA
    fn parent(&self) -> Option<Arc<dyn Poa>>;

    fn is_same(&self, other: &dyn Poa) -> bool {
        self.id() == other.id()
    }

    fn the_poa_manager(&self) -> Arc<dyn PoaManager>;

    fn create_policy(&self, policy: StandardPolicy) -> Result<PolicyHandle, OrbError>;

    /// Create a child POA. A `None` manager asks the ORB for a fresh one.
    fn create_child(
        &self,
        name: &str,
        manager: Option<Arc<dyn PoaManager>>,
        policies: &[PolicyHandle],
    ) -> Result<Arc<dyn Poa>, OrbError>;
}

/// The ORB itself, as seen by the policy machinery
pub trait Orb: Send + Sync {
    /// `resolve_initial_references("RootPOA")`
    fn resolve_root_poa(&self) -> Result<Arc<dyn Poa>, OrbError>;

    /// `ORB::create_policy(type, any)`
    fn create_policy(
        &self,
        policy_type: PolicyType,
        value: PolicyValue,
    ) -> Result<PolicyHandle, OrbError>;

    /// Vendor POA manager factory, when the ORB offers one
    fn poa_manager_factory(&self) -> Option<Arc<dyn PoaManagerFactory>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_policy_names_round_trip() {
        for policy in StandardPolicy::ALL {
            assert_eq!(StandardPolicy::from_name(policy.name()), Some(policy));
        }
        assert_eq!(StandardPolicy::from_name("orbix.hold"), None);
    }

    #[test]
    fn test_standard_policy_ids() {
        assert_eq!(StandardPolicy::Persistent.policy_type(), 17);
        assert_eq!(StandardPolicy::Persistent.enumerant(), 1);
        assert_eq!(StandardPolicy::UseServantManager.policy_type(), 22);
        assert_eq!(StandardPolicy::UseServantManager.enumerant(), 2);
        assert_eq!(
            policy_type::name(StandardPolicy::UserId.policy_type()),
            "IdAssignmentPolicy"
        );
    }

    #[test]
    fn test_orb_error_messages() {
        assert_eq!(
            OrbError::InvalidPolicy { index: 2 }.to_string(),
            "InvalidPolicy (index 2)"
        );
        assert_eq!(
            OrbError::UnsupportedPolicy {
                policy_type: policy_type::ORBIX_LEASING
            }
            .to_string(),
            "PolicyError: UNSUPPORTED_POLICY IT_Leasing::LeasingPolicy"
        );
        assert_eq!(
            OrbError::system("TRANSIENT").error_code(),
            codes::orb::SYSTEM_EXCEPTION
        );
    }

    #[test]
    fn test_policy_value_display() {
        assert_eq!(PolicyValue::Bool(false).to_string(), "false");
        assert_eq!(PolicyValue::Text("acme".into()).to_string(), "\"acme\"");
        assert_eq!(PolicyValue::Enumerant(2).to_string(), "#2");
    }
}
