// Internal modules
#[macro_use]
pub mod logging;
pub mod config;
pub mod factory;
pub mod lexical;
pub mod orb;
pub mod poa;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use factory::{
    default_policy_factory, ExtendablePolicyFactory, PolicyError, PolicyFactory,
    RegistrationError,
};
pub use orb::{Orb, OrbError, Poa, PoaManager, Policy, PolicyHandle, PolicyType, PolicyValue};
pub use poa::{DeploymentModel, LabelledPoaManager, PoaUtility, PoaUtilityError, VendorProfile};
pub use syntax::{
    parse_clauses, parse_policy_list, NameValue, ParseError, ParsedPolicy, PolicyListParser,
};
