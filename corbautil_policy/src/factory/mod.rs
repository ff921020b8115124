//! Policy factories
//!
//! A [`PolicyFactory`] turns one parsed policy (a name and its parameters)
//! into an ORB policy object. [`ExtendablePolicyFactory`] handles the
//! predefined names and dispatches everything else to registered factories.

pub mod convert;
pub mod error;
pub mod predefined;
pub mod registry;

pub use convert::{root_poa, string_to_boolean, string_to_float, string_to_long};
pub use error::{PolicyError, RegistrationError};
pub use registry::{default_policy_factory, ExtendablePolicyFactory};

use crate::orb::{Orb, PolicyHandle};
use crate::syntax::NameValue;

/// Creates a policy object from a policy name and its parameters
pub trait PolicyFactory: Send + Sync {
    fn create(
        &self,
        orb: &dyn Orb,
        name: &str,
        params: &[NameValue],
    ) -> Result<PolicyHandle, PolicyError>;
}

impl<F> PolicyFactory for F
where
    F: Fn(&dyn Orb, &str, &[NameValue]) -> Result<PolicyHandle, PolicyError> + Send + Sync,
{
    fn create(
        &self,
        orb: &dyn Orb,
        name: &str,
        params: &[NameValue],
    ) -> Result<PolicyHandle, PolicyError> {
        self(orb, name, params)
    }
}
