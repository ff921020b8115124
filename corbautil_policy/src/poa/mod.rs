//! POA construction helpers

pub mod deployment;
pub mod error;
pub mod utility;

pub use deployment::{string_to_deployment_model, DeploymentModel, VendorProfile};
pub use error::{CreationError, PoaUtilityError};
pub use utility::{LabelledPoaManager, PoaUtility};
