//! Deployment models and vendor profiles

use super::PoaUtilityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a server is deployed: random or fixed ports, with or without an
/// implementation repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentModel {
    RandomPortsNoImr,
    RandomPortsWithImr,
    FixedPortsNoImr,
    FixedPortsWithImr,
}

impl DeploymentModel {
    pub const ALL: [DeploymentModel; 4] = [
        DeploymentModel::RandomPortsNoImr,
        DeploymentModel::RandomPortsWithImr,
        DeploymentModel::FixedPortsNoImr,
        DeploymentModel::FixedPortsWithImr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentModel::RandomPortsNoImr => "RANDOM_PORTS_NO_IMR",
            DeploymentModel::RandomPortsWithImr => "RANDOM_PORTS_WITH_IMR",
            DeploymentModel::FixedPortsNoImr => "FIXED_PORTS_NO_IMR",
            DeploymentModel::FixedPortsWithImr => "FIXED_PORTS_WITH_IMR",
        }
    }

    pub fn uses_fixed_ports(&self) -> bool {
        matches!(
            self,
            DeploymentModel::FixedPortsNoImr | DeploymentModel::FixedPortsWithImr
        )
    }

    pub fn uses_imr(&self) -> bool {
        matches!(
            self,
            DeploymentModel::RandomPortsWithImr | DeploymentModel::FixedPortsWithImr
        )
    }
}

impl fmt::Display for DeploymentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentModel {
    type Err = PoaUtilityError;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|model| model.as_str() == upper)
            .ok_or_else(|| PoaUtilityError::InvalidDeploymentModel {
                value: s.to_string(),
            })
    }
}

/// `DeploymentModel::from_str` under its traditional name
pub fn string_to_deployment_model(s: &str) -> Result<DeploymentModel, PoaUtilityError> {
    s.parse()
}

/// Which ORB vendor's proprietary behavior to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorProfile {
    #[default]
    Portable,
    Orbix,
    Orbacus,
}

impl VendorProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorProfile::Portable => "portable",
            VendorProfile::Orbix => "orbix",
            VendorProfile::Orbacus => "orbacus",
        }
    }

    /// Orbix keeps policy objects alive after POA creation
    pub fn leaks_policies(&self) -> bool {
        matches!(self, VendorProfile::Orbix)
    }

    /// Whether deployment-model policies are appended to every policy list
    pub fn injects_policies(&self) -> bool {
        matches!(self, VendorProfile::Orbix)
    }

    /// Fixed-port POA managers come from the ORB's labelled manager factory
    pub fn uses_manager_factory(&self, model: DeploymentModel) -> bool {
        matches!(self, VendorProfile::Orbacus) && model.uses_fixed_ports()
    }
}

impl fmt::Display for VendorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorProfile {
    type Err = PoaUtilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portable" => Ok(VendorProfile::Portable),
            "orbix" => Ok(VendorProfile::Orbix),
            "orbacus" => Ok(VendorProfile::Orbacus),
            _ => Err(PoaUtilityError::InvalidVendorProfile {
                value: s.to_string(),
            }),
        }
    }
}
