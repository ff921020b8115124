//! Parameter conversion helpers for policy factories

use super::PolicyError;
use crate::orb::{Orb, Poa};
use std::sync::Arc;

/// Accepts exactly `true` or `false`
pub fn string_to_boolean(value: &str) -> Result<bool, PolicyError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(PolicyError::IllegalBoolean {
            value: value.to_string(),
        }),
    }
}

/// Whole-string decimal `i32`
pub fn string_to_long(value: &str) -> Result<i32, PolicyError> {
    value.parse().map_err(|_| PolicyError::IllegalInteger {
        value: value.to_string(),
    })
}

/// Whole-string `f32`
pub fn string_to_float(value: &str) -> Result<f32, PolicyError> {
    value.parse().map_err(|_| PolicyError::IllegalFloat {
        value: value.to_string(),
    })
}

pub fn root_poa(orb: &dyn Orb) -> Result<Arc<dyn Poa>, PolicyError> {
    orb.resolve_root_poa()
        .map_err(|source| PolicyError::RootPoaUnavailable { source })
}
