use thiserror::Error;

/// Errors raised while constructing a synchronization policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GspError {
    #[error("Bounded producer-consumer capacity must be at least 1")]
    ZeroCapacity,
}

impl GspError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroCapacity => "G001",
        }
    }
}
