/// Central error taxonomy for the booking and wallet engine.
///
/// Business-rule errors carry enough structured context for a precise
/// client-facing message (e.g. the remaining seat count); internal failures
/// are wrapped in [`DomainError::Dependency`] and logged server-side.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Package unavailable")]
    PackageUnavailable,

    #[error("Only {remaining} spots left")]
    CapacityExceeded { remaining: i32 },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Booking is already Confirmed")]
    AlreadyConfirmed,

    #[error("Dependency failure: {0}")]
    Dependency(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DomainError {
    /// Stable machine-readable code, part of the API contract.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::InvalidInput(_) => "INVALID_INPUT",
            DomainError::PackageUnavailable => "PACKAGE_UNAVAILABLE",
            DomainError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            DomainError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            DomainError::AlreadyConfirmed => "ALREADY_CONFIRMED",
            DomainError::Dependency(_) => "DEPENDENCY_FAILURE",
        }
    }

    pub fn dependency<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        DomainError::Dependency(Box::new(err))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_exceeded_message_carries_remaining() {
        let err = DomainError::CapacityExceeded { remaining: 3 };
        assert_eq!(err.to_string(), "Only 3 spots left");
        assert_eq!(err.code(), "CAPACITY_EXCEEDED");
    }
}
