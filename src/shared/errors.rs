use thiserror::Error;

use super::money::Money;

/// Domain-level error types.
///
/// Every variant is an ordinary result value for its operation: business
/// outcomes such as an unavailable slot or an exhausted wallet are returned,
/// never panicked. `Display` carries the human-readable message and
/// [`DomainError::kind`] the stable machine kind, together forming the
/// (kind, message) pairs of the external call contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("duration must be between 1 and 4 hours")]
    InvalidDuration,

    #[error("user {0} already has an active reservation")]
    DuplicateActive(i64),

    #[error("user {0} already booked a slot today")]
    DuplicateDaily(i64),

    #[error("slot not available")]
    SlotUnavailable,

    #[error("insufficient balance: {required} required, {available} available")]
    InsufficientBalance { required: Money, available: Money },

    /// The conditional commit lost a race: state changed between the
    /// validation reads and the atomic write. The whole operation rolled
    /// back and may be retried from scratch.
    #[error("concurrent conflict: {0}")]
    ConcurrentConflict(String),

    #[error("amount must be a positive value")]
    InvalidAmount,

    #[error("not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("validation: {0}")]
    Validation(String),

    #[error("already exists: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable machine-readable kind for the external call surface.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDuration => "invalid_duration",
            Self::DuplicateActive(_) => "duplicate_active",
            Self::DuplicateDaily(_) => "duplicate_daily",
            Self::SlotUnavailable => "slot_unavailable",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::ConcurrentConflict(_) => "concurrent_conflict",
            Self::InvalidAmount => "invalid_amount",
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Storage(_) | Self::Internal(_) => "internal",
        }
    }

    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_are_stable() {
        assert_eq!(DomainError::InvalidDuration.kind(), "invalid_duration");
        assert_eq!(DomainError::DuplicateActive(1).kind(), "duplicate_active");
        assert_eq!(DomainError::SlotUnavailable.kind(), "slot_unavailable");
        assert_eq!(
            DomainError::ConcurrentConflict("x".into()).kind(),
            "concurrent_conflict"
        );
        assert_eq!(
            DomainError::not_found("slot", "slot_id", 7).kind(),
            "not_found"
        );
        assert_eq!(DomainError::Storage("db".into()).kind(), "internal");
    }

    #[test]
    fn insufficient_balance_reports_both_amounts() {
        let err = DomainError::InsufficientBalance {
            required: Money::from_cents(20000),
            available: Money::from_cents(18000),
        };
        let msg = err.to_string();
        assert!(msg.contains("200.00"));
        assert!(msg.contains("180.00"));
    }

    #[test]
    fn duration_message_matches_contract() {
        assert_eq!(
            DomainError::InvalidDuration.to_string(),
            "duration must be between 1 and 4 hours"
        );
    }
}
