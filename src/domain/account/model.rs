//! User account domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::shared::money::Money;

/// User account with a prepaid wallet.
///
/// `wallet_balance` never goes negative; every change to it is paired with
/// exactly one ledger entry of equal signed magnitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// Unique user ID
    pub id: i64,
    /// Login identifier, unique
    pub login_id: String,
    pub display_name: String,
    /// E-mail address, unique
    pub email: String,
    pub phone: Option<String>,
    pub vehicle_number: Option<String>,
    pub wallet_balance: Money,
    /// bcrypt hash of the registration password
    #[serde(skip_serializing)]
    pub credential_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registration input, validated before the credential is hashed.
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct RegisterAccount {
    #[validate(length(min = 3, max = 100))]
    pub login_id: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 20))]
    pub vehicle_number: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Insertion record: validated registration with the credential hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub login_id: String,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub vehicle_number: Option<String>,
    pub credential_hash: String,
    pub wallet_balance: Money,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registration() -> RegisterAccount {
        RegisterAccount {
            login_id: "john_doe".into(),
            display_name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: Some("1234567890".into()),
            vehicle_number: Some("ABC-1234".into()),
            password: "secure_password_123".into(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(sample_registration().validate().is_ok());
    }

    #[test]
    fn bad_email_is_rejected() {
        let mut input = sample_registration();
        input.email = "not-an-email".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut input = sample_registration();
        input.password = "short".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn short_login_is_rejected() {
        let mut input = sample_registration();
        input.login_id = "ab".into();
        assert!(input.validate().is_err());
    }
}
