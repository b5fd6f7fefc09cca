//! Wallet ledger and payment records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::money::Money;

/// Ledger entry kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Credit,
    Debit,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    pub(crate) fn from_stored(s: &str) -> Self {
        match s {
            "credit" => Self::Credit,
            _ => Self::Debit,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Append-only record of one wallet balance change.
///
/// `amount` is signed: credits positive, debits negative, so that the sum of
/// a user's entries always equals the balance delta since registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: i64,
    pub amount: Money,
    pub kind: EntryKind,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// A credit entry; `amount` is the positive magnitude.
    pub fn credit(
        id: i64,
        user_id: i64,
        amount: Money,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            kind: EntryKind::Credit,
            description: description.into(),
            created_at,
        }
    }

    /// A debit entry; `amount` is the positive magnitude, stored negated.
    pub fn debit(
        id: i64,
        user_id: i64,
        amount: Money,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            amount: -amount,
            kind: EntryKind::Debit,
            description: description.into(),
            created_at,
        }
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Internal wallet debit
    Wallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
        }
    }

    pub(crate) fn from_stored(_s: &str) -> Self {
        Self::Wallet
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub(crate) fn from_stored(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            _ => Self::Failed,
        }
    }
}

/// One payment per successful reservation; immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: i64,
    pub reservation_id: i64,
    pub user_id: i64,
    pub amount: Money,
    pub method: PaymentMethod,
    /// Generated reference, unique per reservation
    pub transaction_ref: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_entry_stores_negative_amount() {
        let entry = LedgerEntry::debit(1, 10, Money::from_major(100), "reservation charge", Utc::now());
        assert_eq!(entry.kind, EntryKind::Debit);
        assert_eq!(entry.amount, Money::from_cents(-10000));
    }

    #[test]
    fn credit_entry_stores_positive_amount() {
        let entry = LedgerEntry::credit(1, 10, Money::from_major(50), "top-up", Utc::now());
        assert_eq!(entry.kind, EntryKind::Credit);
        assert_eq!(entry.amount, Money::from_cents(5000));
    }

    #[test]
    fn paired_entries_sum_to_balance_delta() {
        let now = Utc::now();
        let entries = [
            LedgerEntry::credit(1, 10, Money::from_major(300), "top-up", now),
            LedgerEntry::debit(2, 10, Money::from_major(100), "reservation charge", now),
        ];
        let sum: Money = entries.iter().map(|e| e.amount).sum();
        assert_eq!(sum, Money::from_major(200));
    }

    #[test]
    fn entry_kind_roundtrip() {
        assert_eq!(EntryKind::from_stored("credit"), EntryKind::Credit);
        assert_eq!(EntryKind::from_stored("debit"), EntryKind::Debit);
        assert_eq!(PaymentStatus::from_stored("completed"), PaymentStatus::Completed);
    }
}
