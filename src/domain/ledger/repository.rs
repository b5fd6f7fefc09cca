//! Ledger repository interface
//!
//! Entries are appended by the account store and the unit of work; this
//! trait is the read side used for audit listings and revenue reporting.

use async_trait::async_trait;

use super::model::{LedgerEntry, Payment};
use crate::domain::DomainResult;

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Most recent ledger entries, newest first.
    async fn recent(&self, limit: u64) -> DomainResult<Vec<LedgerEntry>>;

    async fn find_for_user(&self, user_id: i64) -> DomainResult<Vec<LedgerEntry>>;

    async fn list_payments(&self) -> DomainResult<Vec<Payment>>;

    async fn find_payment_for_reservation(
        &self,
        reservation_id: i64,
    ) -> DomainResult<Option<Payment>>;
}
