//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `UnitOfWork` — the atomic multi-aggregate operations of the
//!   reservation lifecycle
//! - `DomainResult` — standard result type for domain operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::account::AccountRepository;
use super::analytics::UtilizationRepository;
use super::ledger::{LedgerRepository, Payment};
use super::reservation::{Reservation, ReservationRepository};
use super::slot::SlotRepository;
use crate::shared::errors::DomainError;
use crate::shared::money::Money;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let slot = repos.slots().find_by_id(7).await?;
///     let held = repos.reservations().find_active_for_slot(7).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn slots(&self) -> &dyn SlotRepository;
    fn accounts(&self) -> &dyn AccountRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn ledger(&self) -> &dyn LedgerRepository;
    fn stats(&self) -> &dyn UtilizationRepository;
    fn unit_of_work(&self) -> &dyn UnitOfWork;
}

// ── UnitOfWork ──────────────────────────────────────────────────

/// The mutations a successful reservation commits together.
///
/// Built by the engine after its validation pass; the store re-checks the
/// slot claim and the wallet debit conditionally at commit time.
#[derive(Debug, Clone)]
pub struct ReservationDraft {
    pub user_id: i64,
    pub slot_id: i64,
    pub duration_hours: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_amount: Money,
    /// Payment reference, unique per reservation
    pub transaction_ref: String,
}

/// Everything a committed reservation produced.
#[derive(Debug, Clone)]
pub struct CommittedReservation {
    pub reservation: Reservation,
    pub payment: Payment,
    pub new_balance: Money,
}

/// Atomic multi-aggregate operations.
///
/// Each method is all-or-nothing: either every listed effect is visible to
/// other callers, or none is. Backends realize this as a database
/// transaction or an equivalent single critical section.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Commit a reservation: claim the slot (conditional), debit the wallet
    /// (conditional, never below zero), insert the reservation, the debit
    /// ledger entry and the payment, and bump the utilization bucket.
    ///
    /// A failed conditional claim or debit aborts the whole commit with
    /// `ConcurrentConflict` and leaves no partial state behind.
    async fn commit_reservation(
        &self,
        draft: ReservationDraft,
    ) -> DomainResult<CommittedReservation>;

    /// Complete an active reservation at `ended_at` and free its slot.
    /// Returns `Ok(false)` without mutating anything when the reservation
    /// exists but is no longer active; unknown ids are `NotFound`.
    async fn complete_reservation(
        &self,
        reservation_id: i64,
        ended_at: DateTime<Utc>,
    ) -> DomainResult<bool>;

    /// Complete every active reservation whose window has elapsed at `now`
    /// and free the slots. No refunds; idempotent. Returns the count.
    async fn release_expired(&self, now: DateTime<Utc>) -> DomainResult<u64>;

    /// Administrative account deletion: cancel the account's active
    /// reservations (freeing their slots), purge its payments and ledger
    /// entries, then remove the account. Reservation history survives.
    /// Returns false when the account does not exist.
    async fn purge_account(&self, user_id: i64) -> DomainResult<bool>;

    /// Administrative bulk reset: clears reservations, payments, ledger
    /// entries and utilization stats and re-frees every slot. Accounts and
    /// balances survive as the new ledger baseline.
    async fn reset_history(&self) -> DomainResult<()>;
}
