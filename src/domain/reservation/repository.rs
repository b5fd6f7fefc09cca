//! Reservation repository interface
//!
//! Read-side queries only: every reservation mutation flows through the
//! unit of work so it commits atomically with its slot, wallet, ledger and
//! stats effects.

use async_trait::async_trait;

use super::model::Reservation;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn find_by_id(&self, reservation_id: i64) -> DomainResult<Option<Reservation>>;

    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    /// A user's reservation history, newest first.
    async fn find_for_user(&self, user_id: i64) -> DomainResult<Vec<Reservation>>;

    async fn find_active(&self) -> DomainResult<Vec<Reservation>>;

    async fn find_active_for_user(&self, user_id: i64) -> DomainResult<Option<Reservation>>;

    async fn find_active_for_slot(&self, slot_id: i64) -> DomainResult<Option<Reservation>>;
}
