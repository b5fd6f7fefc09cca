//! Slot repository interface

use async_trait::async_trait;

use super::model::{NewSlot, Slot, SlotFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Provision a new slot; duplicate slot numbers are a conflict.
    async fn insert(&self, slot: NewSlot) -> DomainResult<Slot>;

    async fn find_by_id(&self, slot_id: i64) -> DomainResult<Option<Slot>>;

    async fn list_all(&self) -> DomainResult<Vec<Slot>>;

    /// Available slots matching the filter, sorted by
    /// (price asc, floor asc, number asc).
    async fn search(&self, filter: &SlotFilter) -> DomainResult<Vec<Slot>>;

    async fn set_available(&self, slot_id: i64, available: bool) -> DomainResult<()>;
}
