//! Slot inventory service

use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::domain::{
    AvailabilitySummary, DomainError, DomainResult, NewSlot, RepositoryProvider, Slot, SlotFilter,
};

pub struct InventoryService {
    repos: Arc<dyn RepositoryProvider>,
}

impl InventoryService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Provision a new slot.
    pub async fn add_slot(&self, slot: NewSlot) -> DomainResult<Slot> {
        slot.validate()?;
        let stored = self.repos.slots().insert(slot).await?;
        info!("Slot {} added (id {})", stored.number, stored.id);
        Ok(stored)
    }

    pub async fn get_slot(&self, slot_id: i64) -> DomainResult<Slot> {
        self.repos.unit_of_work().release_expired(Utc::now()).await?;
        self.repos
            .slots()
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| DomainError::not_found("slot", "slot_id", slot_id))
    }

    pub async fn list_slots(&self) -> DomainResult<Vec<Slot>> {
        self.repos.unit_of_work().release_expired(Utc::now()).await?;
        self.repos.slots().list_all().await
    }

    /// Available slots matching the filter, cheapest first.
    pub async fn search_slots(&self, filter: &SlotFilter) -> DomainResult<Vec<Slot>> {
        self.repos.unit_of_work().release_expired(Utc::now()).await?;
        self.repos.slots().search(filter).await
    }

    pub async fn availability_summary(&self) -> DomainResult<AvailabilitySummary> {
        self.repos.unit_of_work().release_expired(Utc::now()).await?;
        let slots = self.repos.slots().list_all().await?;
        Ok(AvailabilitySummary::from_slots(&slots))
    }

    /// Administrative availability override.
    pub async fn set_available(&self, slot_id: i64, available: bool) -> DomainResult<()> {
        self.repos.slots().set_available(slot_id, available).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, SlotType};
    use crate::infrastructure::storage::InMemoryStore;

    fn new_slot(number: &str, floor: i32, zone: &str, ty: SlotType, price_major: i64) -> NewSlot {
        NewSlot {
            number: number.into(),
            floor,
            zone: zone.into(),
            slot_type: ty,
            price_per_hour: Money::from_major(price_major),
        }
    }

    async fn setup() -> InventoryService {
        InventoryService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn add_and_fetch_slot() {
        let inventory = setup().await;
        let slot = inventory
            .add_slot(new_slot("A-101", 1, "Zone A", SlotType::Regular, 5))
            .await
            .unwrap();
        let fetched = inventory.get_slot(slot.id).await.unwrap();
        assert_eq!(fetched.number, "A-101");
        assert!(fetched.is_available);

        let err = inventory.get_slot(999).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn duplicate_number_is_rejected() {
        let inventory = setup().await;
        inventory
            .add_slot(new_slot("A-101", 1, "Zone A", SlotType::Regular, 5))
            .await
            .unwrap();
        let err = inventory
            .add_slot(new_slot("A-101", 2, "Zone B", SlotType::Vip, 12))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "conflict");
    }

    #[tokio::test]
    async fn invalid_price_is_rejected() {
        let inventory = setup().await;
        let err = inventory
            .add_slot(new_slot("A-101", 1, "Zone A", SlotType::Regular, 0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn search_filters_and_orders() {
        let inventory = setup().await;
        inventory
            .add_slot(new_slot("B-201", 2, "Zone B", SlotType::Regular, 5))
            .await
            .unwrap();
        inventory
            .add_slot(new_slot("A-102", 1, "Zone A", SlotType::Handicap, 4))
            .await
            .unwrap();
        inventory
            .add_slot(new_slot("A-101", 1, "Zone A", SlotType::Regular, 5))
            .await
            .unwrap();
        inventory
            .add_slot(new_slot("B-202", 2, "Zone B", SlotType::Vip, 12))
            .await
            .unwrap();

        let all = inventory.search_slots(&SlotFilter::default()).await.unwrap();
        let numbers: Vec<&str> = all.iter().map(|s| s.number.as_str()).collect();
        assert_eq!(numbers, vec!["A-102", "A-101", "B-201", "B-202"]);

        let cheap = inventory
            .search_slots(&SlotFilter {
                max_price: Some(Money::from_major(5)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cheap.len(), 3);

        let zone_b = inventory
            .search_slots(&SlotFilter {
                zone: Some("Zone B".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(zone_b.len(), 2);

        let handicap = inventory
            .search_slots(&SlotFilter {
                slot_type: Some(SlotType::Handicap),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(handicap.len(), 1);
        assert_eq!(handicap[0].number, "A-102");
    }

    #[tokio::test]
    async fn summary_tracks_availability_override() {
        let inventory = setup().await;
        let slot = inventory
            .add_slot(new_slot("A-101", 1, "Zone A", SlotType::Regular, 5))
            .await
            .unwrap();
        inventory
            .add_slot(new_slot("A-102", 1, "Zone A", SlotType::Regular, 5))
            .await
            .unwrap();

        inventory.set_available(slot.id, false).await.unwrap();

        let summary = inventory.availability_summary().await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.occupied, 1);
        assert_eq!(summary.occupancy_rate, 50.0);
    }
}
