//! SeaORM implementation of SlotRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use super::db_err;
use crate::domain::{DomainError, DomainResult, Money, NewSlot, Slot, SlotFilter, SlotRepository};
use crate::domain::SlotType;
use crate::infrastructure::database::entities::parking_slot;

pub struct SeaOrmSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn model_to_domain(m: parking_slot::Model) -> Slot {
    Slot {
        id: m.id,
        number: m.number,
        floor: m.floor,
        zone: m.zone,
        slot_type: SlotType::from_stored(&m.slot_type),
        price_per_hour: Money::from_cents(m.price_per_hour_cents),
        is_available: m.is_available,
        created_at: m.created_at,
    }
}

// ── SlotRepository impl ─────────────────────────────────────────

#[async_trait]
impl SlotRepository for SeaOrmSlotRepository {
    async fn insert(&self, slot: NewSlot) -> DomainResult<Slot> {
        debug!("Adding slot {}", slot.number);

        let existing = parking_slot::Entity::find()
            .filter(parking_slot::Column::Number.eq(slot.number.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "slot {} already exists",
                slot.number
            )));
        }

        let model = parking_slot::ActiveModel {
            id: NotSet,
            number: Set(slot.number),
            floor: Set(slot.floor),
            zone: Set(slot.zone),
            slot_type: Set(slot.slot_type.as_str().to_string()),
            price_per_hour_cents: Set(slot.price_per_hour.cents()),
            is_available: Set(true),
            created_at: Set(Utc::now()),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, slot_id: i64) -> DomainResult<Option<Slot>> {
        let model = parking_slot::Entity::find_by_id(slot_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_all(&self) -> DomainResult<Vec<Slot>> {
        let models = parking_slot::Entity::find()
            .order_by_asc(parking_slot::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn search(&self, filter: &SlotFilter) -> DomainResult<Vec<Slot>> {
        let mut query = parking_slot::Entity::find()
            .filter(parking_slot::Column::IsAvailable.eq(true));
        if let Some(floor) = filter.floor {
            query = query.filter(parking_slot::Column::Floor.eq(floor));
        }
        if let Some(zone) = &filter.zone {
            query = query.filter(parking_slot::Column::Zone.eq(zone.as_str()));
        }
        if let Some(slot_type) = filter.slot_type {
            query = query.filter(parking_slot::Column::SlotType.eq(slot_type.as_str()));
        }
        if let Some(max_price) = filter.max_price {
            query = query.filter(parking_slot::Column::PricePerHourCents.lte(max_price.cents()));
        }

        let models = query
            .order_by_asc(parking_slot::Column::PricePerHourCents)
            .order_by_asc(parking_slot::Column::Floor)
            .order_by_asc(parking_slot::Column::Number)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn set_available(&self, slot_id: i64, available: bool) -> DomainResult<()> {
        let existing = parking_slot::Entity::find_by_id(slot_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("slot", "slot_id", slot_id))?;

        let mut active = existing.into_active_model();
        active.is_available = Set(available);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
