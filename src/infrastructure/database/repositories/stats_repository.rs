//! SeaORM implementation of UtilizationRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use super::db_err;
use crate::domain::{DomainResult, Money, UtilizationRepository, UtilizationStat};
use crate::infrastructure::database::entities::utilization_stat;

pub struct SeaOrmStatsRepository {
    db: DatabaseConnection,
}

impl SeaOrmStatsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn model_to_domain(m: utilization_stat::Model) -> UtilizationStat {
    UtilizationStat {
        slot_id: m.slot_id,
        date: m.stat_date,
        hour: m.stat_hour as u32,
        occupancy_count: m.occupancy_count,
        revenue: Money::from_cents(m.revenue_cents),
    }
}

#[async_trait]
impl UtilizationRepository for SeaOrmStatsRepository {
    async fn all(&self) -> DomainResult<Vec<UtilizationStat>> {
        let models = utilization_stat::Entity::find()
            .order_by_asc(utilization_stat::Column::SlotId)
            .order_by_asc(utilization_stat::Column::StatDate)
            .order_by_asc(utilization_stat::Column::StatHour)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
