//! Create utilization_stats table
//!
//! Composite key (slot_id, stat_date, stat_hour); buckets are incremented
//! in place by the reservation commit.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_parking_slots::ParkingSlots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UtilizationStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UtilizationStats::SlotId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UtilizationStats::StatDate).date().not_null())
                    .col(ColumnDef::new(UtilizationStats::StatHour).integer().not_null())
                    .col(
                        ColumnDef::new(UtilizationStats::OccupancyCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UtilizationStats::RevenueCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_utilization_stats")
                            .col(UtilizationStats::SlotId)
                            .col(UtilizationStats::StatDate)
                            .col(UtilizationStats::StatHour),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_utilization_stats_parking_slot")
                            .from(UtilizationStats::Table, UtilizationStats::SlotId)
                            .to(ParkingSlots::Table, ParkingSlots::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UtilizationStats::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UtilizationStats {
    Table,
    SlotId,
    StatDate,
    StatHour,
    OccupancyCount,
    RevenueCents,
}
