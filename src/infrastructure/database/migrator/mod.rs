//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_parking_slots;
mod m20250101_000002_create_users;
mod m20250101_000003_create_reservations;
mod m20250101_000004_create_wallet_transactions;
mod m20250101_000005_create_payments;
mod m20250101_000006_create_utilization_stats;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_parking_slots::Migration),
            Box::new(m20250101_000002_create_users::Migration),
            Box::new(m20250101_000003_create_reservations::Migration),
            Box::new(m20250101_000004_create_wallet_transactions::Migration),
            Box::new(m20250101_000005_create_payments::Migration),
            Box::new(m20250101_000006_create_utilization_stats::Migration),
        ]
    }
}
