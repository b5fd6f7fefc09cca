//!
//! Parking reservation platform service.
//! Reads configuration from TOML file (~/.config/smart-parking/config.toml),
//! migrates the database, seeds default inventory and logs a health snapshot.

use std::sync::Arc;

use log::{error, info, warn};
use rust_decimal::Decimal;
use sea_orm_migration::MigratorTrait;

use smart_parking::application::services::{
    AnalyticsService, InventoryService, ReservationEngine,
};
use smart_parking::config::{default_config_path, AppConfig};
use smart_parking::domain::{Money, NewSlot, RepositoryProvider, SlotType};
use smart_parking::infrastructure::database::migrator::Migrator;
use smart_parking::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let loaded = AppConfig::load(&config_path);

    let level = loaded
        .as_ref()
        .map(|cfg| cfg.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&level)).init();

    let app_cfg = match loaded {
        Ok(cfg) => {
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Smart Parking service...");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Services ───────────────────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let inventory = InventoryService::new(repos.clone());
    let engine = ReservationEngine::new(repos.clone());
    let analytics = AnalyticsService::new(repos);

    seed_default_slots(&inventory).await;

    let released = engine.release_expired_reservations().await?;
    if released > 0 {
        info!("Released {} expired reservation(s) on startup", released);
    }

    // ── Health snapshot ────────────────────────────────────────
    let summary = inventory.availability_summary().await?;
    info!("Availability: {}", serde_json::to_string_pretty(&summary)?);

    let revenue = analytics.revenue_report().await?;
    let inr = revenue
        .total_revenue
        .convert(Decimal::from(app_cfg.currency.inr_rate));
    info!(
        "Total revenue: {} {} ({} INR)",
        revenue.total_revenue, app_cfg.currency.code, inr
    );

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }
    info!("Smart Parking service shutdown complete");
    Ok(())
}

/// Seed a small default inventory when the slot table is empty.
async fn seed_default_slots(inventory: &InventoryService) {
    let slots = match inventory.list_slots().await {
        Ok(slots) => slots,
        Err(e) => {
            warn!("Could not inspect slot inventory: {}", e);
            return;
        }
    };
    if !slots.is_empty() {
        return;
    }

    info!("Seeding default parking slots...");
    let defaults = [
        ("A-101", 1, "Zone A", SlotType::Regular, 5),
        ("A-102", 1, "Zone A", SlotType::Regular, 5),
        ("A-103", 1, "Zone A", SlotType::Handicap, 4),
        ("B-201", 2, "Zone B", SlotType::Regular, 5),
        ("B-202", 2, "Zone B", SlotType::Vip, 12),
        ("C-301", 3, "Zone C", SlotType::Electric, 8),
        ("C-302", 3, "Zone C", SlotType::Premium, 10),
    ];
    for (number, floor, zone, slot_type, price_major) in defaults {
        let slot = NewSlot {
            number: number.to_string(),
            floor,
            zone: zone.to_string(),
            slot_type,
            price_per_hour: Money::from_major(price_major),
        };
        if let Err(e) = inventory.add_slot(slot).await {
            warn!("Failed to seed slot {}: {}", number, e);
        }
    }
}
