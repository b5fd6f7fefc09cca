//! Application services

mod accounts;
mod admin;
mod analytics;
mod inventory;
mod reservation_engine;

pub use accounts::AccountService;
pub use admin::AdminService;
pub use analytics::AnalyticsService;
pub use inventory::InventoryService;
pub use reservation_engine::{ReservationEngine, ReservationReceipt};
