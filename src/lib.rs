//! # Smart Parking Platform
//!
//! Parking-lot reservation core: slot inventory, user wallets, reservation
//! lifecycle and utilization analytics. The reservation engine commits slot
//! claim, wallet debit, payment, ledger entry and stats as one atomic unit,
//! so concurrent callers can never double-book a slot or overdraw a wallet.
//!
//! ## Architecture
//!
//! - **domain**: entities, closed enums, repository traits and the unit of
//!   work
//! - **application**: services orchestrating the reservation engine and
//!   read-side rollups
//! - **infrastructure**: storage backends (in-memory, SeaORM/SQLite)
//! - **shared**: error and money primitives

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export the in-memory store used for development and testing
pub use infrastructure::storage::InMemoryStore;
