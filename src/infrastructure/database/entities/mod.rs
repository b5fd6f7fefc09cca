//! SeaORM database entities

pub mod parking_slot;
pub mod payment;
pub mod reservation;
pub mod user;
pub mod utilization_stat;
pub mod wallet_transaction;
