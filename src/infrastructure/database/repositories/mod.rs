//! SeaORM repository implementations

mod account_repository;
mod ledger_repository;
mod repository_provider;
mod reservation_repository;
mod slot_repository;
mod stats_repository;
mod unit_of_work;

pub use account_repository::SeaOrmAccountRepository;
pub use ledger_repository::SeaOrmLedgerRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use reservation_repository::SeaOrmReservationRepository;
pub use slot_repository::SeaOrmSlotRepository;
pub use stats_repository::SeaOrmStatsRepository;
pub use unit_of_work::SeaOrmUnitOfWork;

use crate::domain::DomainError;

/// Map a database error onto the domain storage error.
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}
