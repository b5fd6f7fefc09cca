//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use super::{
    SeaOrmAccountRepository, SeaOrmLedgerRepository, SeaOrmReservationRepository,
    SeaOrmSlotRepository, SeaOrmStatsRepository, SeaOrmUnitOfWork,
};
use crate::domain::{
    AccountRepository, LedgerRepository, RepositoryProvider, ReservationRepository,
    SlotRepository, UnitOfWork, UtilizationRepository,
};

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors
/// plus the transactional unit of work.
pub struct SeaOrmRepositoryProvider {
    slots: SeaOrmSlotRepository,
    accounts: SeaOrmAccountRepository,
    reservations: SeaOrmReservationRepository,
    ledger: SeaOrmLedgerRepository,
    stats: SeaOrmStatsRepository,
    unit_of_work: SeaOrmUnitOfWork,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            slots: SeaOrmSlotRepository::new(db.clone()),
            accounts: SeaOrmAccountRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            ledger: SeaOrmLedgerRepository::new(db.clone()),
            stats: SeaOrmStatsRepository::new(db.clone()),
            unit_of_work: SeaOrmUnitOfWork::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn slots(&self) -> &dyn SlotRepository {
        &self.slots
    }

    fn accounts(&self) -> &dyn AccountRepository {
        &self.accounts
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn ledger(&self) -> &dyn LedgerRepository {
        &self.ledger
    }

    fn stats(&self) -> &dyn UtilizationRepository {
        &self.stats
    }

    fn unit_of_work(&self) -> &dyn UnitOfWork {
        &self.unit_of_work
    }
}
