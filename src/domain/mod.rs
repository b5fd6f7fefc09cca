pub mod account;
pub mod analytics;
pub mod ledger;
pub mod repositories;
pub mod reservation;
pub mod slot;

// Re-export commonly used types
pub use account::{Account, AccountRepository, NewAccount, RegisterAccount};
pub use analytics::{
    DailyRevenue, PeakDemandReport, PeakHour, RevenueReport, TypeUsage, UtilizationRepository,
    UtilizationStat, ZoneUsage,
};
pub use ledger::{
    EntryKind, LedgerEntry, LedgerRepository, Payment, PaymentMethod, PaymentStatus,
};
pub use repositories::{
    CommittedReservation, DomainResult, RepositoryProvider, ReservationDraft, UnitOfWork,
};
pub use reservation::{Reservation, ReservationDetails, ReservationRepository, ReservationStatus};
pub use slot::{
    AvailabilitySummary, FloorAvailability, NewSlot, Slot, SlotFilter, SlotRepository, SlotType,
    ZoneAvailability,
};

// Re-export shared primitives for convenience
pub use crate::shared::errors::DomainError;
pub use crate::shared::money::Money;
