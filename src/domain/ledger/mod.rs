mod model;
mod repository;

pub use model::{EntryKind, LedgerEntry, Payment, PaymentMethod, PaymentStatus};
pub use repository::LedgerRepository;
