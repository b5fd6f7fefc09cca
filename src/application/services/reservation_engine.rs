//! Reservation engine - the transactional core
//!
//! Orchestrates the validate-then-commit sequence: the ordered business
//! checks run first and short-circuit with their specific rejection, then
//! the unit of work commits slot claim, wallet debit, reservation, payment,
//! ledger entry and utilization bucket as one atomic unit. The commit
//! re-checks the claim and the debit conditionally, so concurrent callers
//! can never double-book a slot or overdraw a wallet.

use std::sync::Arc;

use chrono::{Duration, Local, Utc};
use log::info;
use uuid::Uuid;

use crate::domain::{
    DomainError, DomainResult, Money, RepositoryProvider, Reservation, ReservationDetails,
    ReservationDraft, ReservationStatus,
};

/// Successful reservation outcome.
#[derive(Debug, Clone)]
pub struct ReservationReceipt {
    pub reservation_id: i64,
    pub message: String,
    pub new_balance: Money,
}

pub struct ReservationEngine {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReservationEngine {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Book a slot for `duration_hours`, paying upfront from the wallet.
    pub async fn create_reservation(
        &self,
        user_id: i64,
        slot_id: i64,
        duration_hours: i64,
    ) -> DomainResult<ReservationReceipt> {
        // Lazy sweep: a lapsed hold must not block rebooking.
        self.repos.unit_of_work().release_expired(Utc::now()).await?;

        if !(1..=4).contains(&duration_hours) {
            return Err(DomainError::InvalidDuration);
        }

        let history = self.repos.reservations().find_for_user(user_id).await?;
        if history.iter().any(Reservation::is_active) {
            return Err(DomainError::DuplicateActive(user_id));
        }
        let today = Local::now().date_naive();
        if history
            .iter()
            .any(|r| r.status != ReservationStatus::Cancelled && r.starts_on(today))
        {
            return Err(DomainError::DuplicateDaily(user_id));
        }

        let slot = match self.repos.slots().find_by_id(slot_id).await? {
            Some(slot) if slot.is_available => slot,
            _ => return Err(DomainError::SlotUnavailable),
        };

        let account = self
            .repos
            .accounts()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("account", "user_id", user_id))?;

        let total_amount = slot.price_per_hour * duration_hours;
        if account.wallet_balance < total_amount {
            return Err(DomainError::InsufficientBalance {
                required: total_amount,
                available: account.wallet_balance,
            });
        }

        let start_time = Utc::now();
        let draft = ReservationDraft {
            user_id,
            slot_id,
            duration_hours,
            start_time,
            end_time: start_time + Duration::hours(duration_hours),
            total_amount,
            transaction_ref: Uuid::new_v4().to_string(),
        };
        let committed = self.repos.unit_of_work().commit_reservation(draft).await?;

        info!(
            "Reservation {} created: user {} slot {} ({}h, {})",
            committed.reservation.id, user_id, slot.number, duration_hours, total_amount
        );
        Ok(ReservationReceipt {
            reservation_id: committed.reservation.id,
            message: format!(
                "Reservation confirmed: slot {} for {} hour(s), charged {}",
                slot.number, duration_hours, total_amount
            ),
            new_balance: committed.new_balance,
        })
    }

    /// End a reservation and free its slot. Returns false when the
    /// reservation exists but is no longer active.
    pub async fn end_reservation(&self, reservation_id: i64) -> DomainResult<bool> {
        let ended = self
            .repos
            .unit_of_work()
            .complete_reservation(reservation_id, Utc::now())
            .await?;
        if ended {
            info!("Reservation {} ended", reservation_id);
        }
        Ok(ended)
    }

    /// Complete every reservation whose paid window has elapsed.
    pub async fn release_expired_reservations(&self) -> DomainResult<u64> {
        let released = self.repos.unit_of_work().release_expired(Utc::now()).await?;
        if released > 0 {
            info!("Released {} expired reservation(s)", released);
        }
        Ok(released)
    }

    /// A user's reservation history joined with slot locations, newest first.
    pub async fn user_reservations(&self, user_id: i64) -> DomainResult<Vec<ReservationDetails>> {
        self.repos.unit_of_work().release_expired(Utc::now()).await?;

        let reservations = self.repos.reservations().find_for_user(user_id).await?;
        let mut details = Vec::with_capacity(reservations.len());
        for reservation in reservations {
            let slot = self
                .repos
                .slots()
                .find_by_id(reservation.slot_id)
                .await?
                .ok_or_else(|| {
                    DomainError::Storage(format!(
                        "slot {} missing for reservation {}",
                        reservation.slot_id, reservation.id
                    ))
                })?;
            details.push(ReservationDetails {
                reservation,
                slot_number: slot.number,
                floor: slot.floor,
                zone: slot.zone,
            });
        }
        Ok(details)
    }

    /// All currently active reservations.
    pub async fn active_reservations(&self) -> DomainResult<Vec<Reservation>> {
        self.repos.unit_of_work().release_expired(Utc::now()).await?;
        self.repos.reservations().find_active().await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Account, AccountRepository, LedgerRepository, NewAccount, NewSlot, ReservationRepository,
        Slot, SlotRepository, SlotType, UnitOfWork, UtilizationRepository,
    };
    use crate::infrastructure::storage::InMemoryStore;

    async fn setup() -> (Arc<InMemoryStore>, ReservationEngine) {
        let store = Arc::new(InMemoryStore::new());
        let engine = ReservationEngine::new(store.clone());
        (store, engine)
    }

    async fn seed_slot(store: &InMemoryStore, number: &str, price_major: i64) -> Slot {
        SlotRepository::insert(
            store,
            NewSlot {
                number: number.into(),
                floor: 1,
                zone: "Zone A".into(),
                slot_type: SlotType::Regular,
                price_per_hour: Money::from_major(price_major),
            },
        )
        .await
        .unwrap()
    }

    async fn seed_account(store: &InMemoryStore, login: &str, balance_major: i64) -> Account {
        AccountRepository::insert(
            store,
            NewAccount {
                login_id: login.into(),
                display_name: login.into(),
                email: format!("{}@example.com", login),
                phone: None,
                vehicle_number: None,
                credential_hash: "$2b$12$hash".into(),
                wallet_balance: Money::from_major(balance_major),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn books_and_charges_upfront() {
        // slot $50/hr, balance $300, 2h -> $100 charged
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let user = seed_account(&store, "john", 300).await;

        let receipt = engine
            .create_reservation(user.id, slot.id, 2)
            .await
            .unwrap();
        assert_eq!(receipt.new_balance, Money::from_major(200));
        assert!(receipt.message.contains("A-101"));
        assert!(receipt.message.contains("100.00"));

        let slot = SlotRepository::find_by_id(store.as_ref(), slot.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!slot.is_available);

        let stats = UtilizationRepository::all(store.as_ref()).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].occupancy_count, 1);
        assert_eq!(stats[0].revenue, Money::from_major(100));
    }

    #[tokio::test]
    async fn rejects_insufficient_balance_with_amounts() {
        // slot $50/hr, balance $180, 4h -> $200 needed
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let user = seed_account(&store, "john", 180).await;

        let err = engine
            .create_reservation(user.id, slot.id, 4)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientBalance {
                required: Money::from_major(200),
                available: Money::from_major(180),
            }
        );

        // nothing was committed
        let account = AccountRepository::find_by_id(store.as_ref(), user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.wallet_balance, Money::from_major(180));
        let slot = SlotRepository::find_by_id(store.as_ref(), slot.id)
            .await
            .unwrap()
            .unwrap();
        assert!(slot.is_available);
    }

    #[tokio::test]
    async fn rejects_out_of_range_durations() {
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let user = seed_account(&store, "john", 300).await;

        for hours in [0, 5, -1] {
            let err = engine
                .create_reservation(user.id, slot.id, hours)
                .await
                .unwrap_err();
            assert_eq!(err, DomainError::InvalidDuration);
        }
    }

    #[tokio::test]
    async fn one_active_reservation_per_user() {
        let (store, engine) = setup().await;
        let first = seed_slot(&store, "A-101", 50).await;
        let second = seed_slot(&store, "A-102", 50).await;
        let user = seed_account(&store, "john", 300).await;

        engine
            .create_reservation(user.id, first.id, 1)
            .await
            .unwrap();
        let err = engine
            .create_reservation(user.id, second.id, 1)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateActive(user.id));
    }

    #[tokio::test]
    async fn one_reservation_per_day_even_after_ending() {
        let (store, engine) = setup().await;
        let first = seed_slot(&store, "A-101", 50).await;
        let second = seed_slot(&store, "A-102", 50).await;
        let user = seed_account(&store, "john", 300).await;

        let receipt = engine
            .create_reservation(user.id, first.id, 1)
            .await
            .unwrap();
        assert!(engine.end_reservation(receipt.reservation_id).await.unwrap());

        let err = engine
            .create_reservation(user.id, second.id, 1)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateDaily(user.id));
    }

    #[tokio::test]
    async fn rejects_unknown_or_taken_slot() {
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let john = seed_account(&store, "john", 300).await;
        let jane = seed_account(&store, "jane", 300).await;

        let err = engine
            .create_reservation(john.id, 999, 1)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::SlotUnavailable);

        engine.create_reservation(john.id, slot.id, 1).await.unwrap();
        let err = engine
            .create_reservation(jane.id, slot.id, 1)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::SlotUnavailable);
    }

    #[tokio::test]
    async fn rejects_unknown_user() {
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;

        let err = engine.create_reservation(999, slot.id, 1).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn concurrent_creates_book_the_slot_once() {
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let john = seed_account(&store, "john", 300).await;
        let jane = seed_account(&store, "jane", 300).await;
        let engine = Arc::new(engine);

        let mut handles = Vec::new();
        for user_id in [john.id, jane.id] {
            let engine = engine.clone();
            let slot_id = slot.id;
            handles.push(tokio::spawn(async move {
                engine.create_reservation(user_id, slot_id, 1).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => assert!(matches!(
                    err,
                    DomainError::SlotUnavailable | DomainError::ConcurrentConflict(_)
                )),
            }
        }
        assert_eq!(successes, 1);

        // exactly one holder, and only the winner paid
        let active = store.find_active().await.unwrap();
        assert_eq!(active.len(), 1);
        let paid: Vec<Money> = store
            .list_payments()
            .await
            .unwrap()
            .iter()
            .map(|p| p.amount)
            .collect();
        assert_eq!(paid, vec![Money::from_major(50)]);
    }

    #[tokio::test]
    async fn wallets_never_go_negative_under_races() {
        let (store, engine) = setup().await;
        let first = seed_slot(&store, "A-101", 100).await;
        let second = seed_slot(&store, "A-102", 100).await;
        let user = seed_account(&store, "john", 100).await;
        let engine = Arc::new(engine);

        let mut handles = Vec::new();
        for slot_id in [first.id, second.id] {
            let engine = engine.clone();
            let user_id = user.id;
            handles.push(tokio::spawn(async move {
                engine.create_reservation(user_id, slot_id, 1).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);

        let account = AccountRepository::find_by_id(store.as_ref(), user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.wallet_balance, Money::ZERO);
        let entries = LedgerRepository::find_for_user(store.as_ref(), user.id)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, Money::from_cents(-10000));
    }

    #[tokio::test]
    async fn ledger_always_sums_to_balance_delta() {
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let user = seed_account(&store, "john", 300).await;

        let receipt = engine
            .create_reservation(user.id, slot.id, 2)
            .await
            .unwrap();
        engine.end_reservation(receipt.reservation_id).await.unwrap();
        store
            .credit(user.id, Money::from_major(50), "top-up")
            .await
            .unwrap();

        let account = AccountRepository::find_by_id(store.as_ref(), user.id)
            .await
            .unwrap()
            .unwrap();
        let ledger_sum: Money = LedgerRepository::find_for_user(store.as_ref(), user.id)
            .await
            .unwrap()
            .iter()
            .map(|e| e.amount)
            .sum();
        assert_eq!(ledger_sum, account.wallet_balance - Money::from_major(300));
    }

    #[tokio::test]
    async fn end_reservation_frees_the_slot_once() {
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let user = seed_account(&store, "john", 300).await;

        let receipt = engine
            .create_reservation(user.id, slot.id, 2)
            .await
            .unwrap();
        assert!(engine.end_reservation(receipt.reservation_id).await.unwrap());
        assert!(!engine.end_reservation(receipt.reservation_id).await.unwrap());

        let slot = SlotRepository::find_by_id(store.as_ref(), slot.id)
            .await
            .unwrap()
            .unwrap();
        assert!(slot.is_available);

        let err = engine.end_reservation(9999).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn sweep_reports_zero_when_nothing_expired() {
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let user = seed_account(&store, "john", 300).await;
        engine.create_reservation(user.id, slot.id, 2).await.unwrap();

        assert_eq!(engine.release_expired_reservations().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn expired_hold_is_released_before_rebooking() {
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let john = seed_account(&store, "john", 300).await;
        let jane = seed_account(&store, "jane", 300).await;

        engine.create_reservation(john.id, slot.id, 1).await.unwrap();
        // Force the hold past its window, as if an hour elapsed.
        let released = store
            .release_expired(Utc::now() + Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(released, 1);

        // The slot is free again for the next caller.
        let receipt = engine
            .create_reservation(jane.id, slot.id, 1)
            .await
            .unwrap();
        assert!(receipt.reservation_id > 0);
    }

    #[tokio::test]
    async fn user_reservations_join_slot_details() {
        let (store, engine) = setup().await;
        let slot = seed_slot(&store, "A-101", 50).await;
        let user = seed_account(&store, "john", 300).await;

        engine.create_reservation(user.id, slot.id, 2).await.unwrap();

        let details = engine.user_reservations(user.id).await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].slot_number, "A-101");
        assert_eq!(details[0].floor, 1);
        assert_eq!(details[0].zone, "Zone A");
        assert!(details[0].reservation.is_active());
    }
}
