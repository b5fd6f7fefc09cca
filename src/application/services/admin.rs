//! Administrative operations

use std::sync::Arc;

use log::{info, warn};

use crate::domain::{DomainResult, RepositoryProvider};

pub struct AdminService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AdminService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Delete an account, cascading: active reservations are force-released
    /// (slot freed, reservation cancelled), payments and ledger entries are
    /// purged. Reservation history rows survive. Returns false when the
    /// account does not exist.
    pub async fn delete_account(&self, user_id: i64) -> DomainResult<bool> {
        let purged = self.repos.unit_of_work().purge_account(user_id).await?;
        if purged {
            info!("Account {} deleted with cascading release", user_id);
        }
        Ok(purged)
    }

    /// Bulk reset: clears reservations, payments, ledger entries and
    /// utilization stats and re-frees every slot. Accounts survive.
    pub async fn reset_history(&self) -> DomainResult<()> {
        warn!("Resetting all reservation, payment and ledger history");
        self.repos.unit_of_work().reset_history().await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AccountRepository, LedgerRepository, Money, NewAccount, NewSlot, ReservationDraft,
        ReservationRepository, ReservationStatus, SlotRepository, SlotType, UnitOfWork,
    };
    use crate::infrastructure::storage::InMemoryStore;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    async fn booked_store() -> (Arc<InMemoryStore>, i64, i64, i64) {
        let store = Arc::new(InMemoryStore::new());
        let slot = SlotRepository::insert(
            store.as_ref(),
            NewSlot {
                number: "A-101".into(),
                floor: 1,
                zone: "Zone A".into(),
                slot_type: SlotType::Regular,
                price_per_hour: Money::from_major(50),
            },
        )
        .await
        .unwrap();
        let account = AccountRepository::insert(
            store.as_ref(),
            NewAccount {
                login_id: "john".into(),
                display_name: "John".into(),
                email: "john@example.com".into(),
                phone: None,
                vehicle_number: None,
                credential_hash: "$2b$12$hash".into(),
                wallet_balance: Money::from_major(300),
            },
        )
        .await
        .unwrap();
        let start = Utc::now();
        let committed = store
            .commit_reservation(ReservationDraft {
                user_id: account.id,
                slot_id: slot.id,
                duration_hours: 2,
                start_time: start,
                end_time: start + Duration::hours(2),
                total_amount: Money::from_major(100),
                transaction_ref: Uuid::new_v4().to_string(),
            })
            .await
            .unwrap();
        (store, account.id, slot.id, committed.reservation.id)
    }

    #[tokio::test]
    async fn delete_account_cancels_active_reservation() {
        let (store, user_id, slot_id, reservation_id) = booked_store().await;
        let admin = AdminService::new(store.clone());

        assert!(admin.delete_account(user_id).await.unwrap());
        assert!(!admin.delete_account(user_id).await.unwrap());

        let reservation = ReservationRepository::find_by_id(store.as_ref(), reservation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reservation.status, ReservationStatus::Cancelled);
        let slot = SlotRepository::find_by_id(store.as_ref(), slot_id)
            .await
            .unwrap()
            .unwrap();
        assert!(slot.is_available);
        assert!(store.list_payments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_history_keeps_accounts() {
        let (store, user_id, _, _) = booked_store().await;
        let admin = AdminService::new(store.clone());

        admin.reset_history().await.unwrap();

        assert!(ReservationRepository::find_all(store.as_ref())
            .await
            .unwrap()
            .is_empty());
        assert!(store.recent(10).await.unwrap().is_empty());
        assert!(AccountRepository::find_by_id(store.as_ref(), user_id)
            .await
            .unwrap()
            .is_some());
    }
}
