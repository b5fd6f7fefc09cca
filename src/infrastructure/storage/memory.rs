//! In-memory storage for development and testing
//!
//! The whole state lives behind one `tokio::sync::RwLock`: every mutating
//! operation runs its checks and writes inside a single write-guard critical
//! section, which gives the same all-or-nothing, serialized semantics the
//! database backend gets from transactions.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};
use log::debug;
use tokio::sync::RwLock;

use crate::domain::{
    Account, AccountRepository, CommittedReservation, DomainError, DomainResult, EntryKind,
    LedgerEntry, LedgerRepository, Money, NewAccount, NewSlot, Payment, PaymentMethod,
    PaymentStatus, RepositoryProvider, Reservation, ReservationDraft, ReservationRepository,
    ReservationStatus, Slot, SlotFilter, SlotRepository, UnitOfWork, UtilizationRepository,
    UtilizationStat,
};

#[derive(Default)]
struct MemoryState {
    slots: HashMap<i64, Slot>,
    accounts: HashMap<i64, Account>,
    reservations: HashMap<i64, Reservation>,
    ledger: Vec<LedgerEntry>,
    payments: HashMap<i64, Payment>,
    stats: HashMap<(i64, NaiveDate, u32), UtilizationStat>,
    next_slot_id: i64,
    next_account_id: i64,
    next_reservation_id: i64,
    next_ledger_id: i64,
    next_payment_id: i64,
}

impl MemoryState {
    fn append_ledger(&mut self, entry_fn: impl FnOnce(i64) -> LedgerEntry) {
        self.next_ledger_id += 1;
        let entry = entry_fn(self.next_ledger_id);
        self.ledger.push(entry);
    }
}

/// In-memory store; implements every repository plus the unit of work.
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryStore {
    fn slots(&self) -> &dyn SlotRepository {
        self
    }

    fn accounts(&self) -> &dyn AccountRepository {
        self
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }

    fn ledger(&self) -> &dyn LedgerRepository {
        self
    }

    fn stats(&self) -> &dyn UtilizationRepository {
        self
    }

    fn unit_of_work(&self) -> &dyn UnitOfWork {
        self
    }
}

// ── SlotRepository ──────────────────────────────────────────────

#[async_trait]
impl SlotRepository for InMemoryStore {
    async fn insert(&self, slot: NewSlot) -> DomainResult<Slot> {
        let mut state = self.state.write().await;
        if state.slots.values().any(|s| s.number == slot.number) {
            return Err(DomainError::Conflict(format!(
                "slot {} already exists",
                slot.number
            )));
        }
        state.next_slot_id += 1;
        let stored = Slot {
            id: state.next_slot_id,
            number: slot.number,
            floor: slot.floor,
            zone: slot.zone,
            slot_type: slot.slot_type,
            price_per_hour: slot.price_per_hour,
            is_available: true,
            created_at: Utc::now(),
        };
        state.slots.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, slot_id: i64) -> DomainResult<Option<Slot>> {
        let state = self.state.read().await;
        Ok(state.slots.get(&slot_id).cloned())
    }

    async fn list_all(&self) -> DomainResult<Vec<Slot>> {
        let state = self.state.read().await;
        let mut slots: Vec<Slot> = state.slots.values().cloned().collect();
        slots.sort_by_key(|s| s.id);
        Ok(slots)
    }

    async fn search(&self, filter: &SlotFilter) -> DomainResult<Vec<Slot>> {
        let state = self.state.read().await;
        let mut slots: Vec<Slot> = state
            .slots
            .values()
            .filter(|s| s.is_available && filter.matches(s))
            .cloned()
            .collect();
        slots.sort_by(|a, b| {
            a.price_per_hour
                .cmp(&b.price_per_hour)
                .then(a.floor.cmp(&b.floor))
                .then(a.number.cmp(&b.number))
        });
        Ok(slots)
    }

    async fn set_available(&self, slot_id: i64, available: bool) -> DomainResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .slots
            .get_mut(&slot_id)
            .ok_or_else(|| DomainError::not_found("slot", "slot_id", slot_id))?;
        slot.is_available = available;
        Ok(())
    }
}

// ── AccountRepository ───────────────────────────────────────────

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn insert(&self, account: NewAccount) -> DomainResult<Account> {
        let mut state = self.state.write().await;
        if state.accounts.values().any(|a| a.login_id == account.login_id) {
            return Err(DomainError::Conflict(format!(
                "login {} already exists",
                account.login_id
            )));
        }
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::Conflict(format!(
                "email {} already exists",
                account.email
            )));
        }
        state.next_account_id += 1;
        let stored = Account {
            id: state.next_account_id,
            login_id: account.login_id,
            display_name: account.display_name,
            email: account.email,
            phone: account.phone,
            vehicle_number: account.vehicle_number,
            wallet_balance: account.wallet_balance,
            credential_hash: account.credential_hash,
            created_at: Utc::now(),
        };
        state.accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, user_id: i64) -> DomainResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&user_id).cloned())
    }

    async fn find_by_login(&self, login_id: &str) -> DomainResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.login_id == login_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn list_all(&self) -> DomainResult<Vec<Account>> {
        let state = self.state.read().await;
        let mut accounts: Vec<Account> = state.accounts.values().cloned().collect();
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }

    async fn credit(&self, user_id: i64, amount: Money, description: &str) -> DomainResult<Money> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount);
        }
        let mut state = self.state.write().await;
        let new_balance = {
            let account = state
                .accounts
                .get_mut(&user_id)
                .ok_or_else(|| DomainError::not_found("account", "user_id", user_id))?;
            account.wallet_balance += amount;
            account.wallet_balance
        };
        let now = Utc::now();
        let description = description.to_string();
        state.append_ledger(|id| LedgerEntry::credit(id, user_id, amount, description, now));
        debug!("Credited user {}: {} -> {}", user_id, amount, new_balance);
        Ok(new_balance)
    }

    async fn debit_if_sufficient(
        &self,
        user_id: i64,
        amount: Money,
        description: &str,
    ) -> DomainResult<bool> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount);
        }
        let mut state = self.state.write().await;
        {
            let account = state
                .accounts
                .get_mut(&user_id)
                .ok_or_else(|| DomainError::not_found("account", "user_id", user_id))?;
            if account.wallet_balance < amount {
                return Ok(false);
            }
            account.wallet_balance = account.wallet_balance - amount;
        }
        let now = Utc::now();
        let description = description.to_string();
        state.append_ledger(|id| LedgerEntry::debit(id, user_id, amount, description, now));
        Ok(true)
    }
}

// ── ReservationRepository ───────────────────────────────────────

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn find_by_id(&self, reservation_id: i64) -> DomainResult<Option<Reservation>> {
        let state = self.state.read().await;
        Ok(state.reservations.get(&reservation_id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut reservations: Vec<Reservation> = state.reservations.values().cloned().collect();
        reservations.sort_by_key(|r| r.id);
        Ok(reservations)
    }

    async fn find_for_user(&self, user_id: i64) -> DomainResult<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut reservations: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reservations)
    }

    async fn find_active(&self) -> DomainResult<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut reservations: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| r.is_active())
            .cloned()
            .collect();
        reservations.sort_by_key(|r| r.id);
        Ok(reservations)
    }

    async fn find_active_for_user(&self, user_id: i64) -> DomainResult<Option<Reservation>> {
        let state = self.state.read().await;
        Ok(state
            .reservations
            .values()
            .find(|r| r.user_id == user_id && r.is_active())
            .cloned())
    }

    async fn find_active_for_slot(&self, slot_id: i64) -> DomainResult<Option<Reservation>> {
        let state = self.state.read().await;
        Ok(state
            .reservations
            .values()
            .find(|r| r.slot_id == slot_id && r.is_active())
            .cloned())
    }
}

// ── LedgerRepository ────────────────────────────────────────────

#[async_trait]
impl LedgerRepository for InMemoryStore {
    async fn recent(&self, limit: u64) -> DomainResult<Vec<LedgerEntry>> {
        let state = self.state.read().await;
        let mut entries = state.ledger.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        entries.truncate(limit as usize);
        Ok(entries)
    }

    async fn find_for_user(&self, user_id: i64) -> DomainResult<Vec<LedgerEntry>> {
        let state = self.state.read().await;
        Ok(state
            .ledger
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_payments(&self) -> DomainResult<Vec<Payment>> {
        let state = self.state.read().await;
        let mut payments: Vec<Payment> = state.payments.values().cloned().collect();
        payments.sort_by_key(|p| p.id);
        Ok(payments)
    }

    async fn find_payment_for_reservation(
        &self,
        reservation_id: i64,
    ) -> DomainResult<Option<Payment>> {
        let state = self.state.read().await;
        Ok(state
            .payments
            .values()
            .find(|p| p.reservation_id == reservation_id)
            .cloned())
    }
}

// ── UtilizationRepository ───────────────────────────────────────

#[async_trait]
impl UtilizationRepository for InMemoryStore {
    async fn all(&self) -> DomainResult<Vec<UtilizationStat>> {
        let state = self.state.read().await;
        let mut stats: Vec<UtilizationStat> = state.stats.values().cloned().collect();
        stats.sort_by(|a, b| {
            (a.slot_id, a.date, a.hour).cmp(&(b.slot_id, b.date, b.hour))
        });
        Ok(stats)
    }
}

// ── UnitOfWork ──────────────────────────────────────────────────

#[async_trait]
impl UnitOfWork for InMemoryStore {
    async fn commit_reservation(
        &self,
        draft: ReservationDraft,
    ) -> DomainResult<CommittedReservation> {
        let mut state = self.state.write().await;

        // Conditional re-checks first: nothing below mutates until both pass,
        // so a rejected commit leaves no partial state.
        let slot_number = match state.slots.get(&draft.slot_id) {
            None => return Err(DomainError::SlotUnavailable),
            Some(slot) if !slot.is_available => {
                return Err(DomainError::ConcurrentConflict(format!(
                    "slot {} was claimed by another request",
                    slot.number
                )))
            }
            Some(slot) => slot.number.clone(),
        };

        let new_balance = {
            let account = state
                .accounts
                .get_mut(&draft.user_id)
                .ok_or_else(|| DomainError::not_found("account", "user_id", draft.user_id))?;
            if account.wallet_balance < draft.total_amount {
                return Err(DomainError::ConcurrentConflict(format!(
                    "wallet balance changed for user {}",
                    draft.user_id
                )));
            }
            account.wallet_balance = account.wallet_balance - draft.total_amount;
            account.wallet_balance
        };

        state.next_reservation_id += 1;
        let reservation = Reservation::new(
            state.next_reservation_id,
            draft.user_id,
            draft.slot_id,
            draft.start_time,
            draft.duration_hours,
            draft.total_amount,
        );
        state
            .reservations
            .insert(reservation.id, reservation.clone());

        let description = format!("reservation charge: slot {}", slot_number);
        state.append_ledger(|id| {
            LedgerEntry::debit(
                id,
                draft.user_id,
                draft.total_amount,
                description,
                draft.start_time,
            )
        });

        state.next_payment_id += 1;
        let payment = Payment {
            id: state.next_payment_id,
            reservation_id: reservation.id,
            user_id: draft.user_id,
            amount: draft.total_amount,
            method: PaymentMethod::Wallet,
            transaction_ref: draft.transaction_ref.clone(),
            status: PaymentStatus::Completed,
            created_at: draft.start_time,
        };
        state.payments.insert(payment.id, payment.clone());

        if let Some(slot) = state.slots.get_mut(&draft.slot_id) {
            slot.is_available = false;
        }

        let local_start = draft.start_time.with_timezone(&Local);
        let key = (draft.slot_id, local_start.date_naive(), local_start.hour());
        let stat = state.stats.entry(key).or_insert_with(|| UtilizationStat {
            slot_id: key.0,
            date: key.1,
            hour: key.2,
            occupancy_count: 0,
            revenue: Money::ZERO,
        });
        stat.occupancy_count += 1;
        stat.revenue += draft.total_amount;

        Ok(CommittedReservation {
            reservation,
            payment,
            new_balance,
        })
    }

    async fn complete_reservation(
        &self,
        reservation_id: i64,
        ended_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let mut state = self.state.write().await;
        let slot_id = {
            let reservation = state
                .reservations
                .get_mut(&reservation_id)
                .ok_or_else(|| {
                    DomainError::not_found("reservation", "reservation_id", reservation_id)
                })?;
            if !reservation.is_active() {
                // No-op: the slot may already be held by a newer reservation.
                return Ok(false);
            }
            reservation.complete(ended_at);
            reservation.slot_id
        };
        if let Some(slot) = state.slots.get_mut(&slot_id) {
            slot.is_available = true;
        }
        Ok(true)
    }

    async fn release_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let mut state = self.state.write().await;
        let expired: Vec<(i64, i64)> = state
            .reservations
            .values()
            .filter(|r| r.is_expired(now))
            .map(|r| (r.id, r.slot_id))
            .collect();
        for (reservation_id, slot_id) in &expired {
            if let Some(reservation) = state.reservations.get_mut(reservation_id) {
                reservation.complete_lapsed();
            }
            if let Some(slot) = state.slots.get_mut(slot_id) {
                slot.is_available = true;
            }
        }
        Ok(expired.len() as u64)
    }

    async fn purge_account(&self, user_id: i64) -> DomainResult<bool> {
        let mut state = self.state.write().await;
        if state.accounts.remove(&user_id).is_none() {
            return Ok(false);
        }
        let active: Vec<(i64, i64)> = state
            .reservations
            .values()
            .filter(|r| r.user_id == user_id && r.is_active())
            .map(|r| (r.id, r.slot_id))
            .collect();
        for (reservation_id, slot_id) in &active {
            if let Some(reservation) = state.reservations.get_mut(reservation_id) {
                reservation.cancel();
            }
            if let Some(slot) = state.slots.get_mut(slot_id) {
                slot.is_available = true;
            }
        }
        state.payments.retain(|_, p| p.user_id != user_id);
        state.ledger.retain(|e| e.user_id != user_id);
        Ok(true)
    }

    async fn reset_history(&self) -> DomainResult<()> {
        let mut state = self.state.write().await;
        state.reservations.clear();
        state.payments.clear();
        state.ledger.clear();
        state.stats.clear();
        for slot in state.slots.values_mut() {
            slot.is_available = true;
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
