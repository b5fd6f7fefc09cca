//! SeaORM implementation of UnitOfWork
//!
//! Every operation here is one database transaction. The reservation commit
//! claims the slot and debits the wallet with conditional UPDATEs checked
//! via `rows_affected`, so two racing requests can never both book a slot
//! or overdraw a balance; a failed condition rolls the whole unit back.

use async_trait::async_trait;
use chrono::{DateTime, Local, Timelike, Utc};
use log::debug;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};

use super::{db_err, ledger_repository, reservation_repository};
use crate::domain::{
    CommittedReservation, DomainError, DomainResult, EntryKind, Money, PaymentMethod,
    PaymentStatus, ReservationDraft, ReservationStatus, UnitOfWork,
};
use crate::infrastructure::database::entities::{
    parking_slot, payment, reservation, user, utilization_stat, wallet_transaction,
};

pub struct SeaOrmUnitOfWork {
    db: DatabaseConnection,
}

impl SeaOrmUnitOfWork {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn commit_reservation(
        &self,
        draft: ReservationDraft,
    ) -> DomainResult<CommittedReservation> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Conditional slot claim.
        let claimed = parking_slot::Entity::update_many()
            .col_expr(parking_slot::Column::IsAvailable, Expr::value(false))
            .filter(parking_slot::Column::Id.eq(draft.slot_id))
            .filter(parking_slot::Column::IsAvailable.eq(true))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if claimed.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::ConcurrentConflict(format!(
                "slot {} is no longer available",
                draft.slot_id
            )));
        }

        let slot = parking_slot::Entity::find_by_id(draft.slot_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::SlotUnavailable)?;

        // Conditional wallet debit; never drives the balance negative.
        let debited = user::Entity::update_many()
            .col_expr(
                user::Column::WalletBalanceCents,
                Expr::col(user::Column::WalletBalanceCents).sub(draft.total_amount.cents()),
            )
            .filter(user::Column::Id.eq(draft.user_id))
            .filter(user::Column::WalletBalanceCents.gte(draft.total_amount.cents()))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if debited.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::ConcurrentConflict(format!(
                "wallet balance changed for user {}",
                draft.user_id
            )));
        }

        let reservation_model = reservation::ActiveModel {
            id: NotSet,
            user_id: Set(draft.user_id),
            slot_id: Set(draft.slot_id),
            start_time: Set(draft.start_time),
            end_time: Set(draft.end_time),
            duration_hours: Set(draft.duration_hours),
            total_amount_cents: Set(draft.total_amount.cents()),
            status: Set(ReservationStatus::Active.as_str().to_string()),
            created_at: Set(draft.start_time),
        };
        let reservation_model = reservation_model.insert(&txn).await.map_err(db_err)?;

        let entry = wallet_transaction::ActiveModel {
            id: NotSet,
            user_id: Set(draft.user_id),
            amount_cents: Set(-draft.total_amount.cents()),
            kind: Set(EntryKind::Debit.as_str().to_string()),
            description: Set(format!("reservation charge: slot {}", slot.number)),
            created_at: Set(draft.start_time),
        };
        entry.insert(&txn).await.map_err(db_err)?;

        let payment_model = payment::ActiveModel {
            id: NotSet,
            reservation_id: Set(reservation_model.id),
            user_id: Set(draft.user_id),
            amount_cents: Set(draft.total_amount.cents()),
            method: Set(PaymentMethod::Wallet.as_str().to_string()),
            transaction_ref: Set(draft.transaction_ref.clone()),
            status: Set(PaymentStatus::Completed.as_str().to_string()),
            created_at: Set(draft.start_time),
        };
        let payment_model = payment_model.insert(&txn).await.map_err(db_err)?;

        // Upsert the utilization bucket for (slot, local date, local hour).
        let local_start = draft.start_time.with_timezone(&Local);
        let key = (
            draft.slot_id,
            local_start.date_naive(),
            local_start.hour() as i32,
        );
        match utilization_stat::Entity::find_by_id(key)
            .one(&txn)
            .await
            .map_err(db_err)?
        {
            Some(existing) => {
                let occupancy = existing.occupancy_count + 1;
                let revenue = existing.revenue_cents + draft.total_amount.cents();
                let mut active = existing.into_active_model();
                active.occupancy_count = Set(occupancy);
                active.revenue_cents = Set(revenue);
                active.update(&txn).await.map_err(db_err)?;
            }
            None => {
                let stat = utilization_stat::ActiveModel {
                    slot_id: Set(key.0),
                    stat_date: Set(key.1),
                    stat_hour: Set(key.2),
                    occupancy_count: Set(1),
                    revenue_cents: Set(draft.total_amount.cents()),
                };
                // composite key: skip the returning/last-insert-id path
                utilization_stat::Entity::insert(stat)
                    .exec_without_returning(&txn)
                    .await
                    .map_err(db_err)?;
            }
        }

        let new_balance = user::Entity::find_by_id(draft.user_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("account", "user_id", draft.user_id))?
            .wallet_balance_cents;

        txn.commit().await.map_err(db_err)?;
        debug!(
            "Committed reservation {} for user {}",
            reservation_model.id, draft.user_id
        );

        Ok(CommittedReservation {
            reservation: reservation_repository::model_to_domain(reservation_model),
            payment: ledger_repository::payment_to_domain(payment_model),
            new_balance: Money::from_cents(new_balance),
        })
    }

    async fn complete_reservation(
        &self,
        reservation_id: i64,
        ended_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(model) = reservation::Entity::find_by_id(reservation_id)
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::not_found(
                "reservation",
                "reservation_id",
                reservation_id,
            ));
        };

        if model.status != ReservationStatus::Active.as_str() {
            // No-op: the slot may already be held by a newer reservation.
            txn.rollback().await.map_err(db_err)?;
            return Ok(false);
        }

        let slot_id = model.slot_id;
        let mut active = model.into_active_model();
        active.status = Set(ReservationStatus::Completed.as_str().to_string());
        active.end_time = Set(ended_at);
        active.update(&txn).await.map_err(db_err)?;

        parking_slot::Entity::update_many()
            .col_expr(parking_slot::Column::IsAvailable, Expr::value(true))
            .filter(parking_slot::Column::Id.eq(slot_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(true)
    }

    async fn release_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let expired = reservation::Entity::find()
            .filter(reservation::Column::Status.eq(ReservationStatus::Active.as_str()))
            .filter(reservation::Column::EndTime.lte(now))
            .all(&txn)
            .await
            .map_err(db_err)?;

        if expired.is_empty() {
            txn.rollback().await.map_err(db_err)?;
            return Ok(0);
        }

        let reservation_ids: Vec<i64> = expired.iter().map(|m| m.id).collect();
        let slot_ids: Vec<i64> = expired.iter().map(|m| m.slot_id).collect();

        // end_time is left untouched: it already marks the paid window end.
        reservation::Entity::update_many()
            .col_expr(
                reservation::Column::Status,
                Expr::value(ReservationStatus::Completed.as_str()),
            )
            .filter(reservation::Column::Id.is_in(reservation_ids))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        parking_slot::Entity::update_many()
            .col_expr(parking_slot::Column::IsAvailable, Expr::value(true))
            .filter(parking_slot::Column::Id.is_in(slot_ids))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(expired.len() as u64)
    }

    async fn purge_account(&self, user_id: i64) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let exists = user::Entity::find_by_id(user_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            txn.rollback().await.map_err(db_err)?;
            return Ok(false);
        }

        let active = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .filter(reservation::Column::Status.eq(ReservationStatus::Active.as_str()))
            .all(&txn)
            .await
            .map_err(db_err)?;

        if !active.is_empty() {
            let reservation_ids: Vec<i64> = active.iter().map(|m| m.id).collect();
            let slot_ids: Vec<i64> = active.iter().map(|m| m.slot_id).collect();

            reservation::Entity::update_many()
                .col_expr(
                    reservation::Column::Status,
                    Expr::value(ReservationStatus::Cancelled.as_str()),
                )
                .filter(reservation::Column::Id.is_in(reservation_ids))
                .exec(&txn)
                .await
                .map_err(db_err)?;

            parking_slot::Entity::update_many()
                .col_expr(parking_slot::Column::IsAvailable, Expr::value(true))
                .filter(parking_slot::Column::Id.is_in(slot_ids))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        payment::Entity::delete_many()
            .filter(payment::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        wallet_transaction::Entity::delete_many()
            .filter(wallet_transaction::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        user::Entity::delete_by_id(user_id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(true)
    }

    async fn reset_history(&self) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        payment::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        reservation::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        wallet_transaction::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        utilization_stat::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?;
        parking_slot::Entity::update_many()
            .col_expr(parking_slot::Column::IsAvailable, Expr::value(true))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}
