//! SeaORM implementation of LedgerRepository

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::db_err;
use crate::domain::{
    DomainResult, EntryKind, LedgerEntry, LedgerRepository, Money, Payment, PaymentMethod,
    PaymentStatus,
};
use crate::infrastructure::database::entities::{payment, wallet_transaction};

pub struct SeaOrmLedgerRepository {
    db: DatabaseConnection,
}

impl SeaOrmLedgerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn entry_to_domain(m: wallet_transaction::Model) -> LedgerEntry {
    LedgerEntry {
        id: m.id,
        user_id: m.user_id,
        amount: Money::from_cents(m.amount_cents),
        kind: EntryKind::from_stored(&m.kind),
        description: m.description,
        created_at: m.created_at,
    }
}

pub(super) fn payment_to_domain(m: payment::Model) -> Payment {
    Payment {
        id: m.id,
        reservation_id: m.reservation_id,
        user_id: m.user_id,
        amount: Money::from_cents(m.amount_cents),
        method: PaymentMethod::from_stored(&m.method),
        transaction_ref: m.transaction_ref,
        status: PaymentStatus::from_stored(&m.status),
        created_at: m.created_at,
    }
}

// ── LedgerRepository impl ───────────────────────────────────────

#[async_trait]
impl LedgerRepository for SeaOrmLedgerRepository {
    async fn recent(&self, limit: u64) -> DomainResult<Vec<LedgerEntry>> {
        let models = wallet_transaction::Entity::find()
            .order_by_desc(wallet_transaction::Column::CreatedAt)
            .order_by_desc(wallet_transaction::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entry_to_domain).collect())
    }

    async fn find_for_user(&self, user_id: i64) -> DomainResult<Vec<LedgerEntry>> {
        let models = wallet_transaction::Entity::find()
            .filter(wallet_transaction::Column::UserId.eq(user_id))
            .order_by_asc(wallet_transaction::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entry_to_domain).collect())
    }

    async fn list_payments(&self) -> DomainResult<Vec<Payment>> {
        let models = payment::Entity::find()
            .order_by_asc(payment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(payment_to_domain).collect())
    }

    async fn find_payment_for_reservation(
        &self,
        reservation_id: i64,
    ) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find()
            .filter(payment::Column::ReservationId.eq(reservation_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(payment_to_domain))
    }
}
