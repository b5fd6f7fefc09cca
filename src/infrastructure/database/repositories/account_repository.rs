//! SeaORM implementation of AccountRepository
//!
//! Wallet mutations run inside a transaction together with their paired
//! ledger entry; the debit is a conditional UPDATE so concurrent debits can
//! never drive a balance negative.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::db_err;
use crate::domain::{
    Account, AccountRepository, DomainError, DomainResult, EntryKind, Money, NewAccount,
};
use crate::infrastructure::database::entities::{user, wallet_transaction};

pub struct SeaOrmAccountRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn model_to_domain(m: user::Model) -> Account {
    Account {
        id: m.id,
        login_id: m.login_id,
        display_name: m.display_name,
        email: m.email,
        phone: m.phone,
        vehicle_number: m.vehicle_number,
        wallet_balance: Money::from_cents(m.wallet_balance_cents),
        credential_hash: m.credential_hash,
        created_at: m.created_at,
    }
}

// ── AccountRepository impl ──────────────────────────────────────

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn insert(&self, account: NewAccount) -> DomainResult<Account> {
        debug!("Registering account {}", account.login_id);

        let login_taken = user::Entity::find()
            .filter(user::Column::LoginId.eq(account.login_id.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if login_taken.is_some() {
            return Err(DomainError::Conflict(format!(
                "login {} already exists",
                account.login_id
            )));
        }
        let email_taken = user::Entity::find()
            .filter(user::Column::Email.eq(account.email.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if email_taken.is_some() {
            return Err(DomainError::Conflict(format!(
                "email {} already exists",
                account.email
            )));
        }

        let model = user::ActiveModel {
            id: NotSet,
            login_id: Set(account.login_id),
            display_name: Set(account.display_name),
            email: Set(account.email),
            phone: Set(account.phone),
            vehicle_number: Set(account.vehicle_number),
            wallet_balance_cents: Set(account.wallet_balance.cents()),
            credential_hash: Set(account.credential_hash),
            created_at: Set(Utc::now()),
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, user_id: i64) -> DomainResult<Option<Account>> {
        let model = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_login(&self, login_id: &str) -> DomainResult<Option<Account>> {
        let model = user::Entity::find()
            .filter(user::Column::LoginId.eq(login_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_all(&self) -> DomainResult<Vec<Account>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn credit(&self, user_id: i64, amount: Money, description: &str) -> DomainResult<Money> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount);
        }

        let txn = self.db.begin().await.map_err(db_err)?;

        let updated = user::Entity::update_many()
            .col_expr(
                user::Column::WalletBalanceCents,
                Expr::col(user::Column::WalletBalanceCents).add(amount.cents()),
            )
            .filter(user::Column::Id.eq(user_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if updated.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::not_found("account", "user_id", user_id));
        }

        let entry = wallet_transaction::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            amount_cents: Set(amount.cents()),
            kind: Set(EntryKind::Credit.as_str().to_string()),
            description: Set(description.to_string()),
            created_at: Set(Utc::now()),
        };
        entry.insert(&txn).await.map_err(db_err)?;

        let balance = user::Entity::find_by_id(user_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("account", "user_id", user_id))?
            .wallet_balance_cents;

        txn.commit().await.map_err(db_err)?;
        debug!("Credited user {}: {}", user_id, amount);
        Ok(Money::from_cents(balance))
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

        let txn = self.db.begin().await.map_err(db_err)?;

        // Conditional decrement: no row is touched unless the balance covers
        // the amount, closing the read-then-write race.
        let updated = user::Entity::update_many()
            .col_expr(
                user::Column::WalletBalanceCents,
                Expr::col(user::Column::WalletBalanceCents).sub(amount.cents()),
            )
            .filter(user::Column::Id.eq(user_id))
            .filter(user::Column::WalletBalanceCents.gte(amount.cents()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if updated.rows_affected == 0 {
            let exists = user::Entity::find_by_id(user_id)
                .one(&txn)
                .await
                .map_err(db_err)?
                .is_some();
            txn.rollback().await.map_err(db_err)?;
            if !exists {
                return Err(DomainError::not_found("account", "user_id", user_id));
            }
            return Ok(false);
        }

        let entry = wallet_transaction::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            amount_cents: Set(-amount.cents()),
            kind: Set(EntryKind::Debit.as_str().to_string()),
            description: Set(description.to_string()),
            created_at: Set(Utc::now()),
        };
        entry.insert(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(true)
    }
}
