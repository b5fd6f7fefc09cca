//! Account repository interface

use async_trait::async_trait;

use super::model::{Account, NewAccount};
use crate::domain::DomainResult;
use crate::shared::money::Money;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Register a new account; duplicate login or e-mail is a conflict.
    async fn insert(&self, account: NewAccount) -> DomainResult<Account>;

    async fn find_by_id(&self, user_id: i64) -> DomainResult<Option<Account>>;

    async fn find_by_login(&self, login_id: &str) -> DomainResult<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>>;

    async fn list_all(&self) -> DomainResult<Vec<Account>>;

    /// Credit the wallet and append the paired credit ledger entry.
    /// Rejects non-positive amounts. Returns the new balance.
    async fn credit(&self, user_id: i64, amount: Money, description: &str) -> DomainResult<Money>;

    /// Conditional decrement: debits only when `balance >= amount`, appending
    /// the paired debit ledger entry. Returns false when funds are
    /// insufficient; the balance is never driven negative.
    async fn debit_if_sufficient(
        &self,
        user_id: i64,
        amount: Money,
        description: &str,
    ) -> DomainResult<bool>;
}
