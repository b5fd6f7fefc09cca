//! Account and wallet service

use std::sync::Arc;

use log::info;
use validator::Validate;

use crate::domain::{
    Account, DomainError, DomainResult, LedgerEntry, Money, NewAccount, RegisterAccount,
    RepositoryProvider,
};

pub struct AccountService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AccountService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Register a new account with a zero wallet balance.
    pub async fn register(&self, input: RegisterAccount) -> DomainResult<Account> {
        input
            .validate()
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        if self
            .repos
            .accounts()
            .find_by_login(&input.login_id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "login {} already exists",
                input.login_id
            )));
        }
        if self
            .repos
            .accounts()
            .find_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "email {} already exists",
                input.email
            )));
        }

        let credential_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)
            .map_err(|e| DomainError::Internal(format!("credential hashing failed: {}", e)))?;

        let account = self
            .repos
            .accounts()
            .insert(NewAccount {
                login_id: input.login_id,
                display_name: input.display_name,
                email: input.email,
                phone: input.phone,
                vehicle_number: input.vehicle_number,
                credential_hash,
                wallet_balance: Money::ZERO,
            })
            .await?;

        info!("Account {} registered ({})", account.id, account.login_id);
        Ok(account)
    }

    pub async fn get_account(&self, user_id: i64) -> DomainResult<Account> {
        self.repos
            .accounts()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("account", "user_id", user_id))
    }

    pub async fn list_accounts(&self) -> DomainResult<Vec<Account>> {
        self.repos.accounts().list_all().await
    }

    /// Top up the wallet. Returns the new balance.
    pub async fn credit_wallet(&self, user_id: i64, amount: Money) -> DomainResult<Money> {
        let new_balance = self.repos.accounts().credit(user_id, amount, "top-up").await?;
        info!("Wallet of user {} credited {} -> {}", user_id, amount, new_balance);
        Ok(new_balance)
    }

    /// Check a login/password pair against the stored credential hash.
    pub async fn verify_credentials(&self, login_id: &str, password: &str) -> DomainResult<bool> {
        let Some(account) = self.repos.accounts().find_by_login(login_id).await? else {
            return Ok(false);
        };
        bcrypt::verify(password, &account.credential_hash)
            .map_err(|e| DomainError::Internal(format!("credential verification failed: {}", e)))
    }

    /// Most recent wallet ledger entries, newest first.
    pub async fn transactions(&self, limit: u64) -> DomainResult<Vec<LedgerEntry>> {
        self.repos.ledger().recent(limit).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
