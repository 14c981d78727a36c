use std::{future::Future, sync::Arc, time::Duration};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::accounts::{
    dto::Enrollment,
    error::AccountError,
    jwt::JwtKeys,
    password::{hash_password_blocking, verify_decoy_blocking, verify_password_blocking},
    repo::{AccountStore, StoreError},
    repo_types::{Account, NewAccount},
};

/// Enrollment, authentication and listing over an [`AccountStore`].
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    keys: JwtKeys,
    store_timeout: Duration,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, keys: JwtKeys, store_timeout: Duration) -> Self {
        Self {
            store,
            keys,
            store_timeout,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, AccountError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(res) => res.map_err(AccountError::from),
            Err(_) => {
                warn!(op, timeout_ms = self.store_timeout.as_millis() as u64, "store call timed out");
                Err(AccountError::StoreUnavailable(format!("{op} timed out")))
            }
        }
    }

    /// Create an account with a fresh salted hash. Input is expected to have
    /// passed boundary validation already.
    pub async fn enroll(&self, input: Enrollment, role_id: i16) -> Result<Account, AccountError> {
        let Enrollment {
            name,
            email,
            password,
            profile,
        } = input;

        if self
            .bounded("find_by_email", self.store.find_by_email(&email))
            .await?
            .is_some()
        {
            warn!(email = %email, "email already registered");
            return Err(AccountError::AlreadyExists);
        }

        let password_hash = hash_password_blocking(password)
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let new = NewAccount {
            name,
            email,
            password_hash,
            role_id,
            profile,
        };
        let account = match self.bounded("insert", self.store.insert(new)).await {
            Err(AccountError::AlreadyExists) => {
                warn!("email registered concurrently");
                return Err(AccountError::AlreadyExists);
            }
            other => other?,
        };

        info!(account_id = %account.id, email = %account.email, role_id = account.role_id, "account enrolled");
        Ok(account)
    }

    /// Verify credentials and mint a bearer token. Unknown email and wrong
    /// password both yield `InvalidCredentials` after one Argon2 verify.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, AccountError> {
        let Some(account) = self
            .bounded("find_by_email", self.store.find_by_email(email))
            .await?
        else {
            if let Err(e) = verify_decoy_blocking(password.to_owned()).await {
                warn!(error = %e, "decoy verification failed");
            }
            warn!(email = %email, "login unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        let ok = verify_password_blocking(password.to_owned(), account.password_hash.clone())
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?;
        if !ok {
            warn!(email = %email, account_id = %account.id, "login invalid password");
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.keys.sign(account.id, &account.email)?;
        info!(account_id = %account.id, email = %account.email, "account logged in");
        Ok(token)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        let accounts = self.bounded("list", self.store.list()).await?;
        debug!(count = accounts.len(), "accounts listed");
        Ok(accounts)
    }

    pub async fn find_account(&self, id: Uuid) -> Result<Option<Account>, AccountError> {
        self.bounded("find_by_id", self.store.find_by_id(id)).await
    }
}
