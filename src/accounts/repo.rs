use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::accounts::repo_types::{Account, NewAccount};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    UniquenessViolation,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniquenessViolation,
            _ => StoreError::Unavailable(e.to_string()),
        }
    }
}

/// Record store for accounts, keyed by email.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;
    async fn list(&self) -> Result<Vec<Account>, StoreError>;
}

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, role_id, document_number, site, \
                               cohort_number, shift, program_name, created_at";

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    /// Find an account by (already normalised) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    /// Insert a new account. A concurrent registration of the same email
    /// surfaces as `UniquenessViolation` through the table constraint.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let NewAccount {
            name,
            email,
            password_hash,
            role_id,
            profile,
        } = account;
        let created = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role_id, document_number, site,
                               cohort_number, shift, program_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role_id)
        .bind(profile.document_number)
        .bind(profile.site)
        .bind(profile.cohort_number)
        .bind(profile.shift)
        .bind(profile.program_name)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
