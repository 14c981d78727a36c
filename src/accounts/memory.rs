use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::accounts::{
    repo::{AccountStore, StoreError},
    repo_types::{Account, NewAccount},
};

/// How the in-memory store misbehaves, if at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fault {
    #[default]
    None,
    /// Every call fails as if the database were down.
    Down,
    /// Every call hangs forever.
    Hang,
    /// Lookups by email miss, so only the insert-time constraint catches duplicates.
    StaleReads,
}

/// Account store kept in a `Vec`, enforcing email uniqueness on insert.
#[derive(Default)]
pub struct MemoryAccountStore {
    rows: Mutex<Vec<Account>>,
    fault: Fault,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fault(fault: Fault) -> Self {
        Self {
            rows: Mutex::default(),
            fault,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    async fn check(&self) -> Result<(), StoreError> {
        match self.fault {
            Fault::Down => Err(StoreError::Unavailable("connection refused".into())),
            Fault::Hang => std::future::pending().await,
            Fault::None | Fault::StaleReads => Ok(()),
        }
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.check().await?;
        if self.fault == Fault::StaleReads {
            return Ok(None);
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.check().await?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        self.check().await?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|a| a.email == account.email) {
            return Err(StoreError::UniquenessViolation);
        }
        let created = Account {
            id: Uuid::new_v4(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            role_id: account.role_id,
            profile: account.profile,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        self.check().await?;
        Ok(self.rows.lock().unwrap().clone())
    }
}
