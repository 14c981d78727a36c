use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::accounts::{jwt::JwtKeys, repo::PgAccountStore, services::AccountService};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connects the pool and wires the account service. Returns the pool too so
    /// `main` can apply the schema before serving.
    pub async fn init() -> anyhow::Result<(Self, PgPool)> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(config.database.timeout())
            .connect(&config.database.url)
            .await
            .context("connect to database")?;

        let accounts = AccountService::new(
            Arc::new(PgAccountStore::new(db.clone())),
            JwtKeys::from_config(&config.jwt),
            config.database.timeout(),
        );

        Ok((Self { accounts, config }, db))
    }

    #[cfg(test)]
    pub fn from_parts(accounts: AccountService, config: Arc<AppConfig>) -> Self {
        Self { accounts, config }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.keys().clone()
    }
}
