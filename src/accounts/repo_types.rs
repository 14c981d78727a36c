use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Role assigned to every self-registered account ("standard user").
pub const DEFAULT_ROLE_ID: i16 = 2;

/// Profile data stored with an account. Not interpreted by the credential logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProfileAttributes {
    pub document_number: String,
    pub site: String,
    pub cohort_number: String,
    pub shift: String,
    pub program_name: String,
}

/// Account record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, never exposed in JSON
    pub role_id: i16,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: ProfileAttributes,
    pub created_at: OffsetDateTime,
}

/// Values for an insert; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i16,
    pub profile: ProfileAttributes,
}
