use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::accounts::{
    error::{AccountError, FieldError},
    repo_types::{Account, ProfileAttributes},
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails are compared case-insensitively: trimmed and lower-cased everywhere.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Boundary check turning a raw request body into service input.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, AccountError>;
}

/// Profile values are free text, but clients may send them as JSON numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Request body for registration. Accepts the legacy Spanish field names.
/// Missing fields deserialize as empty and are reported by `validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    #[serde(alias = "nombre")]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "n_documento_identidad", deserialize_with = "string_or_number")]
    pub document_number: String,
    #[serde(alias = "sede", deserialize_with = "string_or_number")]
    pub site: String,
    #[serde(alias = "n_ficha", deserialize_with = "string_or_number")]
    pub cohort_number: String,
    #[serde(alias = "jornada", deserialize_with = "string_or_number")]
    pub shift: String,
    #[serde(alias = "nombre_del_programa", deserialize_with = "string_or_number")]
    pub program_name: String,
}

/// Registration input after boundary validation.
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub name: String,
    pub email: String,
    pub password: String,
    pub profile: ProfileAttributes,
}

impl Validate for RegisterRequest {
    type Valid = Enrollment;

    fn validate(self) -> Result<Enrollment, AccountError> {
        let email = normalize_email(&self.email);
        let mut errors = Vec::new();
        if blank(&self.name) {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Email is not valid"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        let profile_fields = [
            ("document_number", &self.document_number, "Identity document number is required"),
            ("site", &self.site, "Site is required"),
            ("cohort_number", &self.cohort_number, "Cohort number is required"),
            ("shift", &self.shift, "Shift is required"),
            ("program_name", &self.program_name, "Program name is required"),
        ];
        for (field, value, message) in profile_fields {
            if blank(value) {
                errors.push(FieldError::new(field, message));
            }
        }
        if !errors.is_empty() {
            return Err(AccountError::ValidationFailed(errors));
        }
        Ok(Enrollment {
            name: self.name,
            email,
            password: self.password,
            profile: ProfileAttributes {
                document_number: self.document_number,
                site: self.site,
                cohort_number: self.cohort_number,
                shift: self.shift,
                program_name: self.program_name,
            },
        })
    }
}

/// Request body for login.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login input: normalised email and the raw password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    type Valid = Credentials;

    fn validate(self) -> Result<Credentials, AccountError> {
        let email = normalize_email(&self.email);
        let mut errors = Vec::new();
        if !is_valid_email(&email) {
            errors.push(FieldError::new("email", "Email is not valid"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        if !errors.is_empty() {
            return Err(AccountError::ValidationFailed(errors));
        }
        Ok(Credentials {
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Account as returned to clients; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct PublicAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role_id: i16,
    #[serde(flatten)]
    pub profile: ProfileAttributes,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Account> for PublicAccount {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            role_id: a.role_id,
            profile: a.profile,
            created_at: a.created_at,
        }
    }
}
