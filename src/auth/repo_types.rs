use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::persist::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Resident,
    Admin,
    MunicipalWorker,
}

impl Role {
    /// Admins and municipal workers triage reports.
    pub fn can_triage(self) -> bool {
        matches!(self, Role::Admin | Role::MunicipalWorker)
    }
}

/// Stored account, one element of the `users` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String, // plaintext or an argon2 PHC string
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

/// The `session-user` entry: a user without the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

impl From<&User> for SessionUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            role: u.role,
            registered_at: u.registered_at,
        }
    }
}

impl Record for User {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn unique_field(&self) -> Option<&str> {
        Some(&self.email)
    }

    fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("empty user id".into());
        }
        if self.email.is_empty() {
            return Err("empty email".into());
        }
        Ok(())
    }
}
