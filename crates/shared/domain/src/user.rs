//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{FIELD_EMAIL, FIELD_USERNAME};

/// Fields a user can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Username,
    Email,
}

impl UserField {
    /// Storage column name for this field
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::Username => FIELD_USERNAME,
            UserField::Email => FIELD_EMAIL,
        }
    }
}

impl std::fmt::Display for UserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User domain entity.
///
/// `id` stays `None` until the user is stored. The password field only ever
/// holds the output of a `PasswordHasher`, never raw input.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<Uuid>,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Don't expose the hash in debug output
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl User {
    /// Create a new, not yet stored user
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            username: username.into(),
            password_hash: password_hash.into(),
            name: None,
            email: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the persistence layer has assigned an identifier
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Replace the stored password hash
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Update profile fields
    pub fn update_profile(&mut self, name: Option<String>, email: Option<String>) {
        if name.is_some() {
            self.name = name;
        }
        if email.is_some() {
            self.email = email;
        }
        self.updated_at = Utc::now();
    }

    /// Value of a lookup field, if set
    pub fn field(&self, field: UserField) -> Option<&str> {
        match field {
            UserField::Username => Some(self.username.as_str()),
            UserField::Email => self.email.as_deref(),
        }
    }
}
