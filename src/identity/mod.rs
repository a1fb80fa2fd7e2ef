//! User identity with a pluggable provider
//!
//! The budget core never authenticates anyone itself. Session lookup,
//! sign-in and user administration go through [`IdentityProvider`], and
//! provider errors reach the caller unchanged as [`BudgetError::Identity`].
//!
//! # Architecture
//!
//! - `IdentityProvider` trait defines the interface for identity backends
//! - `LocalIdentity` keeps a user directory and session in local JSON files
//!   and stores no credentials
//!
//! [`BudgetError::Identity`]: crate::error::BudgetError::Identity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BudgetResult;
use crate::models::UserId;

mod local;

pub use local::LocalIdentity;

/// What a user is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("Invalid role '{}': expected 'admin' or 'user'", other)),
        }
    }
}

/// A user known to the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, full_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            full_name: full_name.into(),
            role,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.full_name.is_empty() {
            write!(f, "{} ({})", self.email, self.role)
        } else {
            write!(f, "{} <{}> ({})", self.full_name, self.email, self.role)
        }
    }
}

/// Interface to an identity service
///
/// User administration is restricted to signed-in admins, except that the
/// very first user of an empty directory may be created by anyone and
/// becomes an admin.
pub trait IdentityProvider {
    /// The signed-in user, if any
    fn current_user(&self) -> BudgetResult<Option<User>>;

    /// Start a session for the user with this email
    fn sign_in(&self, email: &str) -> BudgetResult<User>;

    /// End the current session; a no-op when nobody is signed in
    fn sign_out(&self) -> BudgetResult<()>;

    fn create_user(&self, email: &str, full_name: &str, role: Role) -> BudgetResult<User>;

    /// Remove a user by email, full id or short id
    fn delete_user(&self, identifier: &str) -> BudgetResult<User>;

    fn list_users(&self) -> BudgetResult<Vec<User>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_display() {
        let user = User::new("ana@example.com", "Ana", Role::Admin);
        assert_eq!(user.to_string(), "Ana <ana@example.com> (admin)");
        assert!(user.is_admin());

        let user = User::new("bo@example.com", "", Role::User);
        assert_eq!(user.to_string(), "bo@example.com (user)");
    }
}
