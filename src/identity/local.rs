//! File-backed identity directory
//!
//! Users live in `data/users.json` and the signed-in user id in
//! `data/session.json`. There are no passwords: signing in only selects whose
//! session this is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{IdentityProvider, Role, User};
use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::UserId;
use crate::storage::{read_json, write_json_atomic};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Session {
    user_id: UserId,
    signed_in_at: DateTime<Utc>,
}

/// Identity provider backed by local JSON files
pub struct LocalIdentity {
    paths: BudgetPaths,
    audit: AuditLogger,
}

impl LocalIdentity {
    pub fn new(paths: BudgetPaths, audit: AuditLogger) -> Self {
        Self { paths, audit }
    }

    fn load_users(&self) -> BudgetResult<Vec<User>> {
        read_json(self.paths.users_file())
    }

    fn save_users(&self, users: &[User]) -> BudgetResult<()> {
        write_json_atomic(self.paths.users_file(), &users)
    }

    fn load_session(&self) -> BudgetResult<Option<Session>> {
        read_json(self.paths.session_file())
    }

    fn clear_session(&self) -> BudgetResult<()> {
        let path = self.paths.session_file();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// The signed-in user, who must be an admin
    fn require_admin(&self) -> BudgetResult<User> {
        match self.current_user()? {
            Some(user) if user.is_admin() => Ok(user),
            Some(_) => Err(BudgetError::Identity(
                "Only administrators can manage users".into(),
            )),
            None => Err(BudgetError::Identity("Not signed in".into())),
        }
    }

    fn find_user<'u>(users: &'u [User], identifier: &str) -> Option<&'u User> {
        let identifier = identifier.trim();
        users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(identifier))
            .or_else(|| users.iter().find(|u| u.id.matches(identifier)))
    }
}

fn normalize_email(email: &str) -> BudgetResult<String> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);

    if valid {
        Ok(email)
    } else {
        Err(BudgetError::Validation(format!(
            "Invalid email address: '{}'",
            email
        )))
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_user(&self) -> BudgetResult<Option<User>> {
        let Some(session) = self.load_session()? else {
            return Ok(None);
        };
        let users = self.load_users()?;
        Ok(users.into_iter().find(|u| u.id == session.user_id))
    }

    fn sign_in(&self, email: &str) -> BudgetResult<User> {
        let email = normalize_email(email)?;
        let users = self.load_users()?;
        let user = users
            .into_iter()
            .find(|u| u.email == email)
            .ok_or_else(|| BudgetError::Identity(format!("Invalid login: no user '{}'", email)))?;

        let session = Session {
            user_id: user.id,
            signed_in_at: Utc::now(),
        };
        write_json_atomic(self.paths.session_file(), &session)?;

        info!(user = %user.email, "Signed in");
        Ok(user)
    }

    fn sign_out(&self) -> BudgetResult<()> {
        if let Some(user) = self.current_user()? {
            info!(user = %user.email, "Signed out");
        }
        self.clear_session()
    }

    fn create_user(&self, email: &str, full_name: &str, role: Role) -> BudgetResult<User> {
        let email = normalize_email(email)?;
        let mut users = self.load_users()?;

        let role = if users.is_empty() {
            debug!("Directory is empty, first user becomes admin");
            Role::Admin
        } else {
            self.require_admin()?;
            role
        };

        if users.iter().any(|u| u.email == email) {
            return Err(BudgetError::Identity(format!(
                "A user with email '{}' already exists",
                email
            )));
        }

        let user = User::new(email, full_name.trim(), role);
        users.push(user.clone());
        self.save_users(&users)?;

        self.audit.log(&AuditEntry::create(
            EntityType::User,
            user.id.to_string(),
            Some(user.email.clone()),
            &user,
        ))?;
        info!(user = %user.email, role = %user.role, "Created user");

        Ok(user)
    }

    fn delete_user(&self, identifier: &str) -> BudgetResult<User> {
        let admin = self.require_admin()?;
        let mut users = self.load_users()?;

        let user = Self::find_user(&users, identifier)
            .cloned()
            .ok_or_else(|| BudgetError::user_not_found(identifier))?;

        if user.id == admin.id {
            return Err(BudgetError::Identity(
                "You cannot delete your own account".into(),
            ));
        }

        users.retain(|u| u.id != user.id);
        self.save_users(&users)?;

        self.audit.log(&AuditEntry::delete(
            EntityType::User,
            user.id.to_string(),
            Some(user.email.clone()),
            &user,
        ))?;
        info!(user = %user.email, "Deleted user");

        Ok(user)
    }

    fn list_users(&self) -> BudgetResult<Vec<User>> {
        self.require_admin()?;
        let mut users = self.load_users()?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_identity() -> (TempDir, LocalIdentity) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        let audit = AuditLogger::new(paths.audit_log());
        (temp_dir, LocalIdentity::new(paths, audit))
    }

    #[test]
    fn test_first_user_is_admin() {
        let (_temp_dir, identity) = create_identity();

        let user = identity
            .create_user("Owner@Example.com", "Owner", Role::User)
            .unwrap();
        assert_eq!(user.email, "owner@example.com");
        assert_eq!(user.role, Role::Admin);
        assert!(identity.current_user().unwrap().is_none());
    }

    #[test]
    fn test_sign_in_and_out() {
        let (_temp_dir, identity) = create_identity();
        identity.create_user("owner@example.com", "", Role::Admin).unwrap();

        let user = identity.sign_in("owner@example.com").unwrap();
        assert_eq!(identity.current_user().unwrap(), Some(user));

        identity.sign_out().unwrap();
        assert!(identity.current_user().unwrap().is_none());

        let err = identity.sign_in("nobody@example.com").unwrap_err();
        assert!(matches!(err, BudgetError::Identity(_)));
    }

    #[test]
    fn test_admin_required_for_management() {
        let (_temp_dir, identity) = create_identity();
        identity.create_user("owner@example.com", "", Role::Admin).unwrap();

        let err = identity
            .create_user("second@example.com", "", Role::User)
            .unwrap_err();
        assert_eq!(err.to_string(), "Not signed in");

        identity.sign_in("owner@example.com").unwrap();
        identity
            .create_user("second@example.com", "Second", Role::User)
            .unwrap();
        assert_eq!(identity.list_users().unwrap().len(), 2);

        identity.sign_in("second@example.com").unwrap();
        let err = identity.list_users().unwrap_err();
        assert_eq!(err.to_string(), "Only administrators can manage users");
    }

    #[test]
    fn test_delete_user() {
        let (_temp_dir, identity) = create_identity();
        identity.create_user("owner@example.com", "", Role::Admin).unwrap();
        identity.sign_in("owner@example.com").unwrap();
        identity.create_user("second@example.com", "", Role::User).unwrap();

        assert!(identity.delete_user("owner@example.com").is_err());
        let removed = identity.delete_user("SECOND@example.com").unwrap();
        assert_eq!(removed.email, "second@example.com");
        assert!(identity.delete_user("second@example.com").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_and_invalid_email() {
        let (_temp_dir, identity) = create_identity();
        identity.create_user("owner@example.com", "", Role::Admin).unwrap();
        identity.sign_in("owner@example.com").unwrap();

        assert!(identity.create_user("owner@example.com", "", Role::User).is_err());
        assert!(identity.create_user("not-an-email", "", Role::User).unwrap_err().is_validation());
    }

    #[test]
    fn test_user_changes_are_audited() {
        let (_temp_dir, identity) = create_identity();
        identity.create_user("owner@example.com", "", Role::Admin).unwrap();

        let entries = identity.audit.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_type, EntityType::User);
    }
}
