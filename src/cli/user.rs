//! User CLI commands
//!
//! Thin wrappers over an [`IdentityProvider`]; provider errors are shown to
//! the user as-is.

use clap::Subcommand;

use crate::error::BudgetResult;
use crate::identity::{IdentityProvider, Role};

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Show who is signed in
    Whoami,

    /// Sign in by email
    SignIn {
        email: String,
    },

    /// Sign out
    SignOut,

    /// Add a user (the first user becomes an admin)
    Add {
        email: String,
        /// Full name
        #[arg(short, long, default_value = "")]
        name: String,
        /// Role: admin or user
        #[arg(short, long, default_value = "user")]
        role: Role,
    },

    /// Delete a user by email or ID
    Delete {
        user: String,
    },

    /// List all users
    List,
}

/// Handle a user command
pub fn handle_user_command(identity: &dyn IdentityProvider, cmd: UserCommands) -> BudgetResult<()> {
    match cmd {
        UserCommands::Whoami => match identity.current_user()? {
            Some(user) => println!("Signed in as {}", user),
            None => println!("Not signed in."),
        },

        UserCommands::SignIn { email } => {
            let user = identity.sign_in(&email)?;
            println!("Signed in as {}", user);
        }

        UserCommands::SignOut => {
            identity.sign_out()?;
            println!("Signed out.");
        }

        UserCommands::Add { email, name, role } => {
            let user = identity.create_user(&email, &name, role)?;
            println!("Created user: {}", user);
            println!("  ID: {}", user.id);
        }

        UserCommands::Delete { user } => {
            let removed = identity.delete_user(&user)?;
            println!("Deleted user: {}", removed.email);
        }

        UserCommands::List => {
            let users = identity.list_users()?;
            if users.is_empty() {
                println!("No users found.");
            }
            for user in users {
                println!("{}  {}", user.id, user);
            }
        }
    }

    Ok(())
}
