//! Account commands.

use clap::Subcommand;

use habitflow_core::users::Accounts;
use habitflow_core::Database;

#[derive(Subcommand)]
pub enum UserAction {
    /// Create an account
    Register {
        email: String,
        username: String,
        password: String,
    },
    /// Log in
    Login {
        email: String,
        password: String,
        /// Remember the email for next time
        #[arg(long)]
        remember: bool,
    },
    /// Log out of the current session
    Logout,
    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update an account's profile
    Update {
        email: String,
        /// New display name
        #[arg(long)]
        username: Option<String>,
        /// New password
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete an account
    Delete { email: String },
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let accounts = Accounts::new(&db);
    match action {
        UserAction::Register {
            email,
            username,
            password,
        } => {
            let user = accounts.register(&email, &username, &password)?;
            println!("registered {} ({})", user.username, user.email);
        }
        UserAction::Login {
            email,
            password,
            remember,
        } => {
            let user = accounts.login(&email, &password, remember)?;
            println!("logged in as {}", user.username);
        }
        UserAction::Logout => {
            accounts.logout()?;
            println!("logged out");
        }
        UserAction::Whoami { json } => match accounts.current()? {
            Some(user) if json => {
                println!("{}", serde_json::to_string_pretty(&user)?);
            }
            Some(user) => println!("{} ({})", user.username, user.email),
            None => println!("not logged in"),
        },
        UserAction::Update {
            email,
            username,
            password,
        } => {
            let user = accounts.update(&email, username.as_deref(), password.as_deref())?;
            println!("account updated: {} ({})", user.username, user.email);
        }
        UserAction::Delete { email } => {
            accounts.delete(&email)?;
            println!("account {email} deleted");
        }
    }
    Ok(())
}
