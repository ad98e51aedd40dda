//! Category management commands.

use clap::Subcommand;

use habitflow_core::{Category, Database};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Create a custom category
    Add {
        /// Category name
        name: String,
        /// Category ID (default: derived from the name)
        #[arg(long)]
        id: Option<String>,
    },
    /// List categories (built-in ones are seeded on first use)
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a category
    Delete {
        /// Category ID
        id: String,
    },
}

pub fn run(action: CategoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    db.seed_default_categories()?;

    match action {
        CategoryAction::Add { name, id } => {
            let id = id.unwrap_or_else(|| {
                format!("custom_{}", name.to_lowercase().replace(char::is_whitespace, "_"))
            });
            let cat = Category::custom(&id, &name)?;
            db.create_category(&cat)?;
            println!("{}", serde_json::to_string_pretty(&cat)?);
        }
        CategoryAction::List { json } => {
            let cats = db.list_categories()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cats)?);
            } else {
                for c in cats {
                    let kind = if c.is_custom {
                        "custom"
                    } else if c.is_premium {
                        "built-in, premium"
                    } else {
                        "built-in"
                    };
                    println!("{}  {} ({kind}, {} entries)", c.id, c.name, c.entry_count);
                }
            }
        }
        CategoryAction::Delete { id } => {
            let Some(cat) = db.get_category(&id)? else {
                return Err(format!("no category with id {id}").into());
            };
            if !cat.can_edit() {
                return Err(format!("category '{}' is locked", cat.name).into());
            }
            db.delete_category(&id)?;
            println!("category {id} deleted");
        }
    }
    Ok(())
}
