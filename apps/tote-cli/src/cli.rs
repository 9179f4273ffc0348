//! Command-line surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tote")]
#[command(author, version, about = "Browse the catalog, keep favorites and fill a cart")]
pub struct Cli {
    /// Remote settings file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Message language (`en`, `es`, `es-MX`, ...)
    #[arg(long, global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorite products
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Try the account flows against the in-memory backend
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CatalogAction {
    /// Fetch the catalog and store it locally
    Refresh,
    /// List cached products
    List {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List catalog categories
    Categories,
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Add a cached product, or one more of it
    Add { product_id: i64 },
    /// Show cart lines and totals
    List,
    /// Increase a line's quantity by one
    Inc { product_id: i64 },
    /// Decrease a line's quantity by one
    Dec { product_id: i64 },
    /// Remove a line
    Remove { product_id: i64 },
    /// Place a mock order and empty the cart
    Checkout,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// Flip the favorite flag of a cached product
    Toggle { product_id: i64 },
    /// List favorites
    List,
}

#[derive(Debug, Subcommand)]
pub enum AccountAction {
    /// Create an account and store its details
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// Birthdate as YYYY-MM-DD
        #[arg(long)]
        birthdate: Option<chrono::NaiveDate>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add_with_global_locale() {
        let cli = Cli::parse_from(["tote", "cart", "add", "7", "--locale", "es"]);

        assert_eq!(cli.locale.as_deref(), Some("es"));
        assert!(matches!(
            cli.command,
            Command::Cart {
                action: CartAction::Add { product_id: 7 }
            }
        ));
    }

    #[test]
    fn test_parse_register_birthdate() {
        let cli = Cli::parse_from([
            "tote", "account", "register", "-e", "ada@example.com", "-p", "secret1",
            "--birthdate", "1989-03-02",
        ]);

        match cli.command {
            Command::Account {
                action: AccountAction::Register { birthdate, name, .. },
            } => {
                assert_eq!(birthdate, chrono::NaiveDate::from_ymd_opt(1989, 3, 2));
                assert_eq!(name, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
