//! Cornershop CLI - the storefront from the terminal.
//!
//! Uses the same local store file as the HTTP server, so a login made here
//! is visible to `cornershop-storefront` and the other way round.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and log in
//! cs-cli register --first-name Ada --last-name Lovelace --email ada@example.com
//! cs-cli login --email ada@example.com
//!
//! # Browse
//! cs-cli products --category beauty --page 2
//! cs-cli products --search mascara
//! cs-cli product 1
//!
//! # Cart
//! cs-cli cart add 1
//! cs-cli cart set 1 3
//! cs-cli cart show --shipping express
//! cs-cli cart checkout --address "1 Main St"
//! ```
//!
//! # Commands
//!
//! - `register`, `login`, `logout`, `whoami` - Account and session
//! - `featured`, `products`, `categories`, `product` - Catalog
//! - `cart` - Cart management and checkout
//! - `comments` - Per-product comments
//!
//! Pass `--json` to any command for machine-readable output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use cornershop_core::{ProductId, ShippingOption};

mod commands;
mod context;
mod output;

use context::Context;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Cornershop storefront client")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (does not log in)
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        /// Password (prompted on stdin if omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Password confirmation (prompted on stdin if omitted)
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Log in as a registered account
    Login {
        #[arg(short, long)]
        email: String,

        /// Password (prompted on stdin if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out and empty the cart
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Show featured products
    Featured,
    /// Browse the catalog
    Products {
        /// Only show this category ("All" for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Search titles (takes precedence over --category)
        #[arg(short, long)]
        search: Option<String>,

        /// Page number, 8 products per page
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// List category labels
    Categories,
    /// Show one product with similar products and comments
    Product {
        /// Product id
        id: ProductId,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage product comments
    Comments {
        #[command(subcommand)]
        action: CommentAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show {
        /// Shipping option: free, standard or express
        #[arg(long, default_value = "standard")]
        shipping: ShippingOption,
    },
    /// Add one unit of a product
    Add {
        /// Product id
        id: ProductId,
    },
    /// Set a line's quantity (minimum 1)
    Set {
        /// Product id
        id: ProductId,

        /// New quantity; non-numeric input counts as 1
        quantity: String,

        #[arg(long, default_value = "standard")]
        shipping: ShippingOption,
    },
    /// Remove a line
    Remove {
        /// Product id
        id: ProductId,

        #[arg(long, default_value = "standard")]
        shipping: ShippingOption,
    },
    /// Show the number of items in the cart
    Count,
    /// Confirm the purchase
    Checkout {
        /// Shipping address
        #[arg(short, long)]
        address: String,

        #[arg(long, default_value = "standard")]
        shipping: ShippingOption,
    },
}

#[derive(Subcommand)]
enum CommentAction {
    /// List comments on a product
    List {
        /// Product id
        id: ProductId,
    },
    /// Add a comment to a product
    Add {
        /// Product id
        id: ProductId,

        /// Comment text
        text: String,
    },
    /// Remove a comment by its position (starting at 0)
    Remove {
        /// Product id
        id: ProductId,

        /// Comment index
        index: usize,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cornershop_cli=info,cornershop_storefront=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::from_env(cli.json)?;

    match cli.command {
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
        } => {
            commands::auth::register(
                &ctx,
                commands::auth::RegisterArgs {
                    first_name,
                    last_name,
                    email,
                    password,
                    confirm_password,
                },
            )?;
        }
        Commands::Login { email, password } => commands::auth::login(&ctx, &email, password)?,
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Whoami => commands::auth::whoami(&ctx)?,
        Commands::Featured => commands::catalog::featured(&ctx).await?,
        Commands::Products {
            category,
            search,
            page,
        } => commands::catalog::products(&ctx, category, search, page).await?,
        Commands::Categories => commands::catalog::categories(&ctx).await?,
        Commands::Product { id } => commands::catalog::product(&ctx, id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show { shipping } => commands::cart::show(&ctx, shipping).await?,
            CartAction::Add { id } => commands::cart::add(&ctx, id).await?,
            CartAction::Set {
                id,
                quantity,
                shipping,
            } => commands::cart::set(&ctx, id, &quantity, shipping).await?,
            CartAction::Remove { id, shipping } => {
                commands::cart::remove(&ctx, id, shipping).await?;
            }
            CartAction::Count => commands::cart::count(&ctx)?,
            CartAction::Checkout { address, shipping } => {
                commands::cart::checkout(&ctx, &address, shipping).await?;
            }
        },
        Commands::Comments { action } => match action {
            CommentAction::List { id } => commands::comments::list(&ctx, id)?,
            CommentAction::Add { id, text } => commands::comments::add(&ctx, id, &text)?,
            CommentAction::Remove { id, index } => commands::comments::remove(&ctx, id, index)?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_set() {
        let cli = Cli::try_parse_from(["cs-cli", "cart", "set", "4", "abc", "--shipping", "free"])
            .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Cart {
                action:
                    CartAction::Set {
                        id,
                        quantity,
                        shipping,
                    },
            } => {
                assert_eq!(id, ProductId::new(4));
                assert_eq!(quantity, "abc");
                assert_eq!(shipping, ShippingOption::Free);
            }
            _ => panic!("expected cart set"),
        }
    }

    #[test]
    fn test_unknown_shipping_is_rejected() {
        assert!(Cli::try_parse_from(["cs-cli", "cart", "show", "--shipping", "drone"]).is_err());
    }
}
