//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod session;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Catalog product ID.
    pub product_id: String,

    /// Product name.
    #[arg(short, long)]
    pub name: String,

    /// Unit price as a decimal, e.g. 3.49.
    #[arg(short, long)]
    pub price: String,

    /// Product image URL.
    #[arg(long)]
    pub image: Option<String>,

    /// Units to add.
    #[arg(short, long, default_value = "1")]
    pub qty: i64,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Catalog product ID.
    pub product_id: String,

    /// New quantity; zero or less removes the item.
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,

    /// Fail if the product is not in the cart.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Catalog product ID.
    pub product_id: String,
}

/// Arguments for commands that ask for confirmation.
#[derive(Args)]
pub struct ConfirmArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: Option<SessionCommand>,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Show the current session.
    Show,
    /// Start a new session with an empty cart.
    New,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Print the path of the loaded config file.
    Path,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
