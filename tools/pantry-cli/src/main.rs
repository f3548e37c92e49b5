//! Pantry CLI - command line cart for the Pantry grocery storefront.
//!
//! Commands:
//! - `pantry add` - Add a product to the cart
//! - `pantry update` - Set a product's quantity
//! - `pantry remove` - Remove a product
//! - `pantry show` / `pantry total` - Inspect the cart
//! - `pantry clear` - Empty the cart
//! - `pantry checkout` - Place the order and empty the cart
//! - `pantry session` - Show or rotate the shopper session
//! - `pantry config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

use commands::{AddArgs, ConfigArgs, ConfirmArgs, RemoveArgs, SessionArgs, UpdateArgs};

/// Pantry - manage your grocery cart from the terminal
#[derive(Parser)]
#[command(name = "pantry")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Session ID to operate on (overrides config and remembered session)
    #[arg(short, long, global = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a product to the cart
    Add(AddArgs),

    /// Set a product's quantity (0 removes it)
    Update(UpdateArgs),

    /// Remove a product from the cart
    Remove(RemoveArgs),

    /// Show the cart contents
    Show,

    /// Show the cart total
    Total,

    /// Remove every item from the cart
    Clear(ConfirmArgs),

    /// Place the order and empty the cart
    Checkout(ConfirmArgs),

    /// Show or rotate the shopper session
    Session(SessionArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is up before config discovery; the config level applies once loaded
    let log_handle = init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), cli.session.clone(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if let Some(handle) = log_handle {
        apply_config_level(&handle, &ctx.config.logging.level);
    }

    // Execute command
    let result = match cli.command {
        Commands::Add(args) => commands::cart::add(args, &ctx),
        Commands::Update(args) => commands::cart::update(args, &ctx),
        Commands::Remove(args) => commands::cart::remove(args, &ctx),
        Commands::Show => commands::cart::show(&ctx),
        Commands::Total => commands::cart::total(&ctx),
        Commands::Clear(args) => commands::cart::clear(args, &ctx),
        Commands::Checkout(args) => commands::checkout::run(args, &ctx),
        Commands::Session(args) => commands::session::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

type LogHandle = reload::Handle<EnvFilter, Registry>;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over `--verbose`, which wins over the config level.
/// Returns a handle for applying the config level later, or `None` when
/// the level is already pinned.
fn init_tracing(verbose: bool) -> Option<LogHandle> {
    let (filter, pinned) = startup_filter(EnvFilter::try_from_default_env().ok(), verbose);
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    (!pinned).then_some(handle)
}

/// Filter used until the config is loaded, and whether it is final.
fn startup_filter(from_env: Option<EnvFilter>, verbose: bool) -> (EnvFilter, bool) {
    match from_env {
        Some(filter) => (filter, true),
        None if verbose => (EnvFilter::new("debug"), true),
        None => (EnvFilter::new(DEFAULT_LOG_LEVEL), false),
    }
}

fn apply_config_level(handle: &LogHandle, level: &str) {
    match EnvFilter::try_new(level) {
        Ok(filter) => {
            if let Err(e) = handle.reload(filter) {
                tracing::warn!(error = %e, "failed to apply configured log level");
            }
        }
        Err(e) => tracing::warn!(config_level = %level, error = %e, "invalid log level in config"),
    }
}

const DEFAULT_LOG_LEVEL: &str = "warn";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_filter_precedence() {
        let (filter, pinned) = startup_filter(Some(EnvFilter::new("trace")), true);
        assert!(pinned);
        assert_eq!(filter.to_string(), "trace");

        let (filter, pinned) = startup_filter(None, true);
        assert!(pinned);
        assert_eq!(filter.to_string(), "debug");

        let (filter, pinned) = startup_filter(None, false);
        assert!(!pinned);
        assert_eq!(filter.to_string(), DEFAULT_LOG_LEVEL);
    }
}
