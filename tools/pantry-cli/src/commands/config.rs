//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Path => show_path(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    ctx.output.info("[store]");
    match &ctx.config.store.data_dir {
        Some(dir) => ctx.output.kv("data_dir", &dir.display().to_string()),
        None => ctx.output.kv("data_dir", "(default)"),
    }

    ctx.output.info("[cart]");
    ctx.output.kv("key_prefix", &ctx.config.cart.key_prefix);
    ctx.output.kv("currency", ctx.config.cart.currency.code());
    ctx.output.kv(
        "max_quantity_per_item",
        &ctx.config.cart.max_quantity_per_item.to_string(),
    );

    ctx.output.info("[session]");
    ctx.output
        .kv("id", ctx.config.session.id.as_deref().unwrap_or("(remembered)"));

    ctx.output.info("[logging]");
    ctx.output.kv("level", &ctx.config.logging.level);
    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    match &ctx.config_path {
        Some(path) => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "path": path }));
            } else {
                println!("{}", path.display());
            }
        }
        None => ctx.output.info("No config file found; using defaults."),
    }
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created {}", config_path.display()));
    Ok(())
}
