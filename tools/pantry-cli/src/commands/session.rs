//! Session commands.

use anyhow::Result;

use super::{SessionArgs, SessionCommand};
use crate::context::Context;

/// Run the session command.
pub fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(SessionCommand::Show) | None => show_session(ctx),
        Some(SessionCommand::New) => new_session(ctx),
    }
}

fn show_session(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "session_id": cart.session_id(),
            "storage_key": cart.storage_key(),
            "item_count": cart.item_count(),
            "updated_at": cart.updated_at(),
        }));
        return Ok(());
    }

    ctx.output.kv("Session", cart.session_id().as_str());
    ctx.output.kv("Storage key", cart.storage_key());
    ctx.output.kv("Items", &cart.item_count().to_string());
    Ok(())
}

fn new_session(ctx: &Context) -> Result<()> {
    if ctx.config.session.id.is_some() {
        ctx.output
            .warn("A session id is fixed in the config file; it takes precedence over the new session");
    }
    let id = ctx.start_session()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "session_id": id }));
        return Ok(());
    }
    ctx.output.success(&format!("Started session {}", id));
    Ok(())
}
