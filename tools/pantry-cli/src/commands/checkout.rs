//! Checkout command.

use anyhow::{bail, Result};
use chrono::Local;
use dialoguer::Confirm;

use super::ConfirmArgs;
use crate::context::Context;
use crate::output::format_money;

/// Run the checkout command.
pub fn run(args: ConfirmArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    if cart.is_empty() {
        bail!("Nothing to check out: the cart is empty");
    }

    if !ctx.output.is_json() {
        ctx.output.header("Checkout");
        ctx.output.cart_table(&cart.summary()?);
    }

    if !args.yes && !ctx.output.is_json() {
        println!();
        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {}?", format_money(&cart.total()?)))
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let receipt = cart.checkout()?;
    tracing::info!(receipt = %receipt.id, session = %receipt.session_id, "order placed");

    if ctx.output.is_json() {
        ctx.output.json(&receipt);
        return Ok(());
    }

    ctx.output.success("Order placed");
    ctx.output.kv("Receipt", receipt.id.as_str());
    ctx.output.kv(
        "Placed",
        &receipt
            .placed_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    );
    ctx.output.kv("Items", &receipt.item_count.to_string());
    ctx.output.kv("Charged", &format_money(&receipt.total));
    Ok(())
}
