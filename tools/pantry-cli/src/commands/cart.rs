//! Cart editing and inspection commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use pantry_cart::{Money, ProductId, ProductSnapshot};

use super::{AddArgs, ConfirmArgs, RemoveArgs, UpdateArgs};
use crate::context::Context;
use crate::output::format_money;

/// Run the add command.
pub fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    let currency = cart.currency();

    let Some(price) = Money::parse(&args.price, currency) else {
        bail!("Invalid price '{}' for {}", args.price, currency);
    };

    let mut product = ProductSnapshot::new(args.product_id, args.name, price);
    if let Some(image) = args.image {
        product = product.with_image(image);
    }

    let quantity = cart
        .add_item_with_quantity(&product, args.qty)
        .with_context(|| format!("Could not add {}", product.product_id))?;

    if ctx.output.is_json() {
        ctx.output.json(&cart.summary()?);
        return Ok(());
    }
    ctx.output.success(&format!(
        "Added {} x {} ({} in cart)",
        args.qty, product.name, quantity
    ));
    ctx.output.kv("Total", &format_money(&cart.total()?));
    Ok(())
}

/// Run the update command.
pub fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    let product_id = ProductId::new(args.product_id);

    if args.strict {
        cart.update_quantity_strict(&product_id, args.quantity)?;
    } else if !cart.update_quantity(&product_id, args.quantity)? {
        ctx.output.warn(&format!("{} is not in the cart", product_id));
        return Ok(());
    }

    if ctx.output.is_json() {
        ctx.output.json(&cart.summary()?);
        return Ok(());
    }
    if args.quantity <= 0 {
        ctx.output.success(&format!("Removed {}", product_id));
    } else {
        ctx.output
            .success(&format!("Set {} to {}", product_id, args.quantity));
    }
    ctx.output.kv("Total", &format_money(&cart.total()?));
    Ok(())
}

/// Run the remove command.
pub fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    let product_id = ProductId::new(args.product_id);

    if !cart.remove_item(&product_id) {
        ctx.output.warn(&format!("{} is not in the cart", product_id));
        return Ok(());
    }

    if ctx.output.is_json() {
        ctx.output.json(&cart.summary()?);
        return Ok(());
    }
    ctx.output.success(&format!("Removed {}", product_id));
    ctx.output.kv("Total", &format_money(&cart.total()?));
    Ok(())
}

/// Run the show command.
pub fn show(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let summary = cart.summary()?;

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    ctx.output.header(&format!("Cart {}", cart.session_id()));
    if summary.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }
    ctx.output.cart_table(&summary);
    Ok(())
}

/// Run the total command.
pub fn total(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let total = cart.total()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "total": total,
            "item_count": cart.item_count(),
            "unique_item_count": cart.unique_item_count(),
        }));
        return Ok(());
    }
    ctx.output.kv("Items", &cart.item_count().to_string());
    ctx.output.kv("Total", &format_money(&total));
    Ok(())
}

/// Run the clear command.
pub fn clear(args: ConfirmArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;
    if cart.is_empty() {
        ctx.output.info("Cart is already empty.");
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", cart.item_count()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    cart.clear();
    if ctx.output.is_json() {
        ctx.output.json(&cart.summary()?);
        return Ok(());
    }
    ctx.output.success("Cart cleared");
    Ok(())
}
