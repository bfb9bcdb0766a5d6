//! Remote cart commands.
//!
//! State is persisted under the configured data directory, so `dash cart show`
//! works offline with whatever the last command left behind.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use dash_cache::{FileStore, KvStore};
use dash_commerce::cart::{CartSnapshot, NewLineItemRequest, QuantityDirection};
use dash_commerce::{CheckoutContext, Currency, Gateways, LineItemId};
use dash_data::HttpGateway;

use super::{CartArgs, CartCommand, Direction};
use crate::context::Context;
use crate::output::format_amount;

/// Environment variable holding the bearer token.
pub const TOKEN_VAR: &str = "DASH_TOKEN";

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let checkout = open(args.token, ctx)?;
    let cart = checkout.cart();

    let snapshots = match args.command {
        CartCommand::Show => cart.snapshots(),
        CartCommand::Refresh => cart.refresh().await?,
        CartCommand::Add {
            restaurant,
            food,
            quantity,
        } => {
            cart.add_item(NewLineItemRequest::new(restaurant, food, quantity))
                .await?
        }
        CartCommand::Remove { line_item } => cart.remove_item(&LineItemId::new(line_item)).await?,
        CartCommand::Step {
            line_item,
            direction,
        } => {
            let id = LineItemId::new(line_item);
            let current = cart
                .snapshots()
                .iter()
                .find_map(|s| s.line_item(&id).map(|i| i.quantity))
                .with_context(|| format!("Line item {} is not in the local cart; run `dash cart refresh`", id))?;
            let (quantity, direction) = match direction {
                Direction::Increase => (current.saturating_add(1), QuantityDirection::Increase),
                Direction::Decrease => (current.saturating_sub(1), QuantityDirection::Decrease),
            };
            cart.update_quantity(&id, quantity, direction).await?
        }
        CartCommand::Clear => {
            cart.clear_all().await?;
            ctx.output.success("Cart cleared");
            Vec::new()
        }
    };

    checkout.teardown();
    print_cart(ctx, &snapshots, ctx.config.pricing.currency);
    Ok(())
}

fn open(token: Option<String>, ctx: &Context) -> Result<CheckoutContext> {
    let mut gateway = HttpGateway::from_config(&ctx.config.gateway)
        .with_context(|| format!("Invalid gateway config: {}", ctx.config.gateway.base_url))?;
    if let Some(token) = token.or_else(|| std::env::var(TOKEN_VAR).ok()) {
        gateway = gateway.with_bearer_token(token);
    }

    let data_dir = ctx.data_dir();
    let store: Arc<dyn KvStore> = Arc::new(
        FileStore::open(&data_dir)
            .with_context(|| format!("Failed to open state directory: {}", data_dir.display()))?,
    );

    let checkout = CheckoutContext::new(
        Gateways::from_shared(Arc::new(gateway)),
        ctx.config.checkout(),
        Some(store),
    )?;
    Ok(checkout)
}

fn print_cart(ctx: &Context, snapshots: &[CartSnapshot], currency: Currency) {
    if ctx.output.is_json() {
        ctx.output.json(&snapshots);
        return;
    }
    if snapshots.is_empty() {
        ctx.output.info("The cart is empty.");
        return;
    }

    for snapshot in snapshots {
        let title = match &snapshot.restaurant_name {
            Some(name) => format!("{} ({})", name, snapshot.restaurant_id),
            None => snapshot.restaurant_id.to_string(),
        };
        ctx.output.header(&title);
        for item in &snapshot.items {
            let name = item.name.clone().unwrap_or_else(|| item.food_id.to_string());
            ctx.output.table_row(
                &[
                    item.id.as_str(),
                    &format!("{} x{}", name, item.quantity),
                    &format_amount(item.line_total(), currency),
                ],
                &[10, 28, 12],
            );
        }
        ctx.output.kv("Subtotal", &snapshot.subtotal().display(currency));
    }
}
