//! Voucher eligibility listing.

use anyhow::Result;
use chrono::Utc;
use dash_commerce::checkout::DeliveryCatalog;
use dash_commerce::voucher::{VoucherPartition, VoucherResolver};
use dash_commerce::DeliveryOptionId;

use super::VouchersArgs;
use crate::config::DashConfig;
use crate::context::Context;
use crate::fixture::{load_cart, load_vouchers, pick_snapshot};
use crate::output::voucher_badge;

/// Run the vouchers command.
pub async fn run(args: VouchersArgs, ctx: &Context) -> Result<()> {
    let partition = partition(&args, &ctx.config)?;

    if ctx.output.is_json() {
        ctx.output.json(&partition);
        return Ok(());
    }

    let currency = ctx.config.pricing.currency;
    let now = Utc::now();
    ctx.output.header(&format!("Vouchers ({})", partition.len()));

    for entry in &partition.available {
        let detail = format!("-{}", entry.discount.display(currency));
        ctx.output.table_row(
            &[entry.voucher.code.as_str(), &voucher_badge(true), &detail],
            &[16, 12, 16],
        );
        if entry.voucher.is_expired(now) {
            ctx.output
                .warn(&format!("{} has passed its end date", entry.voucher.code));
        }
    }
    for entry in &partition.unavailable {
        ctx.output.table_row(
            &[
                entry.voucher.code.as_str(),
                &voucher_badge(false),
                entry.reason.message(),
            ],
            &[16, 12, 16],
        );
    }

    if let Some(best) = partition.best() {
        ctx.output.success(&format!(
            "Best voucher: {} ({})",
            best.voucher.code,
            best.discount.display(currency)
        ));
    }
    Ok(())
}

/// Split the voucher fixture for the fixture cart.
pub fn partition(args: &VouchersArgs, config: &DashConfig) -> Result<VoucherPartition> {
    let cart = load_cart(&args.cart)?;
    let snapshot = pick_snapshot(&cart, args.restaurant.as_deref())?;
    let vouchers = load_vouchers(&args.vouchers)?;

    let catalog = DeliveryCatalog::new(config.delivery_options.clone())?;
    let delivery = args
        .delivery
        .as_deref()
        .map(DeliveryOptionId::new)
        .unwrap_or_else(|| config.pricing.default_delivery_option.clone());
    let delivery_price = catalog.resolve(&delivery).price;

    Ok(VoucherResolver::new().partition(snapshot.subtotal(), &vouchers, delivery_price))
}
