//! Offline checkout pricing.

use anyhow::{anyhow, Result};
use dash_commerce::checkout::{CheckoutPreferences, DeliveryCatalog, ShippingQuote};
use dash_commerce::pricing::{PriceBreakdown, PricingEngine, ShippingFeeSource};
use dash_commerce::{Currency, DeliveryOptionId, Money};

use super::QuoteArgs;
use crate::config::DashConfig;
use crate::context::Context;
use crate::fixture::{load_cart, load_vouchers, pick_snapshot};
use crate::output::format_amount;

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let breakdown = price(&args, &ctx.config)?;

    if ctx.output.is_json() {
        ctx.output.json(&breakdown);
        return Ok(());
    }

    let currency = ctx.config.pricing.currency;
    ctx.output.header("Price breakdown");
    print_line(ctx, "Subtotal", breakdown.subtotal, currency);
    let shipping_label = match &breakdown.shipping_source {
        ShippingFeeSource::DeliveryOption { id } => format!("Shipping ({})", id),
        ShippingFeeSource::Quote { distance_km } => format!("Shipping ({:.1} km)", distance_km),
    };
    print_line(ctx, &shipping_label, breakdown.shipping_fee, currency);
    print_line(ctx, "Platform fee", breakdown.platform_fee, currency);
    print_line(ctx, "Tip", breakdown.tip_amount, currency);
    if let Some(voucher) = &breakdown.applied_voucher {
        print_line(
            ctx,
            &format!("Discount ({})", voucher),
            Money::ZERO - breakdown.discount_amount,
            currency,
        );
    }
    print_line(ctx, "Total", breakdown.total, currency);

    if let Some(reason) = &breakdown.voucher_unavailable {
        ctx.output.warn(&format!("Voucher not applied: {}", reason));
    }
    Ok(())
}

fn print_line(ctx: &Context, label: &str, amount: Money, currency: Currency) {
    ctx.output
        .table_row(&[label, &format_amount(amount, currency)], &[24, 12]);
}

/// Price the fixture cart under the options in `args`.
pub fn price(args: &QuoteArgs, config: &DashConfig) -> Result<PriceBreakdown> {
    let cart = load_cart(&args.cart)?;
    let snapshot = pick_snapshot(&cart, args.restaurant.as_deref())?;

    let catalog = DeliveryCatalog::new(config.delivery_options.clone())?;
    let engine = PricingEngine::new(config.pricing.clone(), catalog);

    let delivery = args
        .delivery
        .as_deref()
        .map(DeliveryOptionId::new)
        .unwrap_or_else(|| config.pricing.default_delivery_option.clone());
    let mut preferences = CheckoutPreferences::with_delivery_option(delivery);
    preferences.tip_amount = Money::new(args.tip).non_negative();

    if let (Some(code), Some(path)) = (&args.voucher, &args.vouchers) {
        let catalog = load_vouchers(path)?;
        let voucher = catalog
            .into_iter()
            .find(|v| &v.code == code)
            .ok_or_else(|| anyhow!("Voucher {} is not in {}", code, path.display()))?;
        preferences.selected_voucher = Some(voucher);
    }

    let quote = args
        .shipping_fee
        .map(|fee| ShippingQuote::new(Money::new(fee), args.distance));

    Ok(engine.compute(&snapshot, &preferences, quote.as_ref()))
}
