//! Price breakdown computation.

use crate::cart::CartSnapshot;
use crate::checkout::{CheckoutPreferences, DeliveryCatalog, ShippingQuote};
use crate::ids::{DeliveryOptionId, VoucherId};
use crate::money::Money;
use crate::pricing::{PlatformFee, PricingConfig};
use crate::voucher::{UnavailableReason, VoucherResolver};
use serde::Serialize;

/// Where the shipping fee came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShippingFeeSource {
    /// Flat price of the selected delivery option.
    DeliveryOption { id: DeliveryOptionId },
    /// Distance-based quote for the restaurant and address.
    Quote { distance_km: f64 },
}

/// Derived price of a checkout. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub platform_fee: Money,
    pub tip_amount: Money,
    pub discount_amount: Money,
    /// `subtotal + shipping_fee + platform_fee + tip_amount - discount_amount`, never negative.
    pub total: Money,
    pub shipping_source: ShippingFeeSource,
    /// Selected voucher that produced `discount_amount`.
    pub applied_voucher: Option<VoucherId>,
    /// Why the selected voucher was not applied, if it was not.
    pub voucher_unavailable: Option<UnavailableReason>,
}

impl PriceBreakdown {
    /// Shipping, platform fee and tip.
    pub fn fees(&self) -> Money {
        self.shipping_fee + self.platform_fee + self.tip_amount
    }
}

/// Price `snapshot` under `preferences`.
///
/// 1. Subtotal is Σ `unit_price × quantity`.
/// 2. Shipping is the quote when one is given, otherwise the price of the
///    selected delivery option (unknown options fall back to the first one).
/// 3. Platform fee comes from `platform_fee`.
/// 4. The selected voucher applies only if it is eligible at this subtotal;
///    its discount is clamped to `subtotal + shipping + platform fee`.
///    A selected voucher that has become ineligible (the cart shrank below its
///    minimum spend, or it was deactivated) contributes no discount at all,
///    rather than [`VoucherResolver::compute_discount`] of it, and the reason
///    is reported in `voucher_unavailable`.
/// 5. Total is clamped at zero.
///
/// Deterministic and free of side effects.
pub fn compute_breakdown(
    snapshot: &CartSnapshot,
    preferences: &CheckoutPreferences,
    catalog: &DeliveryCatalog,
    resolver: &VoucherResolver,
    platform_fee: PlatformFee,
    shipping_quote: Option<&ShippingQuote>,
) -> PriceBreakdown {
    let subtotal = snapshot.subtotal();

    let (shipping_fee, shipping_source) = match shipping_quote {
        Some(quote) => (
            quote.fee.non_negative(),
            ShippingFeeSource::Quote {
                distance_km: quote.distance_km,
            },
        ),
        None => {
            let option = catalog.resolve(&preferences.delivery_option_id);
            (
                option.price.non_negative(),
                ShippingFeeSource::DeliveryOption {
                    id: option.id.clone(),
                },
            )
        }
    };

    let platform_fee = platform_fee.amount(subtotal);
    let tip_amount = preferences.tip_amount.non_negative();

    let mut applied_voucher = None;
    let mut voucher_unavailable = None;
    let mut discount_amount = Money::ZERO;
    if let Some(voucher) = &preferences.selected_voucher {
        match resolver.eligibility(voucher, subtotal) {
            Ok(()) => {
                let ceiling = (subtotal + shipping_fee + platform_fee).non_negative();
                discount_amount = resolver
                    .compute_discount(Some(voucher), subtotal, shipping_fee)
                    .min(ceiling);
                applied_voucher = Some(voucher.id.clone());
            }
            Err(reason) => voucher_unavailable = Some(reason),
        }
    }

    let total = (subtotal + shipping_fee + platform_fee + tip_amount - discount_amount).non_negative();

    PriceBreakdown {
        subtotal,
        shipping_fee,
        platform_fee,
        tip_amount,
        discount_amount,
        total,
        shipping_source,
        applied_voucher,
        voucher_unavailable,
    }
}

/// [`compute_breakdown`] bound to a configuration and delivery catalog.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
    catalog: DeliveryCatalog,
    resolver: VoucherResolver,
}

impl PricingEngine {
    /// Create an engine.
    pub fn new(config: PricingConfig, catalog: DeliveryCatalog) -> Self {
        Self {
            config,
            catalog,
            resolver: VoucherResolver::new(),
        }
    }

    /// Price `snapshot` under `preferences`.
    pub fn compute(
        &self,
        snapshot: &CartSnapshot,
        preferences: &CheckoutPreferences,
        shipping_quote: Option<&ShippingQuote>,
    ) -> PriceBreakdown {
        compute_breakdown(
            snapshot,
            preferences,
            &self.catalog,
            &self.resolver,
            self.config.platform_fee,
            shipping_quote,
        )
    }

    /// Flat price of the delivery option selected in `preferences`.
    pub fn delivery_price(&self, preferences: &CheckoutPreferences) -> Money {
        self.catalog.resolve(&preferences.delivery_option_id).price
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn catalog(&self) -> &DeliveryCatalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &VoucherResolver {
        &self.resolver
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default(), DeliveryCatalog::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLineItem;
    use crate::voucher::Voucher;

    fn cart(lines: &[(u32, i64)]) -> CartSnapshot {
        lines
            .iter()
            .enumerate()
            .fold(CartSnapshot::new("r1"), |snapshot, (i, &(qty, price))| {
                snapshot.with_item(CartLineItem::new(
                    format!("li-{}", i),
                    "r1",
                    "food",
                    qty,
                    Money::new(price),
                ))
            })
    }

    #[test]
    fn test_breakdown_without_voucher() {
        let engine = PricingEngine::default();
        let prefs = CheckoutPreferences {
            tip_amount: Money::new(5_000),
            ..CheckoutPreferences::default()
        };

        let b = engine.compute(&cart(&[(2, 20_000), (1, 9_000)]), &prefs, None);

        assert_eq!(b.subtotal, Money::new(49_000));
        assert_eq!(b.shipping_fee, Money::new(15_000));
        assert_eq!(b.platform_fee, Money::new(3_000));
        assert_eq!(b.discount_amount, Money::ZERO);
        assert_eq!(b.total, Money::new(72_000));
        assert_eq!(
            b.shipping_source,
            ShippingFeeSource::DeliveryOption {
                id: DeliveryOptionId::new("standard")
            }
        );
    }

    #[test]
    fn test_quote_overrides_delivery_option() {
        let engine = PricingEngine::default();
        let quote = ShippingQuote::new(Money::new(21_000), 4.2);

        let b = engine.compute(&cart(&[(1, 50_000)]), &CheckoutPreferences::default(), Some(&quote));

        assert_eq!(b.shipping_fee, Money::new(21_000));
        assert_eq!(b.shipping_source, ShippingFeeSource::Quote { distance_km: 4.2 });
    }

    #[test]
    fn test_capped_percent_voucher_in_total() {
        let engine = PricingEngine::default();
        let prefs = CheckoutPreferences {
            selected_voucher: Some(
                Voucher::percent("SALE15", 15)
                    .with_max_discount(Money::new(10_000))
                    .with_min_order_value(Money::new(45_000)),
            ),
            ..CheckoutPreferences::default()
        };

        let b = engine.compute(&cart(&[(1, 100_000)]), &prefs, None);

        assert_eq!(b.discount_amount, Money::new(10_000));
        assert_eq!(b.total, Money::new(100_000 + 15_000 + 3_000 - 10_000));
        assert_eq!(b.applied_voucher, Some(VoucherId::new("SALE15")));
    }

    #[test]
    fn test_ineligible_voucher_not_applied() {
        let engine = PricingEngine::default();
        let prefs = CheckoutPreferences {
            selected_voucher: Some(
                Voucher::percent("SALE15", 15).with_min_order_value(Money::new(45_000)),
            ),
            ..CheckoutPreferences::default()
        };

        let b = engine.compute(&cart(&[(1, 30_000)]), &prefs, None);

        assert_eq!(b.discount_amount, Money::ZERO);
        assert!(b.applied_voucher.is_none());
        assert!(matches!(
            b.voucher_unavailable,
            Some(UnavailableReason::MinimumSpendNotReached { .. })
        ));
    }

    #[test]
    fn test_shipping_voucher_uses_selected_option() {
        let engine = PricingEngine::default();
        let prefs = CheckoutPreferences {
            selected_voucher: Some(Voucher::shipping("SHIP50", 50).with_max_discount(Money::new(20_000))),
            ..CheckoutPreferences::default()
        };

        let b = engine.compute(&cart(&[(1, 60_000)]), &prefs, None);
        assert_eq!(b.discount_amount, Money::new(7_500));
    }

    #[test]
    fn test_rate_platform_fee() {
        let config = PricingConfig {
            platform_fee: PlatformFee::RateBps(500),
            ..PricingConfig::default()
        };
        let engine = PricingEngine::new(config, DeliveryCatalog::default());

        let b = engine.compute(&cart(&[(2, 20_000), (1, 9_000)]), &CheckoutPreferences::default(), None);
        assert_eq!(b.platform_fee, Money::new(2_450));
    }

    #[test]
    fn test_huge_fixed_voucher_clamped() {
        let engine = PricingEngine::default();
        let prefs = CheckoutPreferences {
            selected_voucher: Some(Voucher::fixed("BIG", Money::new(1_000_000))),
            tip_amount: Money::new(10_000),
            ..CheckoutPreferences::default()
        };

        let b = engine.compute(&cart(&[(1, 20_000)]), &prefs, None);

        assert_eq!(b.discount_amount, Money::new(20_000 + 15_000 + 3_000));
        assert_eq!(b.total, Money::new(10_000));
    }

    #[test]
    fn test_total_never_negative() {
        let catalog = DeliveryCatalog::default();
        let resolver = VoucherResolver::new();
        let vouchers = [
            None,
            Some(Voucher::fixed("F", Money::new(i64::MAX))),
            Some(Voucher::percent("P", 1_000)),
            Some(Voucher::shipping("S", 500)),
        ];

        for subtotal in [0, 1, 9_999, 49_000, 1_000_000] {
            for tip in [0, 5_000] {
                for voucher in &vouchers {
                    for fee in [PlatformFee::Flat(Money::ZERO), PlatformFee::default(), PlatformFee::RateBps(500)] {
                        let prefs = CheckoutPreferences {
                            selected_voucher: voucher.clone(),
                            tip_amount: Money::new(tip),
                            ..CheckoutPreferences::default()
                        };
                        let b = compute_breakdown(&cart(&[(1, subtotal)]), &prefs, &catalog, &resolver, fee, None);
                        assert!(b.total >= Money::ZERO);
                        assert!(b.discount_amount >= Money::ZERO);
                        assert!(b.discount_amount <= b.subtotal + b.shipping_fee + b.platform_fee);
                    }
                }
            }
        }
    }

    #[test]
    fn test_pricing_is_deterministic() {
        let engine = PricingEngine::default();
        let snapshot = cart(&[(3, 12_345)]);
        let prefs = CheckoutPreferences::default();
        assert_eq!(engine.compute(&snapshot, &prefs, None), engine.compute(&snapshot, &prefs, None));
    }
}
