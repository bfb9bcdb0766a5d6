//! Pricing configuration.

use crate::ids::DeliveryOptionId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Platform fee charged on every order.
///
/// In TOML: `platform_fee = { flat = 3000 }` or `platform_fee = { rate_bps = 500 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformFee {
    /// Same fee for every order.
    Flat(Money),
    /// Share of the subtotal in basis points, rounded half away from zero.
    RateBps(u32),
}

impl Default for PlatformFee {
    fn default() -> Self {
        PlatformFee::Flat(Money::new(3_000))
    }
}

impl PlatformFee {
    /// Fee for an order with `subtotal`.
    pub fn amount(&self, subtotal: Money) -> Money {
        match *self {
            PlatformFee::Flat(fee) => fee.non_negative(),
            PlatformFee::RateBps(bps) => subtotal.non_negative().basis_points(bps),
        }
    }
}

/// Checkout-wide pricing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub currency: Currency,
    pub platform_fee: PlatformFee,
    /// Delivery option preselected for new checkouts.
    pub default_delivery_option: DeliveryOptionId,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: Currency::VND,
            platform_fee: PlatformFee::default(),
            default_delivery_option: DeliveryOptionId::new("standard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_fee_amounts() {
        assert_eq!(PlatformFee::default().amount(Money::new(49_000)), Money::new(3_000));
        assert_eq!(PlatformFee::RateBps(500).amount(Money::new(49_000)), Money::new(2_450));
        assert_eq!(PlatformFee::RateBps(500).amount(Money::new(-10)), Money::ZERO);
    }

    #[test]
    fn test_platform_fee_config_shapes() {
        let flat: PricingConfig = serde_json::from_str(r#"{"platform_fee": {"flat": 4000}}"#).unwrap();
        assert_eq!(flat.platform_fee, PlatformFee::Flat(Money::new(4_000)));
        assert_eq!(flat.currency, Currency::VND);

        let rate: PricingConfig = serde_json::from_str(r#"{"platform_fee": {"rate_bps": 500}}"#).unwrap();
        assert_eq!(rate.platform_fee, PlatformFee::RateBps(500));
        assert_eq!(rate.default_delivery_option, DeliveryOptionId::new("standard"));
    }
}
