//! Pricing module.
//!
//! Turns a cart snapshot and checkout preferences into a [`PriceBreakdown`].

mod breakdown;
mod config;

pub use breakdown::{compute_breakdown, PriceBreakdown, PricingEngine, ShippingFeeSource};
pub use config::{PlatformFee, PricingConfig};
