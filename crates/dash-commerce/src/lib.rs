//! Cart state and checkout pricing engine for DashCart.
//!
//! This crate owns the client's view of the cart and prices checkouts:
//!
//! - **Cart**: per-restaurant snapshots kept in sync with the remote cart,
//!   replaced wholesale by every gateway response
//! - **Voucher**: eligibility partitioning and discount formulas
//! - **Checkout**: delivery options, shipping quotes, preferences, order drafts
//! - **Pricing**: deterministic price breakdowns
//!
//! Remote services are reached through the traits in [`gateway`]; the HTTP
//! implementation lives in `dash-data`.
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_commerce::prelude::*;
//!
//! let ctx = CheckoutContext::new(gateways, CheckoutConfig::default(), Some(store))?;
//! let restaurant = RestaurantId::new("r1");
//!
//! ctx.cart().add_item(NewLineItemRequest::new("r1", "pho-bo", 2)).await?;
//! ctx.begin_checkout(&restaurant)?;
//! ctx.preferences().set_tip_amount(Money::new(5_000));
//!
//! let breakdown = ctx.price(&restaurant)?;
//! println!("Total: {}", breakdown.total.display(Currency::VND));
//!
//! let receipt = ctx.place_order(&restaurant).await?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod checkout;
pub mod config;
pub mod context;
pub mod gateway;
pub mod persistence;
pub mod pricing;
pub mod voucher;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{CheckoutConfig, StoreConfig, DEFAULT_NAMESPACE};
pub use context::{CheckoutContext, Gateways};
pub use error::{CommerceError, GatewayError, ValidationError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{CheckoutConfig, StoreConfig};
    pub use crate::context::{CheckoutContext, Gateways};
    pub use crate::error::{CommerceError, GatewayError, ValidationError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        CartLineItem, CartSnapshot, CartStore, NewLineItemRequest, QuantityDirection,
        QuantityUpdate, ToppingSelection,
    };

    // Voucher
    pub use crate::voucher::{
        AvailableVoucher, DiscountType, UnavailableReason, UnavailableVoucher, Voucher,
        VoucherPartition, VoucherResolver,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutPreferences, DeliveryAddress, DeliveryCatalog, DeliveryOption, GeoPoint,
        OrderDraft, OrderReceipt, PaymentMethod, PreferencesStore, ShippingQuote, TipOption,
    };

    // Pricing
    pub use crate::pricing::{
        compute_breakdown, PlatformFee, PriceBreakdown, PricingConfig, PricingEngine,
        ShippingFeeSource,
    };

    // Gateways
    pub use crate::gateway::{
        CartGateway, GatewayResult, OrderGateway, ShippingQuoteService, VoucherGateway,
    };
}
