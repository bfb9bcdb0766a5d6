//! Remote collaborator interfaces.
//!
//! The engine never talks HTTP directly. Each remote concern is a trait, so the
//! stores can run against the HTTP implementation in `dash-data` or against an
//! in-memory fake in tests.

use crate::cart::{CartSnapshot, NewLineItemRequest, QuantityUpdate};
use crate::checkout::{GeoPoint, OrderDraft, OrderReceipt, ShippingQuote};
use crate::error::GatewayError;
use crate::ids::{LineItemId, RestaurantId};
use crate::voucher::Voucher;
use async_trait::async_trait;

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Authoritative cart for the signed-in identity.
///
/// Every mutation answers with the full cart, one snapshot per restaurant.
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Fetch the current cart.
    async fn fetch_cart(&self) -> GatewayResult<Vec<CartSnapshot>>;

    /// Add food to a restaurant's cart.
    async fn add_item(&self, request: &NewLineItemRequest) -> GatewayResult<Vec<CartSnapshot>>;

    /// Remove a line item.
    async fn remove_item(&self, line_item_id: &LineItemId) -> GatewayResult<Vec<CartSnapshot>>;

    /// Change the quantity of a line item.
    async fn update_quantity(&self, update: &QuantityUpdate) -> GatewayResult<Vec<CartSnapshot>>;

    /// Empty the cart across all restaurants.
    async fn clear_cart(&self) -> GatewayResult<()>;
}

/// Voucher catalog service.
#[async_trait]
pub trait VoucherGateway: Send + Sync {
    /// Every voucher the user could see, eligible or not.
    async fn list_vouchers(&self) -> GatewayResult<Vec<Voucher>>;
}

/// Distance-based shipping fee quotes.
#[async_trait]
pub trait ShippingQuoteService: Send + Sync {
    /// Quote delivery from `restaurant_id` to `location`.
    async fn quote(
        &self,
        restaurant_id: &RestaurantId,
        location: GeoPoint,
    ) -> GatewayResult<ShippingQuote>;
}

/// Order placement.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit a priced order.
    async fn submit_order(&self, draft: &OrderDraft) -> GatewayResult<OrderReceipt>;
}
