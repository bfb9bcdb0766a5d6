//! HTTP implementation of the commerce gateways.

use crate::client::FetchClient;
use crate::timeout::TimeoutConfig;
use crate::FetchError;
use async_trait::async_trait;
use dash_commerce::cart::{CartSnapshot, NewLineItemRequest, QuantityUpdate};
use dash_commerce::checkout::{GeoPoint, OrderDraft, OrderReceipt, ShippingQuote};
use dash_commerce::gateway::{
    CartGateway, GatewayResult, OrderGateway, ShippingQuoteService, VoucherGateway,
};
use dash_commerce::voucher::Voucher;
use dash_commerce::{LineItemId, RestaurantId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Backend endpoints.
pub mod paths {
    pub const GET_CART: &str = "/api/get-cart";
    pub const ADD_CART: &str = "/api/add-cart";
    pub const DELETE_CART: &str = "/api/delete-cart";
    pub const QUANTITY_CART: &str = "/api/quantity-cart";
    pub const CLEAR_CART: &str = "/api/clear-cart";
    pub const GET_VOUCHER: &str = "/api/get-voucher/";
    pub const SHIPPING_FEE: &str = "/api/shipping-fee";
    pub const ADD_ORDER: &str = "/api/add-order";
}

/// Connection settings of the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 10_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl GatewayConfig {
    /// Timeouts of this config.
    pub fn timeouts(&self) -> TimeoutConfig {
        TimeoutConfig::from_millis(self.connect_timeout_ms, self.timeout_ms)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuantityBody<'a> {
    item_id: &'a LineItemId,
    quantity: u32,
    option: &'static str,
}

#[derive(Serialize)]
struct LocationBody {
    long: f64,
    lat: f64,
}

#[derive(Serialize)]
struct OrderBody<'a> {
    data: &'a OrderDraft,
}

/// Cart, voucher, shipping and order gateways over the backend's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: FetchClient,
}

impl HttpGateway {
    /// Wrap a configured client.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    /// Build a client from `config`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, FetchError> {
        Ok(Self::new(FetchClient::new(
            config.base_url.clone(),
            config.timeouts(),
        )?))
    }

    /// Authenticate every call with a bearer token.
    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        Self::new(self.client.with_bearer_token(token))
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

#[async_trait]
impl CartGateway for HttpGateway {
    #[instrument(skip_all)]
    async fn fetch_cart(&self) -> GatewayResult<Vec<CartSnapshot>> {
        let cart = self
            .client
            .get::<Vec<CartSnapshot>>(paths::GET_CART)
            .await?
            .into_result()?;
        Ok(cart.unwrap_or_default())
    }

    #[instrument(skip_all, fields(restaurant_id = %request.restaurant_id, food_id = %request.food_id))]
    async fn add_item(&self, request: &NewLineItemRequest) -> GatewayResult<Vec<CartSnapshot>> {
        let cart = self
            .client
            .post::<Vec<CartSnapshot>, _>(paths::ADD_CART, request)
            .await?
            .into_result()?;
        Ok(cart.unwrap_or_default())
    }

    #[instrument(skip_all, fields(line_item_id = %line_item_id))]
    async fn remove_item(&self, line_item_id: &LineItemId) -> GatewayResult<Vec<CartSnapshot>> {
        let path = format!("{}/{}", paths::DELETE_CART, line_item_id);
        let cart = self
            .client
            .delete::<Vec<CartSnapshot>>(&path)
            .await?
            .into_result()?;
        match cart {
            Some(cart) => Ok(cart),
            None => {
                debug!("delete answered without a cart; refetching");
                self.fetch_cart().await
            }
        }
    }

    #[instrument(skip_all, fields(line_item_id = %update.line_item_id, quantity = update.quantity))]
    async fn update_quantity(&self, update: &QuantityUpdate) -> GatewayResult<Vec<CartSnapshot>> {
        let body = QuantityBody {
            item_id: &update.line_item_id,
            quantity: update.quantity,
            option: update.direction.as_str(),
        };
        let cart = self
            .client
            .put::<Vec<CartSnapshot>, _>(paths::QUANTITY_CART, &body)
            .await?
            .into_result()?;
        Ok(cart.unwrap_or_default())
    }

    #[instrument(skip_all)]
    async fn clear_cart(&self) -> GatewayResult<()> {
        self.client
            .delete::<serde_json::Value>(paths::CLEAR_CART)
            .await?
            .into_result()?;
        Ok(())
    }
}

#[async_trait]
impl VoucherGateway for HttpGateway {
    #[instrument(skip_all)]
    async fn list_vouchers(&self) -> GatewayResult<Vec<Voucher>> {
        let vouchers = self
            .client
            .get::<Vec<Voucher>>(paths::GET_VOUCHER)
            .await?
            .into_result()?;
        Ok(vouchers.unwrap_or_default())
    }
}

#[async_trait]
impl ShippingQuoteService for HttpGateway {
    #[instrument(skip_all, fields(restaurant_id = %restaurant_id))]
    async fn quote(
        &self,
        restaurant_id: &RestaurantId,
        location: GeoPoint,
    ) -> GatewayResult<ShippingQuote> {
        let path = format!("{}/{}", paths::SHIPPING_FEE, restaurant_id);
        let body = LocationBody {
            long: location.lng,
            lat: location.lat,
        };
        let quote = self
            .client
            .post::<ShippingQuote, _>(&path, &body)
            .await?
            .into_data()?;
        Ok(quote)
    }
}

#[async_trait]
impl OrderGateway for HttpGateway {
    #[instrument(skip_all, fields(restaurant_id = %draft.restaurant_id, total = draft.final_amount.minor_units()))]
    async fn submit_order(&self, draft: &OrderDraft) -> GatewayResult<OrderReceipt> {
        let receipt = self
            .client
            .post::<OrderReceipt, _>(paths::ADD_ORDER, &OrderBody { data: draft })
            .await?
            .into_data()?;
        Ok(receipt)
    }
}
