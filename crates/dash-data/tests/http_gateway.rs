//! `HttpGateway` against an in-process backend.

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use dash_commerce::prelude::*;
use dash_data::{FetchClient, GatewayConfig, HttpGateway, TimeoutConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const TOKEN: &str = "test-token";

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "EC": "0", "EM": "Success", "DT": data }))
}

fn cart(quantity: u32) -> Value {
    json!([{
        "restaurantId": "r1",
        "restaurantName": "Pho 24",
        "items": [{
            "id": "li-1",
            "restaurantId": "r1",
            "foodId": "pho",
            "name": "Pho bo",
            "quantity": quantity,
            "unitPrice": 20000
        }]
    }])
}

async fn get_cart(headers: HeaderMap) -> Json<Value> {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-token");
    if authorized {
        ok(cart(2))
    } else {
        Json(json!({ "EC": "401", "EM": "Not authenticated", "DT": null }))
    }
}

async fn add_cart(Json(body): Json<Value>) -> Json<Value> {
    if body["foodId"] == "ghost" {
        return Json(json!({ "EC": "1", "EM": "Food not found", "DT": null }));
    }
    let quantity = body["quantity"].as_u64().unwrap_or(0) as u32;
    ok(cart(quantity))
}

async fn delete_cart(Path(id): Path<String>) -> Json<Value> {
    assert_eq!(id, "li-9");
    Json(json!({ "EC": "0", "EM": "Deleted" }))
}

async fn quantity_cart(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["itemId"], "li-1");
    assert_eq!(body["option"], "decrease");
    ok(cart(1))
}

async fn clear_cart() -> Json<Value> {
    ok(json!([]))
}

async fn get_voucher() -> Json<Value> {
    ok(json!([
        {
            "_id": "v1",
            "code": "SALE15",
            "discountType": "PERCENT",
            "discountValue": 15,
            "minOrderValue": 45000,
            "maxDiscount": 10000
        },
        {
            "_id": "v2",
            "code": "SHIP50",
            "discountType": "SHIPPING",
            "discountValue": 50,
            "isAvailable": false
        }
    ]))
}

async fn shipping_fee(Path(restaurant): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(restaurant, "r1");
    assert_eq!(body["long"], 106.6822);
    assert_eq!(body["lat"], 10.7626);
    ok(json!({ "fee": 18000, "distance": 3.4 }))
}

async fn add_order(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["data"]["restaurantId"], "r1");
    ok(json!({ "_id": "o-42", "paymentUrl": null }))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "upstream unavailable")
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    ok(json!([]))
}

fn backend() -> Router {
    Router::new()
        .route("/api/get-cart", get(get_cart))
        .route("/api/add-cart", post(add_cart))
        .route("/api/delete-cart/{id}", delete(delete_cart))
        .route("/api/quantity-cart", put(quantity_cart))
        .route("/api/clear-cart", delete(clear_cart))
        .route("/api/get-voucher/", get(get_voucher))
        .route("/api/shipping-fee/{id}", post(shipping_fee))
        .route("/api/add-order", post(add_order))
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn gateway() -> HttpGateway {
    let config = GatewayConfig {
        base_url: serve(backend()).await,
        ..GatewayConfig::default()
    };
    HttpGateway::from_config(&config)
        .unwrap()
        .with_bearer_token(TOKEN)
}

#[tokio::test]
async fn test_fetch_cart_sends_bearer_token() {
    let gw = gateway().await;
    let cart = gw.fetch_cart().await.unwrap();

    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].restaurant_name.as_deref(), Some("Pho 24"));
    assert_eq!(cart[0].subtotal(), Money::new(40_000));
}

#[tokio::test]
async fn test_missing_token_is_domain_error() {
    let base_url = serve(backend()).await;
    let gw = HttpGateway::new(FetchClient::new(base_url, TimeoutConfig::default()).unwrap());

    let err = gw.fetch_cart().await.unwrap_err();
    assert_eq!(err, GatewayError::domain("401", "Not authenticated"));
}

#[tokio::test]
async fn test_add_item_returns_full_cart() {
    let gw = gateway().await;
    let cart = gw
        .add_item(&NewLineItemRequest::new("r1", "pho", 3))
        .await
        .unwrap();
    assert_eq!(cart[0].items[0].quantity, 3);

    let err = gw
        .add_item(&NewLineItemRequest::new("r1", "ghost", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Domain { ref code, .. } if code == "1"));
}

#[tokio::test]
async fn test_remove_without_cart_payload_refetches() {
    let gw = gateway().await;
    let cart = gw.remove_item(&LineItemId::new("li-9")).await.unwrap();
    assert_eq!(cart[0].items[0].quantity, 2);
}

#[tokio::test]
async fn test_update_quantity_body() {
    let gw = gateway().await;
    let update = QuantityUpdate {
        line_item_id: LineItemId::new("li-1"),
        quantity: 1,
        direction: QuantityDirection::Decrease,
    };
    let cart = gw.update_quantity(&update).await.unwrap();
    assert_eq!(cart[0].items[0].quantity, 1);
}

#[tokio::test]
async fn test_clear_cart() {
    let gw = gateway().await;
    gw.clear_cart().await.unwrap();
}

#[tokio::test]
async fn test_list_vouchers_accepts_backend_aliases() {
    let gw = gateway().await;
    let vouchers = gw.list_vouchers().await.unwrap();

    assert_eq!(vouchers.len(), 2);
    assert_eq!(vouchers[0].id, VoucherId::new("v1"));
    assert_eq!(vouchers[0].discount_type, DiscountType::Percent);
    assert_eq!(vouchers[0].max_discount, Some(Money::new(10_000)));
    assert!(!vouchers[1].is_active);
}

#[tokio::test]
async fn test_shipping_quote() {
    let gw = gateway().await;
    let quote = gw
        .quote(&RestaurantId::new("r1"), GeoPoint::new(10.7626, 106.6822))
        .await
        .unwrap();
    assert_eq!(quote.fee, Money::new(18_000));
    assert_eq!(quote.distance_km, 3.4);
}

#[tokio::test]
async fn test_submit_order_wraps_draft() {
    let gw = gateway().await;
    let snapshot = CartSnapshot::new("r1").with_item(CartLineItem::new(
        "li-1",
        "r1",
        "pho",
        2,
        Money::new(20_000),
    ));
    let preferences = CheckoutPreferences {
        selected_address: Some(DeliveryAddress::new(
            "227 Nguyen Van Cu",
            GeoPoint::new(10.7626, 106.6822),
        )),
        ..CheckoutPreferences::default()
    };
    let breakdown = PricingEngine::default().compute(&snapshot, &preferences, None);
    let draft = OrderDraft::build(&snapshot, &preferences, &breakdown).unwrap();

    let receipt = gw.submit_order(&draft).await.unwrap();
    assert_eq!(receipt.order_id, OrderId::new("o-42"));
}

#[tokio::test]
async fn test_http_error_without_envelope_is_transport() {
    let base_url = serve(Router::new().route("/api/get-cart", get(broken))).await;
    let gw = HttpGateway::new(FetchClient::new(base_url, TimeoutConfig::default()).unwrap());

    let err = gw.fetch_cart().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_undecodable_payload_is_invalid_response() {
    async fn bad_cart() -> Json<Value> {
        ok(json!([{ "restaurantId": "r1", "items": [{ "id": "li-1" }] }]))
    }
    let base_url = serve(Router::new().route("/api/get-cart", get(bad_cart))).await;
    let gw = HttpGateway::new(FetchClient::new(base_url, TimeoutConfig::default()).unwrap());

    let err = gw.fetch_cart().await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_timeout_is_transport() {
    let base_url = serve(Router::new().route("/api/get-cart", get(slow))).await;
    let timeouts = TimeoutConfig::new(Duration::from_millis(100), Duration::from_millis(100));
    let gw = HttpGateway::new(FetchClient::new(base_url, timeouts).unwrap());

    let err = gw.fetch_cart().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_drives_checkout_context() {
    let ctx = CheckoutContext::new(
        Gateways::from_shared(Arc::new(gateway().await)),
        CheckoutConfig::default(),
        None,
    )
    .unwrap();

    ctx.cart().refresh().await.unwrap();
    assert_eq!(ctx.cart().total_item_count(None), 2);

    let partition = ctx.load_vouchers(&RestaurantId::new("r1")).await.unwrap();
    assert!(partition.available.is_empty());
    assert_eq!(partition.unavailable.len(), 2);
}
