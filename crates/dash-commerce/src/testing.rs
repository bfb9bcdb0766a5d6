//! In-memory stand-in for every remote collaborator.
//!
//! [`FakeGateway`] keeps its own authoritative cart and answers like the real
//! service: full cart after each mutation, line items merged by food and
//! toppings, a decrease to zero removes the line. Failures and response delays
//! can be scripted per call.

use crate::cart::{CartLineItem, CartSnapshot, NewLineItemRequest, QuantityDirection, QuantityUpdate};
use crate::checkout::{GeoPoint, OrderDraft, OrderReceipt, ShippingQuote};
use crate::error::GatewayError;
use crate::gateway::{
    CartGateway, GatewayResult, OrderGateway, ShippingQuoteService, VoucherGateway,
};
use crate::ids::{FoodId, LineItemId, OrderId, RestaurantId};
use crate::money::Money;
use crate::voucher::Voucher;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct FakeState {
    cart: Vec<CartSnapshot>,
    menu: HashMap<FoodId, Money>,
    vouchers: Vec<Voucher>,
    quotes: HashMap<RestaurantId, ShippingQuote>,
    failures: VecDeque<GatewayError>,
    delays: VecDeque<Duration>,
    calls: Vec<String>,
    orders: Vec<OrderDraft>,
    next_line: u64,
}

/// Scriptable fake of the cart, voucher, shipping and order services.
#[derive(Debug, Default)]
pub struct FakeGateway {
    state: Mutex<FakeState>,
    quote_calls: AtomicUsize,
}

impl FakeGateway {
    /// Create a fake with an empty cart and menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Price a food so it can be added to the cart.
    pub fn with_menu_item(self, food_id: impl Into<FoodId>, price: Money) -> Self {
        self.lock().menu.insert(food_id.into(), price);
        self
    }

    /// Seed the server-side cart.
    pub fn with_cart(self, cart: Vec<CartSnapshot>) -> Self {
        self.lock().cart = cart;
        self
    }

    /// Seed the voucher catalog.
    pub fn with_vouchers(self, vouchers: Vec<Voucher>) -> Self {
        self.lock().vouchers = vouchers;
        self
    }

    /// Set the shipping quote of a restaurant.
    pub fn with_quote(self, restaurant_id: impl Into<RestaurantId>, quote: ShippingQuote) -> Self {
        self.lock().quotes.insert(restaurant_id.into(), quote);
        self
    }

    /// Fail the next call with `error`.
    pub fn fail_next(&self, error: GatewayError) {
        self.lock().failures.push_back(error);
    }

    /// Deliver the next response after `delay`. The server state changes
    /// immediately; only the response is late.
    pub fn delay_next(&self, delay: Duration) {
        self.lock().delays.push_back(delay);
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Number of shipping quote requests received.
    pub fn quote_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }

    /// Server-side cart.
    pub fn server_cart(&self) -> Vec<CartSnapshot> {
        self.lock().cart.clone()
    }

    /// Orders received.
    pub fn submitted_orders(&self) -> Vec<OrderDraft> {
        self.lock().orders.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond<T>(
        &self,
        call: String,
        handler: impl FnOnce(&mut FakeState) -> GatewayResult<T>,
    ) -> (GatewayResult<T>, Option<Duration>) {
        let mut state = self.lock();
        state.calls.push(call);
        let delay = state.delays.pop_front();
        let result = match state.failures.pop_front() {
            Some(error) => Err(error),
            None => handler(&mut state),
        };
        (result, delay)
    }

    async fn deliver<T>(&self, (result, delay): (GatewayResult<T>, Option<Duration>)) -> GatewayResult<T> {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

impl FakeState {
    fn add(&mut self, request: &NewLineItemRequest) -> GatewayResult<Vec<CartSnapshot>> {
        let price = *self
            .menu
            .get(&request.food_id)
            .ok_or_else(|| GatewayError::domain("1", format!("Food {} not found", request.food_id)))?;

        let position = self
            .cart
            .iter()
            .position(|s| s.restaurant_id == request.restaurant_id);
        let index = match position {
            Some(index) => index,
            None => {
                self.cart.push(CartSnapshot::new(request.restaurant_id.clone()));
                self.cart.len() - 1
            }
        };

        let existing = self.cart[index].items.iter_mut().find(|item| {
            item.food_id == request.food_id && item.topping_selections == request.topping_selections
        });
        match existing {
            Some(item) => item.quantity += request.quantity,
            None => {
                self.next_line += 1;
                let mut item = CartLineItem::new(
                    format!("li-{}", self.next_line),
                    request.restaurant_id.clone(),
                    request.food_id.clone(),
                    request.quantity,
                    price,
                );
                item.topping_selections = request.topping_selections.clone();
                self.cart[index].items.push(item);
            }
        }
        Ok(self.cart.clone())
    }

    fn update(&mut self, update: &QuantityUpdate) -> GatewayResult<Vec<CartSnapshot>> {
        let item = self
            .cart
            .iter_mut()
            .flat_map(|s| s.items.iter_mut())
            .find(|i| i.id == update.line_item_id)
            .ok_or_else(|| item_not_found(&update.line_item_id))?;

        item.quantity = match update.direction {
            QuantityDirection::Increase => item.quantity.saturating_add(1),
            QuantityDirection::Decrease => item.quantity.saturating_sub(1),
        };
        self.prune();
        Ok(self.cart.clone())
    }

    fn remove(&mut self, line_item_id: &LineItemId) -> GatewayResult<Vec<CartSnapshot>> {
        let before: usize = self.cart.iter().map(|s| s.items.len()).sum();
        for snapshot in &mut self.cart {
            snapshot.items.retain(|i| &i.id != line_item_id);
        }
        let after: usize = self.cart.iter().map(|s| s.items.len()).sum();
        if before == after {
            return Err(item_not_found(line_item_id));
        }
        self.prune();
        Ok(self.cart.clone())
    }

    fn prune(&mut self) {
        for snapshot in &mut self.cart {
            snapshot.items.retain(|i| i.quantity > 0);
        }
        self.cart.retain(|s| !s.is_empty());
    }
}

fn item_not_found(id: &LineItemId) -> GatewayError {
    GatewayError::domain("1", format!("Item {} not found", id))
}

#[async_trait]
impl CartGateway for FakeGateway {
    async fn fetch_cart(&self) -> GatewayResult<Vec<CartSnapshot>> {
        let response = self.respond("fetch_cart".to_string(), |s| Ok(s.cart.clone()));
        self.deliver(response).await
    }

    async fn add_item(&self, request: &NewLineItemRequest) -> GatewayResult<Vec<CartSnapshot>> {
        let call = format!("add_item {} {} x{}", request.restaurant_id, request.food_id, request.quantity);
        let response = self.respond(call, |s| s.add(request));
        self.deliver(response).await
    }

    async fn remove_item(&self, line_item_id: &LineItemId) -> GatewayResult<Vec<CartSnapshot>> {
        let response = self.respond(format!("remove_item {}", line_item_id), |s| {
            s.remove(line_item_id)
        });
        self.deliver(response).await
    }

    async fn update_quantity(&self, update: &QuantityUpdate) -> GatewayResult<Vec<CartSnapshot>> {
        let call = format!(
            "update_quantity {} {} {}",
            update.line_item_id,
            update.quantity,
            update.direction.as_str()
        );
        let response = self.respond(call, |s| s.update(update));
        self.deliver(response).await
    }

    async fn clear_cart(&self) -> GatewayResult<()> {
        let response = self.respond("clear_cart".to_string(), |s| {
            s.cart.clear();
            Ok(())
        });
        self.deliver(response).await
    }
}

#[async_trait]
impl VoucherGateway for FakeGateway {
    async fn list_vouchers(&self) -> GatewayResult<Vec<Voucher>> {
        let response = self.respond("list_vouchers".to_string(), |s| Ok(s.vouchers.clone()));
        self.deliver(response).await
    }
}

#[async_trait]
impl ShippingQuoteService for FakeGateway {
    async fn quote(&self, restaurant_id: &RestaurantId, location: GeoPoint) -> GatewayResult<ShippingQuote> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        let call = format!("quote {} {}", restaurant_id, location.cache_key());
        let response = self.respond(call, |s| {
            s.quotes
                .get(restaurant_id)
                .copied()
                .ok_or_else(|| GatewayError::domain("1", format!("No route to {}", restaurant_id)))
        });
        self.deliver(response).await
    }
}

#[async_trait]
impl OrderGateway for FakeGateway {
    async fn submit_order(&self, draft: &OrderDraft) -> GatewayResult<OrderReceipt> {
        let response = self.respond(format!("submit_order {}", draft.restaurant_id), |s| {
            s.orders.push(draft.clone());
            Ok(OrderReceipt {
                order_id: OrderId::new(format!("order-{}", s.orders.len())),
                payment_url: None,
            })
        });
        self.deliver(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_merges_same_food() {
        let gw = FakeGateway::new().with_menu_item("pho", Money::new(20_000));
        gw.add_item(&NewLineItemRequest::new("r1", "pho", 1)).await.unwrap();
        let cart = gw.add_item(&NewLineItemRequest::new("r1", "pho", 2)).await.unwrap();

        assert_eq!(cart[0].items.len(), 1);
        assert_eq!(cart[0].items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_fake_unknown_food_is_domain_error() {
        let gw = FakeGateway::new();
        let err = gw.add_item(&NewLineItemRequest::new("r1", "ghost", 1)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Domain { .. }));
        assert_eq!(gw.calls(), vec!["add_item r1 ghost x1"]);
    }
}
