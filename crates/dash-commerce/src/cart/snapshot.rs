//! Per-restaurant cart snapshots and gateway-boundary validation.

use crate::cart::CartLineItem;
use crate::error::GatewayError;
use crate::ids::{LineItemId, RestaurantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The line items of one restaurant, as last confirmed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub restaurant_id: RestaurantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub items: Vec<CartLineItem>,
}

impl CartSnapshot {
    /// Create an empty snapshot.
    pub fn new(restaurant_id: impl Into<RestaurantId>) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            restaurant_name: None,
            items: Vec::new(),
        }
    }

    /// Set the restaurant display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.restaurant_name = Some(name.into());
        self
    }

    /// Append a line item.
    pub fn with_item(mut self, item: CartLineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Σ `unit_price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Check if the snapshot has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a line item by ID.
    pub fn line_item(&self, id: &LineItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    fn validate(&self) -> Result<(), GatewayError> {
        for item in &self.items {
            if item.quantity == 0 {
                return Err(GatewayError::InvalidResponse(format!(
                    "line item {} has quantity 0",
                    item.id
                )));
            }
            if item.unit_price.is_negative() {
                return Err(GatewayError::InvalidResponse(format!(
                    "line item {} has negative unit price {}",
                    item.id, item.unit_price
                )));
            }
            if item.restaurant_id != self.restaurant_id {
                return Err(GatewayError::InvalidResponse(format!(
                    "line item {} belongs to {} but was listed under {}",
                    item.id, item.restaurant_id, self.restaurant_id
                )));
            }
        }
        Ok(())
    }
}

/// Validate a full cart returned by the gateway and drop empty snapshots.
///
/// A cart is accepted only if every restaurant appears at most once, line item
/// IDs are unique across the cart, every item has a positive quantity, a
/// non-negative unit price and sits under its own restaurant.
pub fn normalize_cart(snapshots: Vec<CartSnapshot>) -> Result<Vec<CartSnapshot>, GatewayError> {
    let mut restaurants = HashSet::new();
    let mut line_items = HashSet::new();

    for snapshot in &snapshots {
        if !restaurants.insert(&snapshot.restaurant_id) {
            return Err(GatewayError::InvalidResponse(format!(
                "restaurant {} appears twice",
                snapshot.restaurant_id
            )));
        }
        snapshot.validate()?;
        for item in &snapshot.items {
            if !line_items.insert(&item.id) {
                return Err(GatewayError::InvalidResponse(format!(
                    "duplicate line item {}",
                    item.id
                )));
            }
        }
    }

    Ok(snapshots.into_iter().filter(|s| !s.is_empty()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, restaurant: &str, qty: u32, price: i64) -> CartLineItem {
        CartLineItem::new(id, restaurant, "food", qty, Money::new(price))
    }

    #[test]
    fn test_subtotal_two_lines() {
        let snapshot = CartSnapshot::new("r1")
            .with_item(item("a", "r1", 2, 20_000))
            .with_item(item("b", "r1", 1, 9_000));

        assert_eq!(snapshot.subtotal(), Money::new(49_000));
        assert_eq!(snapshot.item_count(), 3);
    }

    #[test]
    fn test_normalize_drops_empty_snapshots() {
        let cart = vec![
            CartSnapshot::new("r1").with_item(item("a", "r1", 1, 1_000)),
            CartSnapshot::new("r2"),
        ];
        let normalized = normalize_cart(cart).unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].restaurant_id, RestaurantId::new("r1"));
    }

    #[test]
    fn test_normalize_rejects_zero_quantity() {
        let cart = vec![CartSnapshot::new("r1").with_item(item("a", "r1", 0, 1_000))];
        assert!(matches!(
            normalize_cart(cart),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_normalize_rejects_duplicates() {
        let twice = vec![CartSnapshot::new("r1"), CartSnapshot::new("r1")];
        assert!(normalize_cart(twice).is_err());

        let dup_items = vec![
            CartSnapshot::new("r1").with_item(item("a", "r1", 1, 1)),
            CartSnapshot::new("r2").with_item(item("a", "r2", 1, 1)),
        ];
        assert!(normalize_cart(dup_items).is_err());
    }

    #[test]
    fn test_normalize_rejects_misfiled_item() {
        let cart = vec![CartSnapshot::new("r1").with_item(item("a", "r2", 1, 1))];
        assert!(normalize_cart(cart).is_err());
    }

    #[test]
    fn test_normalize_rejects_negative_unit_price() {
        let cart = vec![CartSnapshot::new("r1").with_item(item("a", "r1", 1, -5_000))];
        assert!(matches!(
            normalize_cart(cart),
            Err(GatewayError::InvalidResponse(_))
        ));

        let free = vec![CartSnapshot::new("r1").with_item(item("a", "r1", 1, 0))];
        assert!(normalize_cart(free).is_ok());
    }
}
