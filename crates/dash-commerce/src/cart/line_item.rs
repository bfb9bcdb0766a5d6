//! Line items and the requests that create or change them.

use crate::error::ValidationError;
use crate::ids::{ChoiceId, FoodId, LineItemId, RestaurantId, ToppingGroupId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Choices made within one topping group. Used for display and pricing only,
/// never for line item identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToppingSelection {
    pub topping_group_id: ToppingGroupId,
    #[serde(default)]
    pub chosen_choice_ids: Vec<ChoiceId>,
}

impl ToppingSelection {
    /// Create a selection for a topping group.
    pub fn new(
        topping_group_id: impl Into<ToppingGroupId>,
        chosen_choice_ids: impl IntoIterator<Item = ChoiceId>,
    ) -> Self {
        Self {
            topping_group_id: topping_group_id.into(),
            chosen_choice_ids: chosen_choice_ids.into_iter().collect(),
        }
    }
}

/// One orderable entry in a cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Gateway-assigned identifier, unique within the cart.
    pub id: LineItemId,
    pub restaurant_id: RestaurantId,
    pub food_id: FoodId,
    /// Display name, when the gateway provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Always at least one; an item reduced to zero is absent from the cart.
    pub quantity: u32,
    /// Price of one unit, topping and choice surcharges included.
    pub unit_price: Money,
    #[serde(default)]
    pub topping_selections: Vec<ToppingSelection>,
}

impl CartLineItem {
    /// Create a line item without toppings.
    pub fn new(
        id: impl Into<LineItemId>,
        restaurant_id: impl Into<RestaurantId>,
        food_id: impl Into<FoodId>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            restaurant_id: restaurant_id.into(),
            food_id: food_id.into(),
            name: None,
            quantity,
            unit_price,
            topping_selections: Vec::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a topping selection.
    pub fn with_topping(mut self, selection: ToppingSelection) -> Self {
        self.topping_selections.push(selection);
        self
    }

    /// `unit_price × quantity`.
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Request to add food to the cart of a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItemRequest {
    pub restaurant_id: RestaurantId,
    pub food_id: FoodId,
    pub quantity: u32,
    #[serde(default)]
    pub topping_selections: Vec<ToppingSelection>,
}

impl NewLineItemRequest {
    /// Create a request without toppings.
    pub fn new(
        restaurant_id: impl Into<RestaurantId>,
        food_id: impl Into<FoodId>,
        quantity: u32,
    ) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            food_id: food_id.into(),
            quantity,
            topping_selections: Vec::new(),
        }
    }

    /// Add a topping selection.
    pub fn with_topping(mut self, selection: ToppingSelection) -> Self {
        self.topping_selections.push(selection);
        self
    }

    /// Reject requests the gateway would never accept.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity == 0 {
            return Err(ValidationError::InvalidQuantity(0));
        }
        Ok(())
    }
}

/// Direction of a quantity change, forwarded to the gateway as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityDirection {
    Increase,
    Decrease,
}

impl QuantityDirection {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityDirection::Increase => "increase",
            QuantityDirection::Decrease => "decrease",
        }
    }
}

/// Quantity change for an existing line item.
///
/// `quantity` and `direction` are both forwarded; the gateway decides the
/// resulting quantity. A decrease that lands on zero removes the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityUpdate {
    pub line_item_id: LineItemId,
    pub quantity: u32,
    pub direction: QuantityDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = CartLineItem::new("li-1", "r1", "pho", 2, Money::new(20_000));
        assert_eq!(item.line_total(), Money::new(40_000));
    }

    #[test]
    fn test_new_line_item_requires_quantity() {
        assert!(NewLineItemRequest::new("r1", "pho", 1).validate().is_ok());
        assert_eq!(
            NewLineItemRequest::new("r1", "pho", 0).validate(),
            Err(ValidationError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_line_item_wire_format() {
        let json = r#"{
            "id": "li-1",
            "restaurantId": "r1",
            "foodId": "f1",
            "quantity": 3,
            "unitPrice": 9000,
            "toppingSelections": [{"toppingGroupId": "size", "chosenChoiceIds": ["large"]}]
        }"#;
        let item: CartLineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.unit_price, Money::new(9_000));
        assert_eq!(item.topping_selections[0].chosen_choice_ids, vec![ChoiceId::new("large")]);
        assert!(item.name.is_none());
    }

    #[test]
    fn test_negative_quantity_is_rejected_by_schema() {
        let json = r#"{"id":"li-1","restaurantId":"r1","foodId":"f1","quantity":-1,"unitPrice":1}"#;
        assert!(serde_json::from_str::<CartLineItem>(json).is_err());
    }

    #[test]
    fn test_direction_wire_name() {
        assert_eq!(
            serde_json::to_string(&QuantityDirection::Decrease).unwrap(),
            "\"decrease\""
        );
        assert_eq!(QuantityDirection::Increase.as_str(), "increase");
    }
}
