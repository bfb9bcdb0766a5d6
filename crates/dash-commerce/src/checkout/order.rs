//! Order payload built at checkout.

use crate::cart::{CartSnapshot, ToppingSelection};
use crate::checkout::{CheckoutPreferences, DeliveryAddress, PaymentMethod};
use crate::error::ValidationError;
use crate::ids::{DeliveryOptionId, FoodId, LineItemId, OrderId, RestaurantId, VoucherId};
use crate::money::Money;
use crate::pricing::PriceBreakdown;
use serde::{Deserialize, Serialize};

/// One ordered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub line_item_id: LineItemId,
    pub food_id: FoodId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    #[serde(default)]
    pub toppings: Vec<ToppingSelection>,
}

/// The voucher applied to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    pub voucher_id: VoucherId,
    pub code: String,
    pub amount: Money,
}

/// Everything the order service needs, priced and frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub restaurant_id: RestaurantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    pub items: Vec<OrderItem>,
    /// Subtotal before fees and discount.
    pub total_price: Money,
    pub shipping_fee: Money,
    pub platform_fee: Money,
    pub tip_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<AppliedDiscount>,
    /// Amount the customer pays.
    pub final_amount: Money,
    pub address: DeliveryAddress,
    pub payment_method: PaymentMethod,
    pub delivery_option_id: DeliveryOptionId,
    pub include_cutlery: bool,
    pub note: String,
}

impl OrderDraft {
    /// Build a draft from a cart snapshot, the checkout selections and the
    /// breakdown priced from both.
    ///
    /// Returns an error if:
    /// - The snapshot has no items
    /// - No delivery address is selected
    pub fn build(
        snapshot: &CartSnapshot,
        preferences: &CheckoutPreferences,
        breakdown: &PriceBreakdown,
    ) -> Result<Self, ValidationError> {
        if snapshot.is_empty() {
            return Err(ValidationError::EmptyCart(snapshot.restaurant_id.clone()));
        }
        let address = preferences
            .selected_address
            .clone()
            .ok_or(ValidationError::MissingAddress)?;

        let items = snapshot
            .items
            .iter()
            .map(|item| OrderItem {
                line_item_id: item.id.clone(),
                food_id: item.food_id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total(),
                toppings: item.topping_selections.clone(),
            })
            .collect();

        let discount = preferences
            .selected_voucher
            .as_ref()
            .filter(|v| breakdown.applied_voucher.as_ref() == Some(&v.id))
            .map(|v| AppliedDiscount {
                voucher_id: v.id.clone(),
                code: v.code.clone(),
                amount: breakdown.discount_amount,
            });

        Ok(Self {
            restaurant_id: snapshot.restaurant_id.clone(),
            restaurant_name: snapshot.restaurant_name.clone(),
            items,
            total_price: breakdown.subtotal,
            shipping_fee: breakdown.shipping_fee,
            platform_fee: breakdown.platform_fee,
            tip_amount: breakdown.tip_amount,
            discount,
            final_amount: breakdown.total,
            address,
            payment_method: preferences.selected_payment_method,
            delivery_option_id: preferences.delivery_option_id.clone(),
            include_cutlery: preferences.include_cutlery,
            note: preferences.note.clone(),
        })
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// Order service acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    #[serde(alias = "_id", alias = "id")]
    pub order_id: OrderId,
    /// Redirect target for online payment, when the order needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLineItem;
    use crate::checkout::{DeliveryCatalog, GeoPoint};
    use crate::pricing::{compute_breakdown, PlatformFee};
    use crate::voucher::{Voucher, VoucherResolver};

    fn snapshot() -> CartSnapshot {
        CartSnapshot::new("r1")
            .with_name("Pho 24")
            .with_item(CartLineItem::new("a", "r1", "pho", 2, Money::new(20_000)).with_name("Pho bo"))
            .with_item(CartLineItem::new("b", "r1", "tea", 1, Money::new(9_000)))
    }

    fn prefs() -> CheckoutPreferences {
        CheckoutPreferences {
            selected_address: Some(DeliveryAddress::new(
                "1 Le Loi",
                GeoPoint::new(10.77, 106.70),
            )),
            selected_voucher: Some(Voucher::fixed("MINUS5K", Money::new(5_000))),
            note: "no ice".to_string(),
            ..CheckoutPreferences::default()
        }
    }

    fn price(snapshot: &CartSnapshot, prefs: &CheckoutPreferences) -> PriceBreakdown {
        compute_breakdown(
            snapshot,
            prefs,
            &DeliveryCatalog::default(),
            &VoucherResolver::new(),
            PlatformFee::default(),
            None,
        )
    }

    #[test]
    fn test_build_draft() {
        let snapshot = snapshot();
        let prefs = prefs();
        let breakdown = price(&snapshot, &prefs);

        let draft = OrderDraft::build(&snapshot, &prefs, &breakdown).unwrap();

        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.item_count(), 3);
        assert_eq!(draft.total_price, Money::new(49_000));
        assert_eq!(draft.final_amount, breakdown.total);
        assert_eq!(draft.discount.as_ref().unwrap().amount, Money::new(5_000));
        assert_eq!(draft.note, "no ice");
        assert_eq!(draft.restaurant_name.as_deref(), Some("Pho 24"));
    }

    #[test]
    fn test_empty_cart_rejected() {
        let empty = CartSnapshot::new("r1");
        let prefs = prefs();
        let breakdown = price(&empty, &prefs);

        assert_eq!(
            OrderDraft::build(&empty, &prefs, &breakdown),
            Err(ValidationError::EmptyCart(RestaurantId::new("r1")))
        );
    }

    #[test]
    fn test_missing_address_rejected() {
        let snapshot = snapshot();
        let prefs = CheckoutPreferences::default();
        let breakdown = price(&snapshot, &prefs);

        assert_eq!(
            OrderDraft::build(&snapshot, &prefs, &breakdown),
            Err(ValidationError::MissingAddress)
        );
    }

    #[test]
    fn test_draft_wire_format() {
        let snapshot = snapshot();
        let prefs = prefs();
        let draft = OrderDraft::build(&snapshot, &prefs, &price(&snapshot, &prefs)).unwrap();

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["totalPrice"], 49_000);
        assert_eq!(json["paymentMethod"], "cash");
        assert_eq!(json["discount"]["voucherId"], "MINUS5K");
        assert_eq!(json["items"][0]["lineTotal"], 40_000);
    }

    #[test]
    fn test_receipt_accepts_id_aliases() {
        let receipt: OrderReceipt = serde_json::from_str(r#"{"_id": "o-1"}"#).unwrap();
        assert_eq!(receipt.order_id, OrderId::new("o-1"));
        assert!(receipt.payment_url.is_none());
    }
}
