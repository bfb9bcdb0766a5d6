//! Delivery options, tips and shipping quotes.

use crate::error::ValidationError;
use crate::ids::DeliveryOptionId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A way of delivering the order, with its flat price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOption {
    pub id: DeliveryOptionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl DeliveryOption {
    /// Create an available option.
    pub fn new(id: impl Into<DeliveryOptionId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            estimated_time: None,
            is_available: true,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the estimated time.
    pub fn with_estimated_time(mut self, estimate: impl Into<String>) -> Self {
        self.estimated_time = Some(estimate.into());
        self
    }
}

/// The delivery options offered at checkout. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryCatalog {
    options: Vec<DeliveryOption>,
}

impl DeliveryCatalog {
    /// Build a catalog from `options`.
    pub fn new(options: Vec<DeliveryOption>) -> Result<Self, ValidationError> {
        if options.is_empty() {
            return Err(ValidationError::EmptyDeliveryCatalog);
        }
        Ok(Self { options })
    }

    /// Standard, express and scheduled delivery.
    pub fn default_options() -> Vec<DeliveryOption> {
        vec![
            DeliveryOption::new("standard", "Standard", Money::new(15_000))
                .with_description("Delivery within 30-45 minutes")
                .with_estimated_time("30-45 min"),
            DeliveryOption::new("express", "Express", Money::new(25_000))
                .with_description("Delivery within 15-25 minutes")
                .with_estimated_time("15-25 min"),
            DeliveryOption::new("scheduled", "Scheduled", Money::new(15_000))
                .with_description("Choose your delivery time")
                .with_estimated_time("You choose"),
        ]
    }

    /// All options, in display order.
    pub fn options(&self) -> &[DeliveryOption] {
        &self.options
    }

    /// Look up an option by ID.
    pub fn get(&self, id: &DeliveryOptionId) -> Option<&DeliveryOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    /// Look up the option to price with.
    ///
    /// Unknown or unavailable IDs fall back to the first available option, or
    /// to the first option when none is available.
    pub fn resolve(&self, id: &DeliveryOptionId) -> &DeliveryOption {
        match self.get(id) {
            Some(option) if option.is_available => option,
            selected => {
                tracing::debug!(
                    delivery_option = %id,
                    known = selected.is_some(),
                    "delivery option not offered, using fallback"
                );
                self.options
                    .iter()
                    .find(|o| o.is_available)
                    .unwrap_or(&self.options[0])
            }
        }
    }
}

impl Default for DeliveryCatalog {
    fn default() -> Self {
        Self {
            options: Self::default_options(),
        }
    }
}

/// Tip amounts offered at checkout.
pub const TIP_PRESETS: [Money; 4] = [
    Money::new(0),
    Money::new(5_000),
    Money::new(10_000),
    Money::new(20_000),
];

/// A tip choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipOption {
    pub amount: Money,
}

impl TipOption {
    /// The preset tip choices.
    pub fn presets() -> Vec<TipOption> {
        TIP_PRESETS.iter().map(|&amount| TipOption { amount }).collect()
    }

    /// Button label.
    pub fn label(&self, currency: Currency) -> String {
        if self.amount.is_zero() {
            "No tip".to_string()
        } else {
            self.amount.display(currency)
        }
    }
}

/// Distance-based shipping fee for one restaurant and location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuote {
    pub fee: Money,
    #[serde(alias = "distance")]
    pub distance_km: f64,
}

impl ShippingQuote {
    /// Create a quote.
    pub fn new(fee: Money, distance_km: f64) -> Self {
        Self { fee, distance_km }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_prices() {
        let catalog = DeliveryCatalog::default();
        let price = |id: &str| catalog.get(&DeliveryOptionId::new(id)).unwrap().price;
        assert_eq!(price("standard"), Money::new(15_000));
        assert_eq!(price("express"), Money::new(25_000));
        assert_eq!(price("scheduled"), Money::new(15_000));
    }

    #[test]
    fn test_unknown_option_falls_back_to_first() {
        let catalog = DeliveryCatalog::default();
        let option = catalog.resolve(&DeliveryOptionId::new("drone"));
        assert_eq!(option.id, DeliveryOptionId::new("standard"));
    }

    #[test]
    fn test_unavailable_option_falls_back_to_first_available() {
        let mut options = DeliveryCatalog::default_options();
        options[0].is_available = false;
        options[1].is_available = false;
        let catalog = DeliveryCatalog::new(options).unwrap();

        let option = catalog.resolve(&DeliveryOptionId::new("express"));
        assert_eq!(option.id, DeliveryOptionId::new("scheduled"));
        assert_eq!(
            catalog.resolve(&DeliveryOptionId::new("scheduled")).id,
            DeliveryOptionId::new("scheduled")
        );
    }

    #[test]
    fn test_nothing_available_uses_first_option() {
        let options = DeliveryCatalog::default_options()
            .into_iter()
            .map(|mut o| {
                o.is_available = false;
                o
            })
            .collect();
        let catalog = DeliveryCatalog::new(options).unwrap();

        assert_eq!(
            catalog.resolve(&DeliveryOptionId::new("express")).id,
            DeliveryOptionId::new("standard")
        );
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(
            DeliveryCatalog::new(Vec::new()),
            Err(ValidationError::EmptyDeliveryCatalog)
        );
    }

    #[test]
    fn test_tip_presets() {
        let labels: Vec<String> = TipOption::presets()
            .iter()
            .map(|t| t.label(Currency::VND))
            .collect();
        assert_eq!(labels, vec!["No tip", "5.000\u{0111}", "10.000\u{0111}", "20.000\u{0111}"]);
    }

    #[test]
    fn test_quote_distance_alias() {
        let quote: ShippingQuote = serde_json::from_str(r#"{"fee": 18000, "distance": 3.2}"#).unwrap();
        assert_eq!(quote.fee, Money::new(18_000));
        assert!((quote.distance_km - 3.2).abs() < f64::EPSILON);
    }
}
