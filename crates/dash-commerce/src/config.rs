//! Engine configuration.

use crate::checkout::{DeliveryCatalog, DeliveryOption};
use crate::pricing::PricingConfig;
use serde::{Deserialize, Serialize};

/// Default persistence namespace.
pub const DEFAULT_NAMESPACE: &str = "food-delivery-storage";

/// Persistence and mutation settings of the stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key prefix of persisted state.
    pub namespace: String,
    /// Run at most one cart mutation per restaurant at a time.
    pub serialize_mutations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            serialize_mutations: false,
        }
    }
}

/// Everything [`CheckoutContext`](crate::CheckoutContext) needs besides its gateways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    pub pricing: PricingConfig,
    pub store: StoreConfig,
    pub delivery_options: Vec<DeliveryOption>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            store: StoreConfig::default(),
            delivery_options: DeliveryCatalog::default_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PlatformFee;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CheckoutConfig =
            serde_json::from_str(r#"{"store": {"serialize_mutations": true}}"#).unwrap();

        assert!(config.store.serialize_mutations);
        assert_eq!(config.store.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.delivery_options.len(), 3);
        assert_eq!(config.pricing.platform_fee, PlatformFee::default());
    }
}
