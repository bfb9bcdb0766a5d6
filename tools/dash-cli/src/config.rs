//! CLI configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use dash_commerce::checkout::{DeliveryCatalog, DeliveryOption};
use dash_commerce::pricing::PricingConfig;
use dash_commerce::{CheckoutConfig, StoreConfig, DEFAULT_NAMESPACE};
use dash_data::GatewayConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    /// Backend connection.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Pricing settings.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Local state.
    #[serde(default)]
    pub store: LocalStoreConfig,

    /// Delivery option catalog.
    #[serde(default = "DeliveryCatalog::default_options")]
    pub delivery_options: Vec<DeliveryOption>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            pricing: PricingConfig::default(),
            store: LocalStoreConfig::default(),
            delivery_options: DeliveryCatalog::default_options(),
        }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStoreConfig {
    /// Key prefix of persisted state.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Run at most one cart mutation per restaurant at a time.
    #[serde(default)]
    pub serialize_mutations: bool,

    /// Directory of the file store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            serialize_mutations: false,
            data_dir: None,
        }
    }
}

impl DashConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Engine configuration derived from this file.
    pub fn checkout(&self) -> CheckoutConfig {
        CheckoutConfig {
            pricing: self.pricing.clone(),
            store: StoreConfig {
                namespace: self.store.namespace.clone(),
                serialize_mutations: self.store.serialize_mutations,
            },
            delivery_options: self.delivery_options.clone(),
        }
    }
}

/// Generate a default config file.
pub fn generate_default_config() -> String {
    r#"# DashCart CLI configuration

[gateway]
base_url = "http://localhost:8080"
timeout_ms = 10000
connect_timeout_ms = 3000

[pricing]
currency = "VND"
platform_fee = { flat = 3000 }
default_delivery_option = "standard"

[store]
namespace = "food-delivery-storage"
serialize_mutations = false
# data_dir = ".dash/state"

[[delivery_options]]
id = "standard"
name = "Standard"
price = 15000
estimatedTime = "30-45 min"

[[delivery_options]]
id = "express"
name = "Express"
price = 25000
estimatedTime = "15-25 min"

[[delivery_options]]
id = "scheduled"
name = "Scheduled"
price = 15000
description = "Deliver at a chosen time"
"#
    .to_string()
}
