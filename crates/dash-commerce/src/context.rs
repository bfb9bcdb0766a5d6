//! Checkout context.
//!
//! Owns the cart store, the preferences store and the remote collaborators
//! for one signed-in session. Construct it at sign-in, pass it to consumers,
//! tear it down at sign-out.

use crate::cart::{CartSnapshot, CartStore};
use crate::checkout::{
    CheckoutPreferences, DeliveryCatalog, OrderDraft, OrderReceipt, PreferencesStore,
    ShippingQuote, ShippingQuotes,
};
use crate::config::CheckoutConfig;
use crate::error::{CommerceError, ValidationError};
use crate::gateway::{CartGateway, OrderGateway, ShippingQuoteService, VoucherGateway};
use crate::ids::RestaurantId;
use crate::money::Money;
use crate::persistence::Persistence;
use crate::pricing::{PriceBreakdown, PricingEngine};
use crate::voucher::VoucherPartition;
use dash_cache::KvStore;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The remote collaborators of a context.
#[derive(Clone)]
pub struct Gateways {
    pub cart: Arc<dyn CartGateway>,
    pub vouchers: Arc<dyn VoucherGateway>,
    pub shipping: Arc<dyn ShippingQuoteService>,
    pub orders: Arc<dyn OrderGateway>,
}

impl Gateways {
    /// Use one implementation for every collaborator.
    pub fn from_shared<G>(gateway: Arc<G>) -> Self
    where
        G: CartGateway + VoucherGateway + ShippingQuoteService + OrderGateway + 'static,
    {
        Self {
            cart: gateway.clone(),
            vouchers: gateway.clone(),
            shipping: gateway.clone(),
            orders: gateway,
        }
    }
}

/// Aggregation root for cart and checkout.
pub struct CheckoutContext {
    cart: CartStore,
    preferences: PreferencesStore,
    vouchers: Arc<dyn VoucherGateway>,
    quotes: ShippingQuotes,
    orders: Arc<dyn OrderGateway>,
    engine: PricingEngine,
    alive: AtomicBool,
}

impl fmt::Debug for CheckoutContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutContext")
            .field("cart", &self.cart)
            .field("preferences", &self.preferences)
            .field("quotes", &self.quotes)
            .field("engine", &self.engine)
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}

impl CheckoutContext {
    /// Build a context. With a `store`, both stores are rehydrated from it and
    /// persist to it under `config.store.namespace`.
    pub fn new(
        gateways: Gateways,
        config: CheckoutConfig,
        store: Option<Arc<dyn KvStore>>,
    ) -> Result<Self, CommerceError> {
        let catalog = DeliveryCatalog::new(config.delivery_options)?;

        let mut cart =
            CartStore::new(gateways.cart).with_serialized_mutations(config.store.serialize_mutations);
        let mut preferences = PreferencesStore::new(config.pricing.default_delivery_option.clone());
        if let Some(store) = store {
            let persistence = Persistence::new(store, config.store.namespace.clone());
            cart = cart.with_persistence(persistence.clone());
            preferences = preferences.with_persistence(persistence);
        }

        info!(
            namespace = %config.store.namespace,
            serialize_mutations = config.store.serialize_mutations,
            delivery_options = catalog.options().len(),
            "checkout context ready"
        );

        Ok(Self {
            cart,
            preferences,
            vouchers: gateways.vouchers,
            quotes: ShippingQuotes::new(gateways.shipping),
            orders: gateways.orders,
            engine: PricingEngine::new(config.pricing, catalog),
            alive: AtomicBool::new(true),
        })
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn preferences(&self) -> &PreferencesStore {
        &self.preferences
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn shipping_quotes(&self) -> &ShippingQuotes {
        &self.quotes
    }

    /// Start (or resume) checkout for a restaurant.
    pub fn begin_checkout(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<CheckoutPreferences, CommerceError> {
        self.ensure_alive()?;
        Ok(self.preferences.begin_checkout(restaurant_id))
    }

    /// Fetch the voucher catalog and split it for the restaurant's cart.
    ///
    /// The catalog is fetched on every call.
    pub async fn load_vouchers(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<VoucherPartition, CommerceError> {
        self.ensure_alive()?;
        let catalog = self.vouchers.list_vouchers().await?;
        self.ensure_alive()?;

        let subtotal = self
            .cart
            .snapshot_for(restaurant_id)
            .map_or(Money::ZERO, |s| s.subtotal());
        let delivery_price = self.engine.delivery_price(&self.preferences.current());
        let partition = self
            .engine
            .resolver()
            .partition(subtotal, &catalog, delivery_price);

        debug!(
            restaurant_id = %restaurant_id,
            available = partition.available.len(),
            unavailable = partition.unavailable.len(),
            "partitioned vouchers"
        );
        Ok(partition)
    }

    /// Shipping quote for the selected address, fetched once per location.
    ///
    /// Returns `None` while no address is selected.
    pub async fn shipping_quote(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Option<ShippingQuote>, CommerceError> {
        self.ensure_alive()?;
        let Some(address) = self.preferences.current().selected_address else {
            return Ok(None);
        };
        let quote = self.quotes.quote(restaurant_id, address.location).await?;
        Ok(Some(quote))
    }

    /// Price the restaurant's cart under the current preferences.
    ///
    /// Uses a shipping quote only if one was already fetched for the selected
    /// address. An empty cart is a [`ValidationError::EmptyCart`].
    pub fn price(&self, restaurant_id: &RestaurantId) -> Result<PriceBreakdown, CommerceError> {
        let snapshot = self.checkout_snapshot(restaurant_id)?;
        let preferences = self.preferences.current();
        let quote = self.cached_quote(restaurant_id, &preferences);
        Ok(self.engine.compute(&snapshot, &preferences, quote.as_ref()))
    }

    /// Validate, price and submit the restaurant's cart.
    ///
    /// On acceptance the restaurant's snapshot is cleared locally and the
    /// preferences are reset. Validation failures happen before any network call.
    pub async fn place_order(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<OrderReceipt, CommerceError> {
        self.ensure_alive()?;
        let snapshot = self.checkout_snapshot(restaurant_id)?;
        let preferences = self.preferences.current();
        let quote = self.cached_quote(restaurant_id, &preferences);
        let breakdown = self.engine.compute(&snapshot, &preferences, quote.as_ref());
        let draft = OrderDraft::build(&snapshot, &preferences, &breakdown)?;

        info!(
            restaurant_id = %restaurant_id,
            items = draft.item_count(),
            total = breakdown.total.minor_units(),
            "placing order"
        );
        let receipt = self.orders.submit_order(&draft).await?;

        if !self.is_alive() {
            warn!(order_id = %receipt.order_id, "order accepted after teardown; local state left as is");
            return Ok(receipt);
        }

        self.cart.clear_for_restaurant(restaurant_id);
        self.preferences.reset_for_restaurant(restaurant_id);
        info!(order_id = %receipt.order_id, restaurant_id = %restaurant_id, "order placed");
        Ok(receipt)
    }

    /// Stop applying remote responses and persisting changes. Idempotent.
    pub fn teardown(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            self.cart.teardown();
            self.preferences.teardown();
            info!("checkout context torn down");
        }
    }

    /// Check if the context is still live.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn ensure_alive(&self) -> Result<(), CommerceError> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(CommerceError::ContextClosed)
        }
    }

    fn checkout_snapshot(&self, restaurant_id: &RestaurantId) -> Result<CartSnapshot, CommerceError> {
        self.cart
            .snapshot_for(restaurant_id)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::EmptyCart(restaurant_id.clone()).into())
    }

    fn cached_quote(
        &self,
        restaurant_id: &RestaurantId,
        preferences: &CheckoutPreferences,
    ) -> Option<ShippingQuote> {
        let address = preferences.selected_address.as_ref()?;
        self.quotes.cached(restaurant_id, address.location)
    }
}
