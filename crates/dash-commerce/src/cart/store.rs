//! Cart store.
//!
//! Holds the last-known cart, one [`CartSnapshot`] per restaurant. Every
//! mutation is a gateway round trip whose response replaces the local cart
//! wholesale; a failed call leaves the last-known-good cart untouched.
//!
//! Each issued mutation gets a sequence number. A response that lands after a
//! newer one was already applied is still applied (the last response to land
//! wins) but is logged and counted as a stale response. With
//! [`CartStore::with_serialized_mutations`] mutations for the same restaurant
//! run one at a time, which removes that race for per-restaurant operations.

use crate::cart::{normalize_cart, CartSnapshot, NewLineItemRequest, QuantityDirection, QuantityUpdate};
use crate::error::CommerceError;
use crate::gateway::{CartGateway, GatewayResult};
use crate::ids::{LineItemId, RestaurantId};
use crate::persistence::{Persistence, CART_PART};
use dashmap::DashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Queue key for operations spanning the whole cart.
const WHOLE_CART: &str = "*";

#[derive(Debug, Default)]
struct CartState {
    snapshots: Vec<CartSnapshot>,
    /// Highest sequence number whose effect is reflected in `snapshots`.
    applied_seq: u64,
}

/// Client-side view of the remote cart.
pub struct CartStore {
    gateway: Arc<dyn CartGateway>,
    persistence: Option<Persistence>,
    state: RwLock<CartState>,
    next_seq: AtomicU64,
    alive: AtomicBool,
    serialize_mutations: bool,
    queues: DashMap<String, Arc<Mutex<()>>>,
    stale_responses: AtomicU64,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("restaurants", &self.read_state().snapshots.len())
            .field("alive", &self.is_alive())
            .field("serialize_mutations", &self.serialize_mutations)
            .field("stale_responses", &self.stale_response_count())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty store backed by `gateway`.
    pub fn new(gateway: Arc<dyn CartGateway>) -> Self {
        Self {
            gateway,
            persistence: None,
            state: RwLock::new(CartState::default()),
            next_seq: AtomicU64::new(0),
            alive: AtomicBool::new(true),
            serialize_mutations: false,
            queues: DashMap::new(),
            stale_responses: AtomicU64::new(0),
        }
    }

    /// Rehydrate from and persist to `persistence`.
    pub fn with_persistence(mut self, persistence: Persistence) -> Self {
        if let Some(persisted) = persistence.load::<Vec<CartSnapshot>>(CART_PART) {
            match normalize_cart(persisted) {
                Ok(snapshots) => {
                    debug!(restaurants = snapshots.len(), "rehydrated cart");
                    self.state
                        .get_mut()
                        .unwrap_or_else(PoisonError::into_inner)
                        .snapshots = snapshots;
                }
                Err(e) => warn!(error = %e, "ignoring invalid persisted cart"),
            }
        }
        self.persistence = Some(persistence);
        self
    }

    /// Run at most one mutation per restaurant at a time.
    pub fn with_serialized_mutations(mut self, enabled: bool) -> Self {
        self.serialize_mutations = enabled;
        self
    }

    /// Add food to a restaurant's cart.
    pub async fn add_item(
        &self,
        request: NewLineItemRequest,
    ) -> Result<Vec<CartSnapshot>, CommerceError> {
        request.validate()?;
        let key = request.restaurant_id.to_string();
        self.mutate("add_item", key, || self.gateway.add_item(&request))
            .await
    }

    /// Remove a line item.
    pub async fn remove_item(
        &self,
        line_item_id: &LineItemId,
    ) -> Result<Vec<CartSnapshot>, CommerceError> {
        let key = self.queue_key_for(line_item_id);
        self.mutate("remove_item", key, || self.gateway.remove_item(line_item_id))
            .await
    }

    /// Change the quantity of a line item.
    ///
    /// A decrease that takes the item to zero is still sent; the item's
    /// absence from the response is the successful outcome.
    pub async fn update_quantity(
        &self,
        line_item_id: &LineItemId,
        quantity: u32,
        direction: QuantityDirection,
    ) -> Result<Vec<CartSnapshot>, CommerceError> {
        let update = QuantityUpdate {
            line_item_id: line_item_id.clone(),
            quantity,
            direction,
        };
        let key = self.queue_key_for(line_item_id);
        self.mutate("update_quantity", key, || self.gateway.update_quantity(&update))
            .await
    }

    /// Empty the cart across all restaurants, remotely and locally.
    pub async fn clear_all(&self) -> Result<(), CommerceError> {
        self.mutate("clear_all", WHOLE_CART.to_string(), || async {
            self.gateway.clear_cart().await.map(|()| Vec::new())
        })
        .await
        .map(|_| ())
    }

    /// Re-read the cart from the gateway.
    pub async fn refresh(&self) -> Result<Vec<CartSnapshot>, CommerceError> {
        self.mutate("refresh", WHOLE_CART.to_string(), || self.gateway.fetch_cart())
            .await
    }

    /// Drop one restaurant's snapshot locally. No gateway call.
    ///
    /// In-flight mutations issued before this call are treated as stale when
    /// they land.
    pub fn clear_for_restaurant(&self, restaurant_id: &RestaurantId) -> Option<CartSnapshot> {
        let seq = self.issue_seq();
        let mut state = self.write_state();
        state.applied_seq = state.applied_seq.max(seq);
        let position = state
            .snapshots
            .iter()
            .position(|s| &s.restaurant_id == restaurant_id);
        let removed = position.map(|i| state.snapshots.remove(i));

        if removed.is_some() {
            info!(restaurant_id = %restaurant_id, seq, "cleared restaurant cart");
            self.persist(&state.snapshots);
        }
        removed
    }

    /// Snapshot of one restaurant.
    pub fn snapshot_for(&self, restaurant_id: &RestaurantId) -> Option<CartSnapshot> {
        self.read_state()
            .snapshots
            .iter()
            .find(|s| &s.restaurant_id == restaurant_id)
            .cloned()
    }

    /// All snapshots.
    pub fn snapshots(&self) -> Vec<CartSnapshot> {
        self.read_state().snapshots.clone()
    }

    /// Sum of quantities, for one restaurant or the whole cart.
    pub fn total_item_count(&self, restaurant_id: Option<&RestaurantId>) -> u64 {
        self.read_state()
            .snapshots
            .iter()
            .filter(|s| restaurant_id.map_or(true, |r| &s.restaurant_id == r))
            .map(CartSnapshot::item_count)
            .sum()
    }

    /// Number of responses applied after a newer one had already landed.
    pub fn stale_response_count(&self) -> u64 {
        self.stale_responses.load(Ordering::Relaxed)
    }

    /// Stop applying gateway responses. Calls in flight resolve to
    /// [`CommerceError::ContextClosed`] and leave state untouched; local
    /// changes made afterwards are no longer persisted.
    pub fn teardown(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            info!("cart store torn down");
        }
    }

    /// Check if the store still applies responses.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn mutate<F, Fut>(
        &self,
        operation: &'static str,
        key: String,
        call: F,
    ) -> Result<Vec<CartSnapshot>, CommerceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GatewayResult<Vec<CartSnapshot>>>,
    {
        self.ensure_alive()?;

        let queue = self.queue_for(&key);
        let result = match &queue {
            Some(queue) => {
                let _turn = queue.lock().await;
                self.run(operation, &key, call).await
            }
            None => self.run(operation, &key, call).await,
        };
        if let Some(queue) = queue {
            self.release_queue(&key, queue);
        }
        result
    }

    async fn run<F, Fut>(
        &self,
        operation: &'static str,
        key: &str,
        call: F,
    ) -> Result<Vec<CartSnapshot>, CommerceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GatewayResult<Vec<CartSnapshot>>>,
    {
        self.ensure_alive()?;

        let seq = self.issue_seq();
        debug!(operation, key = %key, seq, "cart mutation issued");

        let response = call().await;

        if !self.is_alive() {
            debug!(operation, seq, "discarding response for torn-down cart");
            return Err(CommerceError::ContextClosed);
        }

        let snapshots = match response.and_then(normalize_cart) {
            Ok(snapshots) => snapshots,
            Err(e) => {
                warn!(operation, seq, error = %e, "cart mutation failed; keeping last-known cart");
                return Err(e.into());
            }
        };

        self.apply(operation, seq, snapshots.clone());
        Ok(snapshots)
    }

    fn apply(&self, operation: &'static str, seq: u64, snapshots: Vec<CartSnapshot>) {
        let mut state = self.write_state();
        if seq < state.applied_seq {
            let stale = self.stale_responses.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                operation,
                seq,
                applied_seq = state.applied_seq,
                stale_responses = stale,
                "applying out-of-order cart response"
            );
        }
        state.applied_seq = state.applied_seq.max(seq);
        state.snapshots = snapshots;
        debug!(operation, seq, "cart replaced from gateway response");
        self.persist(&state.snapshots);
    }

    /// Called with the state lock held so writes land in the order applied.
    fn persist(&self, snapshots: &[CartSnapshot]) {
        if let Some(persistence) = self.persistence.as_ref().filter(|_| self.is_alive()) {
            persistence.save(CART_PART, &snapshots);
        }
    }

    fn ensure_alive(&self) -> Result<(), CommerceError> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(CommerceError::ContextClosed)
        }
    }

    fn issue_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn queue_for(&self, key: &str) -> Option<Arc<Mutex<()>>> {
        if !self.serialize_mutations {
            return None;
        }
        Some(self.queues.entry(key.to_string()).or_default().value().clone())
    }

    /// Drop the queue for `key` once no mutation holds or awaits it.
    fn release_queue(&self, key: &str, queue: Arc<Mutex<()>>) {
        drop(queue);
        self.queues.remove_if(key, |_, q| Arc::strong_count(q) == 1);
    }

    /// Line item mutations queue behind their restaurant when it is known.
    fn queue_key_for(&self, line_item_id: &LineItemId) -> String {
        self.read_state()
            .snapshots
            .iter()
            .find(|s| s.line_item(line_item_id).is_some())
            .map(|s| s.restaurant_id.to_string())
            .unwrap_or_else(|| format!("item:{}", line_item_id))
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CartState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CartState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
