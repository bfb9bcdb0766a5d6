//! Memoized shipping quotes.

use crate::checkout::{GeoPoint, ShippingQuote};
use crate::error::GatewayError;
use crate::gateway::ShippingQuoteService;
use crate::ids::RestaurantId;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// Shipping quotes fetched once per (restaurant, rounded location).
///
/// Failed lookups are not cached.
pub struct ShippingQuotes {
    service: Arc<dyn ShippingQuoteService>,
    quotes: DashMap<(RestaurantId, String), ShippingQuote>,
}

impl fmt::Debug for ShippingQuotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShippingQuotes")
            .field("cached", &self.quotes.len())
            .finish_non_exhaustive()
    }
}

impl ShippingQuotes {
    /// Wrap a quote service.
    pub fn new(service: Arc<dyn ShippingQuoteService>) -> Self {
        Self {
            service,
            quotes: DashMap::new(),
        }
    }

    /// Quote for `restaurant_id` at `location`, from cache when possible.
    pub async fn quote(
        &self,
        restaurant_id: &RestaurantId,
        location: GeoPoint,
    ) -> Result<ShippingQuote, GatewayError> {
        if let Some(quote) = self.cached(restaurant_id, location) {
            return Ok(quote);
        }

        let quote = self.service.quote(restaurant_id, location).await?;
        tracing::debug!(
            restaurant_id = %restaurant_id,
            fee = quote.fee.minor_units(),
            distance_km = quote.distance_km,
            "fetched shipping quote"
        );
        self.quotes
            .insert((restaurant_id.clone(), location.cache_key()), quote);
        Ok(quote)
    }

    /// Cached quote, without calling the service.
    pub fn cached(&self, restaurant_id: &RestaurantId, location: GeoPoint) -> Option<ShippingQuote> {
        self.quotes
            .get(&(restaurant_id.clone(), location.cache_key()))
            .map(|entry| *entry.value())
    }

    /// Forget every quote for a restaurant.
    pub fn invalidate(&self, restaurant_id: &RestaurantId) {
        self.quotes.retain(|(r, _), _| r != restaurant_id);
    }

    /// Number of cached quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::testing::FakeGateway;

    #[tokio::test]
    async fn test_quote_fetched_once_per_location() {
        let gw = Arc::new(
            FakeGateway::new().with_quote("r1", ShippingQuote::new(Money::new(18_000), 3.1)),
        );
        let quotes = ShippingQuotes::new(gw.clone());
        let r1 = RestaurantId::new("r1");
        let home = GeoPoint::new(10.7769, 106.7008);

        let first = quotes.quote(&r1, home).await.unwrap();
        let second = quotes
            .quote(&r1, GeoPoint::new(10.776_91, 106.700_79))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(gw.quote_calls(), 1);

        quotes.quote(&r1, GeoPoint::new(10.80, 106.65)).await.unwrap();
        assert_eq!(gw.quote_calls(), 2);
        assert_eq!(quotes.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_quote_not_cached() {
        let gw = Arc::new(FakeGateway::new());
        let quotes = ShippingQuotes::new(gw.clone());
        let r1 = RestaurantId::new("r1");
        let home = GeoPoint::new(10.0, 106.0);

        assert!(quotes.quote(&r1, home).await.is_err());
        assert!(quotes.cached(&r1, home).is_none());
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_restaurant() {
        let gw = Arc::new(
            FakeGateway::new()
                .with_quote("r1", ShippingQuote::new(Money::new(18_000), 3.1))
                .with_quote("r2", ShippingQuote::new(Money::new(22_000), 5.0)),
        );
        let quotes = ShippingQuotes::new(gw);
        let home = GeoPoint::new(10.0, 106.0);
        quotes.quote(&RestaurantId::new("r1"), home).await.unwrap();
        quotes.quote(&RestaurantId::new("r2"), home).await.unwrap();

        quotes.invalidate(&RestaurantId::new("r1"));

        assert!(quotes.cached(&RestaurantId::new("r1"), home).is_none());
        assert!(quotes.cached(&RestaurantId::new("r2"), home).is_some());
    }
}
