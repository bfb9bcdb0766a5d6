//! Delivery address types.

use crate::ids::AddressId;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    #[serde(alias = "long")]
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Key for caching location-dependent lookups.
    ///
    /// Rounded to four decimals (about 11 m), so GPS jitter around the same
    /// doorstep maps to one key.
    pub fn cache_key(&self) -> String {
        format!("{:.4},{:.4}", self.lat, self.lng)
    }
}

/// A delivery address, copied into checkout preferences at selection time.
///
/// Editing the saved address later does not change a selection already made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    /// Short label (e.g., "Home").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Full street address.
    pub address: String,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl DeliveryAddress {
    /// Create an address.
    pub fn new(address: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: None,
            label: None,
            address: address.into(),
            location,
            contact_name: None,
            contact_phone: None,
        }
    }

    /// Set the saved-address ID.
    pub fn with_id(mut self, id: impl Into<AddressId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the contact person.
    pub fn with_contact(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.contact_name = Some(name.into());
        self.contact_phone = Some(phone.into());
        self
    }

    /// Label and address on one line.
    pub fn one_line(&self) -> String {
        match &self.label {
            Some(label) => format!("{}: {}", label, self.address),
            None => self.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_rounds_jitter() {
        let a = GeoPoint::new(10.776_889_1, 106.700_806_2);
        let b = GeoPoint::new(10.776_891_7, 106.700_809_9);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "10.7769,106.7008");
    }

    #[test]
    fn test_one_line() {
        let addr = DeliveryAddress::new("227 Nguyen Van Cu, Q5", GeoPoint::new(10.76, 106.68))
            .with_label("Home");
        assert_eq!(addr.one_line(), "Home: 227 Nguyen Van Cu, Q5");
    }

    #[test]
    fn test_long_alias() {
        let point: GeoPoint = serde_json::from_str(r#"{"lat": 10.5, "long": 106.5}"#).unwrap();
        assert_eq!(point, GeoPoint::new(10.5, 106.5));
    }
}
