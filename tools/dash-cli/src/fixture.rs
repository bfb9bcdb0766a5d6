//! Cart and voucher fixtures.
//!
//! A fixture is either the bare JSON payload or a saved backend response in
//! the `{EC, EM, DT}` envelope.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use dash_commerce::cart::{normalize_cart, CartSnapshot};
use dash_commerce::voucher::Voucher;
use dash_commerce::RestaurantId;
use dash_data::ApiEnvelope;
use serde::de::DeserializeOwned;

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read fixture: {}", path.display()))?;

    if let Ok(envelope) = ApiEnvelope::<T>::from_slice(&bytes) {
        return envelope
            .into_data()
            .with_context(|| format!("Fixture holds a failed response: {}", path.display()));
    }
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse fixture: {}", path.display()))
}

/// Load and validate a cart.
pub fn load_cart(path: &Path) -> Result<Vec<CartSnapshot>> {
    let cart = load::<Vec<CartSnapshot>>(path)?;
    normalize_cart(cart).with_context(|| format!("Invalid cart fixture: {}", path.display()))
}

/// Load a voucher catalog.
pub fn load_vouchers(path: &Path) -> Result<Vec<Voucher>> {
    load(path)
}

/// Snapshot of `restaurant`, or of the only restaurant in the cart.
pub fn pick_snapshot(cart: &[CartSnapshot], restaurant: Option<&str>) -> Result<CartSnapshot> {
    match restaurant {
        Some(id) => {
            let id = RestaurantId::new(id);
            cart.iter()
                .find(|s| s.restaurant_id == id)
                .cloned()
                .ok_or_else(|| anyhow!("No items for restaurant {} in the cart", id))
        }
        None => match cart {
            [only] => Ok(only.clone()),
            [] => Err(anyhow!("The cart is empty")),
            _ => Err(anyhow!(
                "The cart holds {} restaurants; pick one with --restaurant",
                cart.len()
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CART: &str = r#"[{
        "restaurantId": "r1",
        "items": [
            {"id": "li-1", "restaurantId": "r1", "foodId": "pho", "quantity": 2, "unitPrice": 20000},
            {"id": "li-2", "restaurantId": "r1", "foodId": "tea", "quantity": 1, "unitPrice": 9000}
        ]
    }]"#;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_bare_and_enveloped_carts_match() {
        let dir = tempfile::tempdir().unwrap();
        let bare = write(&dir, "bare.json", CART);
        let wrapped = write(
            &dir,
            "wrapped.json",
            &format!(r#"{{"EC": "0", "EM": "ok", "DT": {}}}"#, CART),
        );

        let bare = load_cart(&bare).unwrap();
        assert_eq!(bare, load_cart(&wrapped).unwrap());
        assert_eq!(bare[0].subtotal().minor_units(), 49_000);
    }

    #[test]
    fn test_failed_response_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "failed.json", r#"{"EC": "1", "EM": "nope", "DT": null}"#);
        assert!(load_cart(&path).is_err());
    }

    #[test]
    fn test_pick_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cart = load_cart(&write(&dir, "cart.json", CART)).unwrap();

        assert!(pick_snapshot(&cart, None).is_ok());
        assert!(pick_snapshot(&cart, Some("r1")).is_ok());
        assert!(pick_snapshot(&cart, Some("r2")).is_err());
        assert!(pick_snapshot(&[], None).is_err());
    }
}
