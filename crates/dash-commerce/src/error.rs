//! Commerce error types.

use crate::ids::RestaurantId;
use thiserror::Error;

/// Failure of a call to a remote collaborator (cart, vouchers, shipping, orders).
///
/// Transport failures and domain rejections are kept apart so callers can
/// decide whether a retry makes sense.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced a usable response (network, timeout, HTTP status).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The gateway answered with a non-success result code.
    #[error("Gateway rejected request ({code}): {message}")]
    Domain { code: String, message: String },

    /// The response arrived but does not match the expected schema.
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Build a domain rejection.
    pub fn domain(code: impl Into<String>, message: impl Into<String>) -> Self {
        GatewayError::Domain {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this is a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

/// Local validation failures, raised before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No line items for the restaurant being checked out.
    #[error("Cart is empty for restaurant {0}")]
    EmptyCart(RestaurantId),

    /// Quantity must be at least one.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// An order cannot be placed without a delivery address.
    #[error("Checkout incomplete: missing delivery address")]
    MissingAddress,

    /// A configured delivery catalog must offer at least one option.
    #[error("Delivery catalog is empty")]
    EmptyDeliveryCatalog,
}

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Remote collaborator failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Local validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The checkout context was torn down while the operation was in flight.
    #[error("Checkout context has been torn down")]
    ContextClosed,
}

impl CommerceError {
    /// Gateway error, if this is one.
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            CommerceError::Gateway(e) => Some(e),
            _ => None,
        }
    }

    /// Validation error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            CommerceError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = GatewayError::domain("2", "Item sold out");
        assert_eq!(err.to_string(), "Gateway rejected request (2): Item sold out");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_commerce_error_accessors() {
        let err: CommerceError = ValidationError::EmptyCart(RestaurantId::new("r1")).into();
        assert!(err.as_gateway().is_none());
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::EmptyCart(RestaurantId::new("r1")))
        );
    }

    #[test]
    fn test_commerce_error_sources() {
        let gateway: CommerceError = GatewayError::Transport("reset".into()).into();
        assert!(gateway.as_gateway().is_some_and(GatewayError::is_transport));

        let closed = CommerceError::ContextClosed;
        assert!(closed.as_gateway().is_none());
        assert!(closed.as_validation().is_none());
        assert_eq!(closed.to_string(), "Checkout context has been torn down");
    }
}
