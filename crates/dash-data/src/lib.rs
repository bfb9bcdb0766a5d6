//! HTTP gateway for DashCart.
//!
//! Implements the gateway traits of `dash-commerce` against the backend's
//! REST API. Every response is wrapped in an `{EC, EM, DT}` envelope; a
//! non-zero `EC` becomes a [`GatewayError::Domain`](dash_commerce::GatewayError),
//! network failures and timeouts become `Transport`, and bodies that do not
//! decode become `InvalidResponse`.
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_data::{GatewayConfig, HttpGateway};
//! use dash_commerce::prelude::*;
//! use std::sync::Arc;
//!
//! let gateway = HttpGateway::from_config(&GatewayConfig::default())?
//!     .with_bearer_token(token);
//! let ctx = CheckoutContext::new(
//!     Gateways::from_shared(Arc::new(gateway)),
//!     CheckoutConfig::default(),
//!     None,
//! )?;
//! ctx.cart().refresh().await?;
//! ```

mod client;
mod envelope;
mod error;
mod gateway;
mod timeout;

pub use client::FetchClient;
pub use envelope::{ApiEnvelope, SUCCESS_CODE};
pub use error::FetchError;
pub use gateway::{paths, GatewayConfig, HttpGateway};
pub use timeout::TimeoutConfig;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, GatewayConfig, HttpGateway, TimeoutConfig};
}
