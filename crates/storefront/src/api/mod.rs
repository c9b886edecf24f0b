//! REST client for the Telshop backend.
//!
//! # Endpoints
//!
//! - `GET /telephones/all` - full catalog
//! - `GET /telephones/{id}` - one telephone
//! - `GET /telephones/filter?...` - server-side catalog filtering
//! - `POST /cart/add?clientId=&telephoneId=` - server-side cart (best-effort)
//! - `POST /orders/create` - order submission
//!
//! # Example
//!
//! ```rust,ignore
//! use telshop_storefront::api::TelshopClient;
//!
//! let client = TelshopClient::new(&config.api_base)?;
//! let telephones = client.list_telephones().await?;
//! ```

mod client;

pub use client::TelshopClient;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }
}
