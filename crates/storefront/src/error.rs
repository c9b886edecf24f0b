//! Unified error handling with Sentry integration.
//!
//! [`AppError`] is what the [`Shop`](crate::state::Shop) controller returns.
//! Every variant is recoverable: the front end shows the message and the
//! shopper retries, reloads or navigates elsewhere.

use telshop_core::TelephoneId;
use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartStoreError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend request failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Cart mirror could not be written.
    #[error("Cart storage error: {0}")]
    Store(#[from] CartStoreError),

    /// Checkout was blocked or rejected.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No such product in the catalog or on the backend.
    #[error("Not found: telephone {0}")]
    NotFound(TelephoneId),
}

impl AppError {
    /// Report errors that indicate a broken backend or local storage.
    ///
    /// Validation and empty-cart outcomes are ordinary shopper mistakes and
    /// are not reported.
    pub fn capture(&self) {
        let reportable = match self {
            Self::Api(_) | Self::Store(_) | Self::Config(_) => true,
            Self::Checkout(err) => !err.is_local(),
            Self::NotFound(_) => false,
        };
        if reportable {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("telephone_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound(TelephoneId::new(123));
        assert_eq!(err.to_string(), "Not found: telephone 123");

        let err = AppError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Your cart is empty");

        let err = AppError::from(ApiError::Status {
            status: 404,
            message: "Telephone not found".to_string(),
        });
        assert!(err.to_string().starts_with("Backend error: "));
    }

    #[test]
    fn test_capture_without_client_is_harmless() {
        // No Sentry client bound in tests; capturing must not panic
        AppError::NotFound(TelephoneId::new(1)).capture();
        AppError::from(CheckoutError::NoValidItems).capture();
        add_breadcrumb("test", "breadcrumb", Some(&[("key", "value")]));
    }
}
