//! `TelshopClient` implementation.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use telshop_core::{ClientId, CreateOrderRequest, Order, Telephone, TelephoneId};
use tracing::{debug, instrument};
use url::Url;

use super::ApiError;
use crate::catalog::CatalogFilter;

// =============================================================================
// TelshopClient
// =============================================================================

/// Client for the Telshop storefront REST API.
///
/// Cheap to clone; clones share one connection pool. No request timeout is
/// configured: failures surface only as transport errors or non-success
/// statuses.
#[derive(Clone)]
pub struct TelshopClient {
    inner: Arc<TelshopClientInner>,
}

struct TelshopClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl TelshopClient {
    /// Create a new client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(api_base: &Url) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(TelshopClientInner {
                client,
                base_url: api_base.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_telephones(&self) -> Result<Vec<Telephone>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url("/telephones/all"))
            .send()
            .await?;
        let telephones: Vec<Telephone> = handle_response(response).await?;
        debug!(count = telephones.len(), "Catalog fetched");
        Ok(telephones)
    }

    /// Fetch a single telephone.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(telephone_id = %id))]
    pub async fn get_telephone(&self, id: TelephoneId) -> Result<Telephone, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/telephones/{id}")))
            .send()
            .await?;
        handle_response(response).await
    }

    /// Ask the backend to filter the catalog.
    ///
    /// Only non-empty filter fields are sent.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn filter_telephones(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<Telephone>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url("/telephones/filter"))
            .query(&filter.to_query())
            .send()
            .await?;
        handle_response(response).await
    }

    /// Add a telephone to the server-side cart.
    ///
    /// The response body is ignored; only the status matters.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(client_id = %client_id, telephone_id = %telephone_id))]
    pub async fn add_to_cart(
        &self,
        client_id: ClientId,
        telephone_id: TelephoneId,
    ) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/cart/add"))
            .query(&[
                ("clientId", client_id.to_string()),
                ("telephoneId", telephone_id.to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self, request), fields(items = request.telephone_ids.len()))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/orders/create"))
            .json(request)
            .send()
            .await?;
        let order: Order = handle_response(response).await?;
        debug!(order_id = ?order.id, "Order created");
        Ok(order)
    }
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Decode a success body, or turn a failure status into `ApiError::Status`.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }
    // Read as text first so parse errors carry serde's position information
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    tracing::warn!(status, message = %message, "Backend returned an error");
    ApiError::Status { status, message }
}
