//! Back-office REST client.
//!
//! # Endpoints
//!
//! - `GET /telephones/all`
//! - `POST /telephones/create` (multipart)
//! - `PUT /telephones/update/{id}` (multipart)
//! - `DELETE /telephones/delete/{id}`
//! - `GET /orders/all`
//! - `PUT /orders/update-status/{id}?status=`
//! - `DELETE /orders/delete/{id}`
//!
//! Create and update send a multipart body: a `telephone` part holding the
//! product as JSON, plus optional `file1` and `file2` image parts.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use telshop_core::{Order, OrderId, OrderStatus, Telephone, TelephoneId};
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{AdminError, Result};
use crate::forms::{ImageUploads, TelephonePayload};

/// Client for the back-office endpoints.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    /// Create a new client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(api_base: &Url) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url: api_base.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Telephones
    // =========================================================================

    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_telephones(&self) -> Result<Vec<Telephone>> {
        let response = self
            .inner
            .client
            .get(self.url("/telephones/all"))
            .send()
            .await?;
        handle_response(response).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self, payload, images), fields(model = %payload.model))]
    pub async fn create_telephone(
        &self,
        payload: &TelephonePayload,
        images: &ImageUploads,
    ) -> Result<Telephone> {
        let form = multipart_form(payload, images)?;
        let response = self
            .inner
            .client
            .post(self.url("/telephones/create"))
            .multipart(form)
            .send()
            .await?;
        let telephone: Telephone = handle_response(response).await?;
        info!(telephone_id = %telephone.id, "Telephone created");
        Ok(telephone)
    }

    /// Replace a product's fields. Images are only replaced for filled slots.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self, payload, images), fields(telephone_id = %id))]
    pub async fn update_telephone(
        &self,
        id: TelephoneId,
        payload: &TelephonePayload,
        images: &ImageUploads,
    ) -> Result<Telephone> {
        let form = multipart_form(payload, images)?;
        let response = self
            .inner
            .client
            .put(self.url(&format!("/telephones/update/{id}")))
            .multipart(form)
            .send()
            .await?;
        let telephone = handle_response(response).await?;
        info!("Telephone updated");
        Ok(telephone)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(telephone_id = %id))]
    pub async fn delete_telephone(&self, id: TelephoneId) -> Result<()> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/telephones/delete/{id}")))
            .send()
            .await?;
        expect_success(response).await?;
        info!("Telephone deleted");
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Fetch every order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let response = self
            .inner
            .client
            .get(self.url("/orders/all"))
            .send()
            .await?;
        let orders: Vec<Order> = handle_response(response).await?;
        debug!(count = orders.len(), "Orders fetched");
        Ok(orders)
    }

    /// Move an order to a new status.
    ///
    /// Only the response status is checked; the body is ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<()> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("/orders/update-status/{id}")))
            .query(&[("status", status.as_str())])
            .send()
            .await?;
        expect_success(response).await?;
        info!("Order status updated");
        Ok(())
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: OrderId) -> Result<()> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/orders/delete/{id}")))
            .send()
            .await?;
        expect_success(response).await?;
        info!("Order deleted");
        Ok(())
    }
}

fn multipart_form(payload: &TelephonePayload, images: &ImageUploads) -> Result<Form> {
    let json = serde_json::to_string(payload)?;
    let mut form = Form::new().part(
        "telephone",
        Part::text(json).mime_str("application/json")?,
    );
    for (name, image) in images.parts() {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.content_type)?;
        form = form.part(name, part);
    }
    Ok(form)
}

// =============================================================================
// Response Helpers
// =============================================================================

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = expect_success(response).await?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), message = %message, "Backend returned an error");
    Err(AdminError::Api {
        status: status.as_u16(),
        message,
    })
}
