//! Integration tests for Telshop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p telshop-integration-tests
//! ```
//!
//! No external services are needed: [`FakeBackend`] serves the Telshop REST
//! API in-process on an ephemeral port and records every call it receives.
//!
//! # Test Categories
//!
//! - `storefront` - Catalog, cart and checkout through the `Shop` controller
//! - `admin` - Product and order management through `AdminClient`

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use telshop_core::{
    CreateOrderRequest, Order, OrderId, OrderStatus, Telephone, TelephoneId, TelephoneImage,
};
use url::Url;

/// One multipart file part received by the fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

/// One create or update upload.
#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub telephone_content_type: Option<String>,
    pub telephone: serde_json::Value,
    pub files: Vec<ReceivedFile>,
}

/// Data served by the fake backend, plus a log of what it was asked to do.
#[derive(Debug, Default)]
pub struct BackendState {
    pub telephones: Vec<Telephone>,
    pub orders: Vec<Order>,

    pub fail_catalog: bool,
    pub fail_detail: bool,
    pub fail_filter: bool,
    pub fail_cart_add: bool,
    pub fail_orders: bool,

    pub cart_adds: Vec<(i64, i64)>,
    pub filter_queries: Vec<HashMap<String, String>>,
    pub order_requests: Vec<CreateOrderRequest>,
    pub uploads: Vec<ReceivedUpload>,
    pub status_updates: Vec<(i64, String)>,
    pub deleted_telephones: Vec<i64>,
    pub deleted_orders: Vec<i64>,
}

type Shared = Arc<Mutex<BackendState>>;

/// In-process stand-in for the Telshop REST backend.
pub struct FakeBackend {
    api_base: Url,
    state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    /// Start serving on `127.0.0.1` with an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(state: BackendState) -> Self {
        let state: Shared = Arc::new(Mutex::new(state));
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let api_base = Url::parse(&format!("http://{addr}/telshop")).expect("Valid test URL");
        Self {
            api_base,
            state,
            handle,
        }
    }

    /// Base URL to hand to the clients.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Inspect or change backend state.
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A catalog entry with the fields most tests care about.
#[must_use]
pub fn telephone(id: i64, brand: &str, model: &str, price: i64) -> Telephone {
    Telephone {
        id: TelephoneId::new(id),
        brand: brand.to_string(),
        model: model.to_string(),
        price: Some(Decimal::new(price, 0)),
        ..Telephone::default()
    }
}

/// The default three-phone catalog.
#[must_use]
pub fn sample_catalog() -> Vec<Telephone> {
    let mut iphone = telephone(5, "Apple", "iPhone 15", 999);
    iphone.color = Some("Blue".into());
    let mut galaxy = telephone(7, "Samsung", "Galaxy S24", 899);
    galaxy.description = Some("Flagship camera phone".into());
    let redmi = telephone(9, "Xiaomi", "Redmi Note 13", 249);
    vec![iphone, galaxy, redmi]
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/telephones/all", get(list_telephones))
        .route("/telephones/filter", get(filter_telephones))
        .route("/telephones/{id}", get(get_telephone))
        .route("/telephones/create", post(create_telephone))
        .route("/telephones/update/{id}", put(update_telephone))
        .route("/telephones/delete/{id}", delete(delete_telephone))
        .route("/cart/add", post(add_to_cart))
        .route("/orders/create", post(create_order))
        .route("/orders/all", get(list_orders))
        .route("/orders/update-status/{id}", put(update_order_status))
        .route("/orders/delete/{id}", delete(delete_order));

    Router::new().nest("/telshop", api).with_state(state)
}

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

async fn list_telephones(State(state): State<Shared>) -> Response {
    let state = lock(&state);
    if state.fail_catalog {
        return failure();
    }
    Json(state.telephones.clone()).into_response()
}

async fn get_telephone(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = lock(&state);
    if state.fail_detail {
        return failure();
    }
    state
        .telephones
        .iter()
        .find(|t| t.id.as_i64() == id)
        .map_or_else(
            || (StatusCode::NOT_FOUND, "Telephone not found").into_response(),
            |t| Json(t.clone()).into_response(),
        )
}

async fn filter_telephones(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = lock(&state);
    state.filter_queries.push(params.clone());
    if state.fail_filter {
        return failure();
    }
    let brand = params.get("brand").map(|b| b.to_lowercase());
    let matching: Vec<Telephone> = state
        .telephones
        .iter()
        .filter(|t| {
            brand
                .as_ref()
                .is_none_or(|b| t.brand.to_lowercase().contains(b))
        })
        .cloned()
        .collect();
    Json(matching).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartAddParams {
    client_id: i64,
    telephone_id: i64,
}

async fn add_to_cart(State(state): State<Shared>, Query(params): Query<CartAddParams>) -> Response {
    let mut state = lock(&state);
    state.cart_adds.push((params.client_id, params.telephone_id));
    if state.fail_cart_add {
        return failure();
    }
    StatusCode::OK.into_response()
}

async fn create_order(
    State(state): State<Shared>,
    Json(request): Json<CreateOrderRequest>,
) -> Response {
    let mut state = lock(&state);
    state.order_requests.push(request.clone());
    if state.fail_orders {
        return failure();
    }

    let telephones = request
        .telephone_ids
        .iter()
        .filter_map(|id| state.telephones.iter().find(|t| t.id == *id).cloned())
        .collect();
    let next_id = i64::try_from(state.orders.len()).unwrap_or(i64::MAX) + 1;
    let order = Order {
        id: Some(OrderId::new(next_id)),
        full_name: request.full_name,
        phone_number: request.phone_number,
        address: request.address,
        status: request.status,
        order_date: None,
        telephones,
    };
    state.orders.push(order.clone());
    Json(order).into_response()
}

async fn list_orders(State(state): State<Shared>) -> Response {
    Json(lock(&state).orders.clone()).into_response()
}

#[derive(Deserialize)]
struct StatusParams {
    status: String,
}

async fn update_order_status(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Query(params): Query<StatusParams>,
) -> Response {
    let mut state = lock(&state);
    state.status_updates.push((id, params.status.clone()));
    let Ok(status) = params.status.parse::<OrderStatus>() else {
        return (StatusCode::BAD_REQUEST, "Unknown status").into_response();
    };
    match state.orders.iter_mut().find(|o| o.id == Some(OrderId::new(id))) {
        Some(order) => {
            order.status = status;
            Json(order.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Order not found").into_response(),
    }
}

async fn delete_order(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = lock(&state);
    state.deleted_orders.push(id);
    state.orders.retain(|o| o.id != Some(OrderId::new(id)));
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_telephone(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = lock(&state);
    state.deleted_telephones.push(id);
    state.telephones.retain(|t| t.id.as_i64() != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn create_telephone(State(state): State<Shared>, multipart: Multipart) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };
    let mut state = lock(&state);
    let next_id = state.telephones.iter().map(|t| t.id.as_i64()).max().unwrap_or(0) + 1;
    store_upload(&mut state, next_id, upload)
}

async fn update_telephone(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };
    let mut state = lock(&state);
    if !state.telephones.iter().any(|t| t.id.as_i64() == id) {
        return (StatusCode::NOT_FOUND, "Telephone not found").into_response();
    }
    state.telephones.retain(|t| t.id.as_i64() != id);
    store_upload(&mut state, id, upload)
}

fn store_upload(state: &mut BackendState, id: i64, upload: ReceivedUpload) -> Response {
    let mut telephone: Telephone = match serde_json::from_value(upload.telephone.clone()) {
        Ok(telephone) => telephone,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    telephone.id = TelephoneId::new(id);
    telephone.images = upload
        .files
        .iter()
        .enumerate()
        .map(|(n, _)| TelephoneImage {
            id: None,
            url: format!("/images/{id}-{n}"),
            preview_image: n == 0,
        })
        .collect();
    state.uploads.push(upload);
    state.telephones.push(telephone.clone());
    Json(telephone).into_response()
}

async fn read_upload(mut multipart: Multipart) -> Result<ReceivedUpload, Response> {
    let bad_request = |message: String| (StatusCode::BAD_REQUEST, message).into_response();

    let mut telephone = None;
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| bad_request(e.to_string()))?;

        if name == "telephone" {
            let value: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(|e| bad_request(e.to_string()))?;
            telephone = Some((content_type, value));
        } else {
            files.push(ReceivedFile {
                field: name,
                file_name,
                content_type,
                len: bytes.len(),
            });
        }
    }

    let (telephone_content_type, telephone) =
        telephone.ok_or_else(|| bad_request("missing telephone part".into()))?;
    Ok(ReceivedUpload {
        telephone_content_type,
        telephone,
        files,
    })
}
