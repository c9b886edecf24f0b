//! Storefront flows against the fake backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use telshop_core::{ClientId, OrderId, OrderStatus, TelephoneId, TelephoneStatus};
use telshop_integration_tests::{BackendState, FakeBackend, sample_catalog};
use telshop_storefront::api::TelshopClient;
use telshop_storefront::cart::{CartStore, FileCartStore, MemoryCartStore};
use telshop_storefront::catalog::CatalogFilter;
use telshop_storefront::checkout::{CheckoutError, DeliveryForm, FormField};
use telshop_storefront::config::ShopConfig;
use telshop_storefront::view::View;
use telshop_storefront::{AppError, FilterSource, Shop};
use tempfile::TempDir;

async fn backend() -> FakeBackend {
    FakeBackend::start(BackendState {
        telephones: sample_catalog(),
        ..BackendState::default()
    })
    .await
}

fn shop(backend: &FakeBackend) -> Shop<MemoryCartStore> {
    let client = TelshopClient::new(backend.api_base()).unwrap();
    Shop::new(client, ClientId::new(3), MemoryCartStore::new())
}

fn form() -> DeliveryForm {
    DeliveryForm {
        full_name: "Ivan Ivanov".into(),
        phone_number: "+375291234567".into(),
        address: "Minsk, Nezavisimosti 1".into(),
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_refresh_loads_catalog() {
    let backend = backend().await;
    let mut shop = shop(&backend);
    assert_eq!(shop.refresh_catalog().await.unwrap(), 3);
    assert_eq!(shop.catalog().telephones()[0].display_name(), "Apple iPhone 15");
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_catalog() {
    let backend = backend().await;
    let mut shop = shop(&backend);
    shop.refresh_catalog().await.unwrap();

    backend.state().fail_catalog = true;
    let err = shop.refresh_catalog().await.unwrap_err();
    assert!(matches!(err, AppError::Api(ref e) if e.status() == Some(500)));
    assert_eq!(shop.catalog().len(), 3);
}

#[tokio::test]
async fn test_filter_sends_only_set_fields() {
    let backend = backend().await;
    let shop = shop(&backend);
    let filter = CatalogFilter {
        brand: Some("sam".into()),
        model: Some(String::new()),
        status: Some(TelephoneStatus::Available),
        ..CatalogFilter::default()
    };

    let (telephones, source) = shop.filter_catalog(&filter).await;
    assert_eq!(source, FilterSource::Backend);
    assert_eq!(telephones.len(), 1);

    let state = backend.state();
    let query = &state.filter_queries[0];
    assert_eq!(query.get("brand").map(String::as_str), Some("sam"));
    assert_eq!(query.get("status").map(String::as_str), Some("Available"));
    assert!(!query.contains_key("model"));
}

#[tokio::test]
async fn test_filter_falls_back_to_local_catalog() {
    let backend = backend().await;
    let mut shop = shop(&backend);
    shop.refresh_catalog().await.unwrap();
    backend.state().fail_filter = true;

    let filter = CatalogFilter {
        search_term: Some("camera".into()),
        ..CatalogFilter::default()
    };
    let (telephones, source) = shop.filter_catalog(&filter).await;
    assert_eq!(source, FilterSource::Local);
    assert_eq!(telephones.len(), 1);
    assert_eq!(telephones[0].id, TelephoneId::new(7));
}

#[tokio::test]
async fn test_open_product_falls_back_then_reports_missing() {
    let backend = backend().await;
    let mut shop = shop(&backend);
    shop.refresh_catalog().await.unwrap();

    let telephone = shop.open_product(TelephoneId::new(9)).await.unwrap();
    assert_eq!(telephone.model, "Redmi Note 13");
    assert_eq!(shop.view(), View::Detail);

    backend.state().fail_detail = true;
    let cached = shop.open_product(TelephoneId::new(5)).await.unwrap();
    assert_eq!(cached.model, "iPhone 15");

    backend.state().fail_detail = false;
    let err = shop.open_product(TelephoneId::new(404)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(id) if id == TelephoneId::new(404)));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_notifies_backend_cart() {
    let backend = backend().await;
    let mut shop = shop(&backend);
    shop.refresh_catalog().await.unwrap();

    shop.add_to_cart(TelephoneId::new(5)).await.unwrap();
    shop.add_to_cart(TelephoneId::new(5)).await.unwrap();
    assert_eq!(shop.cart().len(), 2);
    assert_eq!(shop.cart().total_items(), 2);
    assert_eq!(backend.state().cart_adds, vec![(3, 5), (3, 5)]);
}

#[tokio::test]
async fn test_backend_cart_failure_is_ignored() {
    let backend = backend().await;
    backend.state().fail_cart_add = true;
    let mut shop = shop(&backend);

    // Not in the local catalog: fetched from the backend first
    shop.add_to_cart(TelephoneId::new(7)).await.unwrap();
    assert_eq!(shop.cart().len(), 1);
    assert_eq!(backend.state().cart_adds.len(), 1);
}

#[tokio::test]
async fn test_cart_survives_restart_in_file() {
    let backend = backend().await;
    let temp_dir = TempDir::new().unwrap();
    let config = ShopConfig::from_lookup(|_| None)
        .unwrap()
        .with_api_base(backend.api_base().as_str())
        .unwrap()
        .with_cart_path(temp_dir.path().join("phoneShopCart.json"));

    {
        let mut shop = Shop::from_config(&config).unwrap();
        let line = shop.add_to_cart(TelephoneId::new(5)).await.unwrap();
        shop.set_line_quantity(line, 3).unwrap();
    }

    let mut shop = Shop::from_config(&config).unwrap();
    assert_eq!(shop.cart().total_items(), 3);

    shop.clear_cart().unwrap();
    assert!(FileCartStore::new(&config.cart_path).load().unwrap().is_none());
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_flattens_and_resets() {
    let backend = backend().await;
    let mut shop = shop(&backend);
    shop.refresh_catalog().await.unwrap();

    let five = shop.add_to_cart(TelephoneId::new(5)).await.unwrap();
    shop.add_to_cart(TelephoneId::new(7)).await.unwrap();
    shop.set_line_quantity(five, 2).unwrap();
    shop.navigate(telshop_storefront::view::Navigation::Checkout);

    let confirmation = shop.submit_order(&form()).await.unwrap();
    assert_eq!(confirmation.order_id, Some(OrderId::new(1)));
    assert!(confirmation.to_string().contains("Order number: 1"));

    assert!(shop.cart().is_empty());
    assert!(shop.store().raw().is_none());
    assert_eq!(shop.view(), View::List);

    let state = backend.state();
    let request = &state.order_requests[0];
    assert_eq!(
        request.telephone_ids,
        vec![TelephoneId::new(5), TelephoneId::new(5), TelephoneId::new(7)]
    );
    assert_eq!(request.status, OrderStatus::Pending);
    assert_eq!(request.phone_number, "+375291234567");
}

#[tokio::test]
async fn test_blocked_checkouts_never_reach_backend() {
    let backend = backend().await;
    let mut shop = shop(&backend);

    let err = shop.submit_order(&form()).await.unwrap_err();
    assert!(matches!(err, AppError::Checkout(CheckoutError::EmptyCart)));

    shop.refresh_catalog().await.unwrap();
    shop.add_to_cart(TelephoneId::new(9)).await.unwrap();

    let mut bad = form();
    bad.phone_number = "+380291234567".into();
    let err = shop.submit_order(&bad).await.unwrap_err();
    let AppError::Checkout(CheckoutError::Validation(errors)) = err else {
        panic!("expected validation error, got {err}");
    };
    assert_eq!(
        errors.get(FormField::PhoneNumber),
        Some("Phone number must start with +375")
    );

    bad.phone_number = "+3752912".into();
    assert!(shop.submit_order(&bad).await.is_err());

    assert!(backend.state().order_requests.is_empty());
    assert_eq!(shop.cart().len(), 1);
}

#[tokio::test]
async fn test_rejected_order_leaves_cart_for_retry() {
    let backend = backend().await;
    let mut shop = shop(&backend);
    shop.refresh_catalog().await.unwrap();
    shop.buy_now(TelephoneId::new(7)).await.unwrap();
    assert_eq!(shop.view(), View::Cart);

    backend.state().fail_orders = true;
    let err = shop.submit_order(&form()).await.unwrap_err();
    assert!(matches!(err, AppError::Checkout(CheckoutError::Api(_))));
    assert_eq!(shop.cart().len(), 1);
    assert!(shop.store().raw().is_some());

    backend.state().fail_orders = false;
    let confirmation = shop.submit_order(&form()).await.unwrap();
    assert!(confirmation.order_id.is_some());
    assert_eq!(backend.state().order_requests.len(), 2);
}

#[tokio::test]
async fn test_oversized_order_never_reaches_backend() {
    let backend = backend().await;
    let mut shop = shop(&backend);
    shop.refresh_catalog().await.unwrap();
    let line = shop.add_to_cart(TelephoneId::new(5)).await.unwrap();
    shop.set_line_quantity(line, 3_000_000_000).unwrap();

    let err = shop.submit_order(&form()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Checkout(CheckoutError::TooManyItems { .. })
    ));
    assert!(backend.state().order_requests.is_empty());
    assert_eq!(shop.cart().total_items(), 3_000_000_000);
}
