//! Application state owned by the front end.
//!
//! [`Shop`] holds the catalog, the persisted cart and the current view, and
//! exposes every shopper action as a method. Network calls are async and
//! suspend only the calling action; nothing prevents two submissions from
//! running back to back.

use telshop_core::{ClientId, Telephone, TelephoneId};
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, TelshopClient};
use crate::cart::{Cart, CartLineId, CartStore, FileCartStore, PersistedCart};
use crate::catalog::{Catalog, CatalogFilter};
use crate::checkout::{self, CheckoutError, DeliveryForm, OrderConfirmation, OrderSummary};
use crate::config::ShopConfig;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::view::{Navigation, View, ViewRouter};

/// Where a filtered listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    Backend,
    /// The backend failed; the cached catalog was filtered locally.
    Local,
}

/// The storefront session: catalog, cart and view.
pub struct Shop<S> {
    client: TelshopClient,
    client_id: ClientId,
    catalog: Catalog,
    cart: PersistedCart<S>,
    router: ViewRouter,
}

impl Shop<FileCartStore> {
    /// Build a session from configuration, restoring the cart from disk.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: &ShopConfig) -> Result<Self> {
        let client = TelshopClient::new(&config.api_base)?;
        let store = FileCartStore::new(config.cart_path.clone());
        Ok(Self::new(client, config.client_id, store))
    }
}

impl<S: CartStore> Shop<S> {
    /// Create a session. The store is read once here.
    pub fn new(client: TelshopClient, client_id: ClientId, store: S) -> Self {
        Self {
            client,
            client_id,
            catalog: Catalog::new(),
            cart: PersistedCart::load(store),
            router: ViewRouter::new(),
        }
    }

    #[must_use]
    pub const fn client(&self) -> &TelshopClient {
        &self.client
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        self.cart.store()
    }

    #[must_use]
    pub const fn view(&self) -> View {
        self.router.current()
    }

    /// The product last opened in the detail view.
    #[must_use]
    pub const fn selected(&self) -> Option<TelephoneId> {
        self.router.selected()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Reload the catalog from the backend.
    ///
    /// On failure the previous catalog is kept.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be reached or rejects the request.
    #[instrument(skip(self))]
    pub async fn refresh_catalog(&mut self) -> Result<usize> {
        let telephones = self.client.list_telephones().await.inspect_err(|e| {
            warn!(error = %e, "Failed to load catalog");
        })?;
        self.catalog.replace(telephones);
        info!(count = self.catalog.len(), "Catalog refreshed");
        Ok(self.catalog.len())
    }

    /// Filter the catalog, preferring the backend.
    ///
    /// If the backend filter fails, the cached catalog is filtered locally.
    #[instrument(skip(self))]
    pub async fn filter_catalog(&self, filter: &CatalogFilter) -> (Vec<Telephone>, FilterSource) {
        match self.client.filter_telephones(filter).await {
            Ok(telephones) => (telephones, FilterSource::Backend),
            Err(e) => {
                warn!(error = %e, "Backend filter failed, filtering locally");
                (filter.apply(self.catalog.telephones()), FilterSource::Local)
            }
        }
    }

    /// Fetch a product's full record and open its detail view.
    ///
    /// Falls back to the catalog entry when the fetch fails. The view only
    /// changes once a product has been found.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch fails and the catalog has no such product.
    #[instrument(skip(self), fields(telephone_id = %id))]
    pub async fn open_product(&mut self, id: TelephoneId) -> Result<Telephone> {
        let telephone = match self.client.get_telephone(id).await {
            Ok(telephone) => telephone,
            Err(e) => {
                let Some(cached) = self.catalog.find(id) else {
                    return Err(not_found_or(id, e));
                };
                warn!(error = %e, "Product fetch failed, showing catalog entry");
                cached.clone()
            }
        };
        self.router.navigate(Navigation::OpenProduct(id));
        Ok(telephone)
    }

    /// The product to put in the cart: the catalog snapshot if present,
    /// otherwise a fresh fetch.
    async fn resolve(&self, id: TelephoneId) -> Result<Telephone> {
        if let Some(telephone) = self.catalog.find(id) {
            return Ok(telephone.clone());
        }
        self.client
            .get_telephone(id)
            .await
            .map_err(|e| not_found_or(id, e))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Append a product to the cart.
    ///
    /// The backend cart is notified afterwards on a best-effort basis; a
    /// failed notification is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the product cannot be found or the cart mirror cannot
    /// be written.
    #[instrument(skip(self), fields(telephone_id = %id))]
    pub async fn add_to_cart(&mut self, id: TelephoneId) -> Result<CartLineId> {
        let telephone = self.resolve(id).await?;
        let line_id = self.cart.add(telephone)?;

        if let Err(e) = self.client.add_to_cart(self.client_id, id).await {
            debug!(error = %e, "Backend cart update failed");
        }

        let id = id.to_string();
        add_breadcrumb("cart", "Added to cart", Some(&[("telephone_id", id.as_str())]));
        Ok(line_id)
    }

    /// Replace the cart with one unit of a product and show the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the product cannot be found or the cart mirror cannot
    /// be written.
    #[instrument(skip(self), fields(telephone_id = %id))]
    pub async fn buy_now(&mut self, id: TelephoneId) -> Result<CartLineId> {
        let telephone = self.resolve(id).await?;
        let line_id = self.cart.replace_with(telephone)?;
        self.router.set(View::Cart);

        let id = id.to_string();
        add_breadcrumb("cart", "Buy now", Some(&[("telephone_id", id.as_str())]));
        Ok(line_id)
    }

    /// Remove a line. Returns `false` if it was not in the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the cart mirror cannot be written.
    pub fn remove_line(&mut self, line_id: CartLineId) -> Result<bool> {
        Ok(self.cart.remove(line_id)?)
    }

    /// Set a line's quantity; zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns error if the cart mirror cannot be written.
    pub fn set_line_quantity(&mut self, line_id: CartLineId, quantity: i64) -> Result<bool> {
        Ok(self.cart.set_quantity(line_id, quantity)?)
    }

    /// Empty the cart and erase its mirror.
    ///
    /// # Errors
    ///
    /// Returns error if the mirror cannot be erased.
    pub fn clear_cart(&mut self) -> Result<()> {
        Ok(self.cart.clear()?)
    }

    // =========================================================================
    // Navigation and checkout
    // =========================================================================

    pub fn navigate(&mut self, action: Navigation) -> View {
        self.router.navigate(action)
    }

    /// What the order screen shows.
    #[must_use]
    pub fn order_summary(&self) -> OrderSummary<'_> {
        OrderSummary::from_cart(self.cart.cart())
    }

    /// Submit the cart as an order.
    ///
    /// Empty carts, invalid forms and carts with no orderable items are
    /// rejected without a network call. On success the cart and its mirror
    /// are cleared and the view returns to the catalog. On failure the cart is
    /// left as it was.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` describing why no order was created.
    #[instrument(skip(self, form))]
    pub async fn submit_order(&mut self, form: &DeliveryForm) -> Result<OrderConfirmation> {
        let request = checkout::prepare_order(self.cart.cart(), form).inspect_err(|e| {
            debug!(error = %e, "Checkout blocked");
        })?;

        let order = self
            .client
            .create_order(&request)
            .await
            .map_err(CheckoutError::Api)?;

        if let Err(e) = self.cart.clear() {
            warn!(error = %e, "Order placed but the saved cart could not be erased");
        }
        self.router.set(View::List);

        let confirmation = OrderConfirmation { order_id: order.id };
        info!(order_id = ?order.id, items = request.telephone_ids.len(), "Order placed");
        add_breadcrumb("checkout", "Order placed", None);
        Ok(confirmation)
    }
}

fn not_found_or(id: TelephoneId, error: ApiError) -> AppError {
    if error.status() == Some(404) {
        AppError::NotFound(id)
    } else {
        AppError::Api(error)
    }
}
