//! Cart mutations mirrored to a [`CartStore`].

use telshop_core::Telephone;
use tracing::{debug, warn};

use super::{Cart, CartLineId, CartStore, CartStoreError};

/// A [`Cart`] that writes itself to a store after every mutation.
///
/// Each mutation is applied in memory first; a failed write is returned to the
/// caller but the in-memory change stands.
#[derive(Debug)]
pub struct PersistedCart<S> {
    cart: Cart,
    store: S,
}

impl<S: CartStore> PersistedCart<S> {
    /// Read the saved cart once.
    ///
    /// Malformed or unreadable content is logged and treated as "no saved
    /// cart"; it never prevents startup.
    pub fn load(store: S) -> Self {
        let cart = match store.load() {
            Ok(Some(lines)) => {
                debug!(lines = lines.len(), "Restored saved cart");
                Cart::from_lines(lines)
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Ignoring saved cart");
                Cart::new()
            }
        };
        Self { cart, store }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Append a line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns error if the mirror cannot be written.
    pub fn add(&mut self, telephone: Telephone) -> Result<CartLineId, CartStoreError> {
        let line_id = self.cart.add(telephone);
        self.persist()?;
        Ok(line_id)
    }

    /// Delete a line; missing lines are a no-op.
    ///
    /// # Errors
    ///
    /// Returns error if the mirror cannot be written.
    pub fn remove(&mut self, line_id: CartLineId) -> Result<bool, CartStoreError> {
        let removed = self.cart.remove(line_id);
        self.persist()?;
        Ok(removed)
    }

    /// Overwrite a line's quantity; `quantity <= 0` removes the line.
    ///
    /// # Errors
    ///
    /// Returns error if the mirror cannot be written.
    pub fn set_quantity(
        &mut self,
        line_id: CartLineId,
        quantity: i64,
    ) -> Result<bool, CartStoreError> {
        let changed = self.cart.set_quantity(line_id, quantity);
        self.persist()?;
        Ok(changed)
    }

    /// Replace the cart with a single line of quantity 1.
    ///
    /// # Errors
    ///
    /// Returns error if the mirror cannot be written.
    pub fn replace_with(&mut self, telephone: Telephone) -> Result<CartLineId, CartStoreError> {
        let line_id = self.cart.replace_with(telephone);
        self.persist()?;
        Ok(line_id)
    }

    /// Empty the cart and erase the saved entry (rather than saving `[]`).
    ///
    /// # Errors
    ///
    /// Returns error if the saved entry cannot be removed.
    pub fn clear(&mut self) -> Result<(), CartStoreError> {
        self.cart.clear();
        self.store.erase()
    }

    fn persist(&self) -> Result<(), CartStoreError> {
        self.store.save(self.cart.lines())
    }
}
