//! Client-side cart.
//!
//! The cart is an ordered list of line items owned by the session. Every
//! mutation goes through [`PersistedCart`], which writes the full cart to a
//! [`CartStore`] afterwards. The in-memory [`Cart`] itself knows nothing about
//! persistence.
//!
//! # Invariants
//!
//! - Every line has quantity >= 1; setting a quantity <= 0 removes the line.
//! - `total_items()` is the sum of line quantities.
//! - `total_price()` is the sum of price x quantity (missing prices count as 0).

mod persisted;
mod store;

pub use persisted::PersistedCart;
pub use store::{CartStore, CartStoreError, FileCartStore, MemoryCartStore};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use telshop_core::{Telephone, TelephoneId};
use uuid::Uuid;

/// Synthetic line identifier, distinct from the telephone ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLineId(Uuid);

impl CartLineId {
    /// Generate a fresh random line ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for CartLineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CartLineId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

const fn default_quantity() -> u32 {
    1
}

/// One entry in the cart: a telephone snapshot taken at add time.
///
/// Serialized as the telephone's own fields plus `cartId` and `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "cartId")]
    pub line_id: CartLineId,
    #[serde(flatten)]
    pub telephone: Telephone,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLine {
    /// A new line with quantity 1.
    #[must_use]
    pub fn new(telephone: Telephone) -> Self {
        Self {
            line_id: CartLineId::generate(),
            telephone,
            quantity: 1,
        }
    }

    /// The telephone ID this line orders.
    #[must_use]
    pub const fn telephone_id(&self) -> TelephoneId {
        self.telephone.id
    }

    /// Whether the line can be ordered (it carries a real telephone ID).
    #[must_use]
    pub const fn is_orderable(&self) -> bool {
        self.telephone.id.is_valid()
    }

    /// Price x quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.telephone.price.unwrap_or_default() * Decimal::from(self.quantity)
    }
}

/// In-memory cart state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from saved lines.
    ///
    /// Lines with a zero quantity cannot exist in a live cart and are dropped.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines: lines.into_iter().filter(|line| line.quantity > 0).collect(),
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up a line by ID.
    #[must_use]
    pub fn line(&self, line_id: CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.line_id == line_id)
    }

    /// Append a new line with quantity 1. Always succeeds.
    pub fn add(&mut self, telephone: Telephone) -> CartLineId {
        let line = CartLine::new(telephone);
        let line_id = line.line_id;
        self.lines.push(line);
        line_id
    }

    /// Delete a line. Returns `false` if no line had that ID.
    pub fn remove(&mut self, line_id: CartLineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.line_id != line_id);
        self.lines.len() != before
    }

    /// Overwrite a line's quantity; `quantity <= 0` removes the line.
    ///
    /// Returns `false` if no line had that ID.
    pub fn set_quantity(&mut self, line_id: CartLineId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(line_id);
        }
        match self.lines.iter_mut().find(|line| line.line_id == line_id) {
            Some(line) => {
                line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Replace the whole cart with a single line of quantity 1.
    pub fn replace_with(&mut self, telephone: Telephone) -> CartLineId {
        self.lines.clear();
        self.add(telephone)
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price x quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Lines carrying a real telephone ID, in cart order.
    pub fn orderable_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|line| line.is_orderable())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn phone(id: i64, price: i64) -> Telephone {
        Telephone {
            id: TelephoneId::new(id),
            brand: "Apple".into(),
            model: format!("Model {id}"),
            price: Some(Decimal::new(price, 0)),
            ..Telephone::default()
        }
    }

    #[test]
    fn test_each_add_counts_one_item() {
        let mut cart = Cart::new();
        for n in 0..5 {
            cart.add(phone(n % 2 + 1, 100));
        }
        assert_eq!(cart.len(), 5);
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_add_generates_distinct_line_ids() {
        let mut cart = Cart::new();
        let a = cart.add(phone(1, 100));
        let b = cart.add(phone(1, 100));
        assert_ne!(a, b);
        assert_eq!(cart.line(a).unwrap().quantity, 1);
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let mut cart = Cart::new();
        cart.add(phone(1, 100));
        assert!(!cart.remove(CartLineId::generate()));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_set_quantity_zero_removes_exactly_one_line() {
        let mut cart = Cart::new();
        let first = cart.add(phone(1, 100));
        cart.add(phone(2, 50));
        assert!(cart.set_quantity(first, 0));
        assert_eq!(cart.len(), 1);
        assert!(cart.line(first).is_none());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let mut cart = Cart::new();
        let line = cart.add(phone(1, 100));
        assert!(cart.set_quantity(line, -4));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_has_no_upper_bound() {
        let mut cart = Cart::new();
        let line = cart.add(phone(1, 100));
        assert!(cart.set_quantity(line, 1_000));
        assert_eq!(cart.total_items(), 1_000);
        assert!(cart.set_quantity(line, i64::MAX));
        assert_eq!(cart.line(line).unwrap().quantity, u32::MAX);
        assert!(!cart.set_quantity(CartLineId::generate(), 3));
    }

    #[test]
    fn test_totals_stay_consistent() {
        let mut cart = Cart::new();
        let a = cart.add(phone(1, 100));
        let b = cart.add(phone(2, 30));
        let mut unpriced = phone(3, 0);
        unpriced.price = None;
        cart.add(unpriced);

        cart.set_quantity(a, 3);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), Decimal::new(330, 0));

        cart.remove(b);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_price(), Decimal::new(300, 0));
    }

    #[test]
    fn test_replace_with_leaves_single_line() {
        let mut cart = Cart::new();
        cart.add(phone(1, 100));
        let other = cart.add(phone(2, 100));
        cart.set_quantity(other, 4);

        let line = cart.replace_with(phone(9, 10));
        assert_eq!(cart.len(), 1);
        let only = cart.line(line).unwrap();
        assert_eq!(only.quantity, 1);
        assert_eq!(only.telephone_id(), TelephoneId::new(9));
    }

    #[test]
    fn test_clear_empties() {
        let mut cart = Cart::new();
        cart.add(phone(1, 100));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_line_serializes_flat() {
        let line = CartLine::new(phone(4, 250));
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["id"], json!(4));
        assert_eq!(value["brand"], json!("Apple"));
        assert_eq!(value["quantity"], json!(1));
        assert_eq!(value["cartId"], json!(line.line_id.to_string()));

        let back: CartLine = serde_json::from_value(value).unwrap();
        assert_eq!(back, line);
    }

    #[test]
    fn test_line_without_quantity_defaults_to_one() {
        let line: CartLine = serde_json::from_value(json!({
            "cartId": "6f1c1f8e-8a4f-4a7c-9b0e-2d6c8b9e1a11",
            "id": 2,
            "brand": "Samsung",
            "model": "A55"
        }))
        .unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.telephone_id(), TelephoneId::new(2));
    }

    #[test]
    fn test_from_lines_drops_zero_quantity() {
        let mut zero = CartLine::new(phone(1, 10));
        zero.quantity = 0;
        let cart = Cart::from_lines(vec![zero, CartLine::new(phone(2, 10))]);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_orderable_lines_skip_missing_ids() {
        let mut cart = Cart::new();
        cart.add(phone(0, 10));
        cart.add(phone(7, 10));
        let ids: Vec<_> = cart.orderable_lines().map(CartLine::telephone_id).collect();
        assert_eq!(ids, vec![TelephoneId::new(7)]);
    }
}
