//! Local filtering of back-office listings.

use telshop_core::{Order, OrderStatus, Telephone};

/// Orders with the given status, or all orders when `status` is `None`.
#[must_use]
pub fn filter_orders(orders: &[Order], status: Option<OrderStatus>) -> Vec<&Order> {
    orders
        .iter()
        .filter(|order| status.is_none_or(|s| order.status == s))
        .collect()
}

/// Products whose model, brand or description contains `term`,
/// ignoring case. A blank term matches everything.
#[must_use]
pub fn search_telephones<'a>(telephones: &'a [Telephone], term: &str) -> Vec<&'a Telephone> {
    let term = term.trim().to_lowercase();
    telephones
        .iter()
        .filter(|t| {
            term.is_empty()
                || [Some(&t.model), Some(&t.brand), t.description.as_ref()]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&term))
        })
        .collect()
}
