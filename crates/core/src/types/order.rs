//! Order records exchanged with the backend.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{OrderId, TelephoneId};
use super::status::OrderStatus;
use super::telephone::Telephone;

/// Body of `POST /orders/create`.
///
/// `telephone_ids` holds one entry per unit purchased, so a line with
/// quantity 3 contributes three copies of its telephone ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub phone_number: String,
    pub address: String,
    pub full_name: String,
    pub status: OrderStatus,
    pub telephone_ids: Vec<TelephoneId>,
}

impl CreateOrderRequest {
    /// Build a request for a new order. New orders always start as `Pending`.
    #[must_use]
    pub const fn new(
        full_name: String,
        phone_number: String,
        address: String,
        telephone_ids: Vec<TelephoneId>,
    ) -> Self {
        Self {
            phone_number,
            address,
            full_name,
            status: OrderStatus::Pending,
            telephone_ids,
        }
    }
}

/// An order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Order {
    pub id: Option<OrderId>,
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
    pub status: OrderStatus,
    #[serde(deserialize_with = "lenient_datetime")]
    pub order_date: Option<NaiveDateTime>,
    pub telephones: Vec<Telephone>,
}

impl Order {
    /// Sum of the prices of the ordered telephones; missing prices count as zero.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.telephones
            .iter()
            .map(|telephone| telephone.price.unwrap_or_default())
            .sum()
    }
}

/// The backend writes `LocalDateTime` without a zone; anything unparseable is
/// treated as absent rather than failing the order.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_str).and_then(|s| {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
            .ok()
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_order_request_wire_format() {
        let request = CreateOrderRequest::new(
            "Ivan Ivanov".into(),
            "+375291234567".into(),
            "Minsk, Nezavisimosti 1".into(),
            vec![TelephoneId::new(5), TelephoneId::new(5), TelephoneId::new(7)],
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "phoneNumber": "+375291234567",
                "address": "Minsk, Nezavisimosti 1",
                "fullName": "Ivan Ivanov",
                "status": "Pending",
                "telephoneIds": [5, 5, 7]
            })
        );
    }

    #[test]
    fn test_order_total_and_date() {
        let order: Order = serde_json::from_value(json!({
            "id": 12,
            "fullName": "Ivan",
            "status": "Shipped",
            "orderDate": "2025-03-01T10:15:30.123",
            "telephones": [{"id": 1, "price": 100.5}, {"id": 2}, {"id": 3, "price": 20}]
        }))
        .unwrap();
        assert_eq!(order.id, Some(OrderId::new(12)));
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total(), Decimal::new(1205, 1));
        assert!(order.order_date.is_some());
    }

    #[test]
    fn test_order_tolerates_odd_dates() {
        let order: Order = serde_json::from_value(json!({"orderDate": "yesterday"})).unwrap();
        assert_eq!(order.order_date, None);
        let order: Order = serde_json::from_value(json!({"orderDate": [2025, 3, 1]})).unwrap();
        assert_eq!(order.order_date, None);
    }
}
