//! Status enums for telephones and orders.
//!
//! Both serialize with the backend's `PascalCase` spelling. Unknown values from
//! the backend deserialize to an `Unknown` variant instead of failing the whole
//! catalog or order list.

use serde::{Deserialize, Serialize};

/// Telephone availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TelephoneStatus {
    #[default]
    Available,
    #[serde(alias = "Out of stock")]
    OutOfStock,
    ComingSoon,
    #[serde(other)]
    Unknown,
}

impl TelephoneStatus {
    /// Wire value sent to the backend (`Available`, `OutOfStock`, ...).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::OutOfStock => "OutOfStock",
            Self::ComingSoon => "ComingSoon",
            Self::Unknown => "Unknown",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Available => "In stock",
            Self::OutOfStock => "Out of stock",
            Self::ComingSoon => "Coming soon",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for TelephoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TelephoneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '_', '-'], "").as_str() {
            "available" => Ok(Self::Available),
            "outofstock" => Ok(Self::OutOfStock),
            "comingsoon" => Ok(Self::ComingSoon),
            _ => Err(format!("invalid telephone status: {s}")),
        }
    }
}

/// Order processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Every new order starts here.
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Statuses an administrator can assign.
    pub const ASSIGNABLE: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire value sent to the backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ASSIGNABLE
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_telephone_status_wire_names() {
        let status: TelephoneStatus = serde_json::from_str("\"OutOfStock\"").unwrap();
        assert_eq!(status, TelephoneStatus::OutOfStock);
        let status: TelephoneStatus = serde_json::from_str("\"Out of stock\"").unwrap();
        assert_eq!(status, TelephoneStatus::OutOfStock);
        let status: TelephoneStatus = serde_json::from_str("\"Discontinued\"").unwrap();
        assert_eq!(status, TelephoneStatus::Unknown);
        assert_eq!(
            serde_json::to_string(&TelephoneStatus::ComingSoon).unwrap(),
            "\"ComingSoon\""
        );
    }

    #[test]
    fn test_telephone_status_from_str() {
        assert_eq!(
            "out of stock".parse::<TelephoneStatus>().unwrap(),
            TelephoneStatus::OutOfStock
        );
        assert_eq!(
            "coming-soon".parse::<TelephoneStatus>().unwrap(),
            TelephoneStatus::ComingSoon
        );
        assert!("sold".parse::<TelephoneStatus>().is_err());
    }

    #[test]
    fn test_order_status_roundtrip_through_str() {
        for status in OrderStatus::ASSIGNABLE {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("Unknown".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_defaults_to_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"Pending\"");
    }
}
