//! Telephone catalog records as served by the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{ImageId, TelephoneId};
use super::status::TelephoneStatus;

/// A telephone in the catalog.
///
/// Read-only on the client: every field is a projection of backend state.
/// Missing or `null` fields deserialize to their defaults so partially filled
/// records from the admin screen still load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Telephone {
    /// Backend-assigned ID. Zero when absent.
    #[serde(deserialize_with = "null_as_default")]
    pub id: TelephoneId,
    #[serde(deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(deserialize_with = "null_as_default")]
    pub brand: String,
    pub color: Option<String>,
    pub description: Option<String>,
    /// Price in the store currency.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// Screen size in inches, as entered by the administrator.
    #[serde(deserialize_with = "string_or_number")]
    pub size: Option<String>,
    /// Weight in grams.
    pub weight: Option<f64>,
    pub display: Option<String>,
    pub camera: Option<String>,
    pub storage: Option<String>,
    pub connection: Option<String>,
    pub processor: Option<String>,
    /// `Unknown` when the backend leaves it out.
    #[serde(default = "unknown_status", deserialize_with = "status_or_unknown")]
    pub status: TelephoneStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub images: Vec<TelephoneImage>,
}

/// An image attached to a telephone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TelephoneImage {
    pub id: Option<ImageId>,
    /// Path relative to the backend host (e.g., `/images/12`).
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// Marks the image shown on catalog cards.
    #[serde(deserialize_with = "null_as_default")]
    pub preview_image: bool,
}

impl Telephone {
    /// "Brand Model", as shown in listings.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.brand.trim(), self.model.trim()) {
            ("", model) => model.to_string(),
            (brand, "") => brand.to_string(),
            (brand, model) => format!("{brand} {model}"),
        }
    }

    /// The flagged preview image, falling back to the first image.
    #[must_use]
    pub fn preview_image(&self) -> Option<&TelephoneImage> {
        self.images
            .iter()
            .find(|image| image.preview_image)
            .or_else(|| self.images.first())
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

const fn unknown_status() -> TelephoneStatus {
    TelephoneStatus::Unknown
}

fn status_or_unknown<'de, D>(deserializer: D) -> Result<TelephoneStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or(TelephoneStatus::Unknown))
}

/// Accept `"6.1"`, `6.1` or `null` for free-form numeric text fields.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
