//! Product form and image uploads.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;
use telshop_core::{Telephone, TelephoneStatus, parse_price};

use crate::error::{AdminError, Result};

/// The product editor as typed by an operator. Every field is raw text
/// except the status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelephoneForm {
    pub model: String,
    pub brand: String,
    pub color: String,
    pub description: String,
    pub price: String,
    pub size: String,
    pub weight: String,
    pub display: String,
    pub camera: String,
    pub storage: String,
    pub connection: String,
    pub processor: String,
    pub status: TelephoneStatus,
}

impl TelephoneForm {
    /// Prefill the editor from an existing product.
    #[must_use]
    pub fn from_telephone(telephone: &Telephone) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            model: telephone.model.clone(),
            brand: telephone.brand.clone(),
            color: text(&telephone.color),
            description: text(&telephone.description),
            price: telephone
                .price
                .map(|p| p.normalize().to_string())
                .unwrap_or_default(),
            size: text(&telephone.size),
            weight: telephone.weight.map(|w| w.to_string()).unwrap_or_default(),
            display: text(&telephone.display),
            camera: text(&telephone.camera),
            storage: text(&telephone.storage),
            connection: text(&telephone.connection),
            processor: text(&telephone.processor),
            status: match telephone.status {
                TelephoneStatus::Unknown => TelephoneStatus::Available,
                status => status,
            },
        }
    }

    /// Check the required fields and build the JSON part of the upload.
    ///
    /// Model and brand must be non-blank and the price a positive number.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` naming the first failing field.
    pub fn validate(&self) -> Result<TelephonePayload> {
        if self.model.trim().is_empty() {
            return Err(AdminError::Validation("Model is required".into()));
        }
        if self.brand.trim().is_empty() {
            return Err(AdminError::Validation("Brand is required".into()));
        }
        let price = parse_price(&self.price)
            .filter(|p| p.is_sign_positive() && !p.is_zero())
            .ok_or_else(|| AdminError::Validation("Price must be a positive number".into()))?;

        Ok(TelephonePayload {
            model: self.model.clone(),
            brand: self.brand.clone(),
            color: self.color.clone(),
            description: self.description.clone(),
            price,
            size: self.size.clone(),
            weight: self.weight.trim().parse().ok(),
            display: self.display.clone(),
            camera: self.camera.clone(),
            storage: self.storage.clone(),
            connection: self.connection.clone(),
            processor: self.processor.clone(),
            status: self.status,
        })
    }
}

/// The `telephone` JSON part of a create or update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelephonePayload {
    pub model: String,
    pub brand: String,
    pub color: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub size: String,
    pub weight: Option<f64>,
    pub display: String,
    pub camera: String,
    pub storage: String,
    pub connection: String,
    pub processor: String,
    pub status: TelephoneStatus,
}

// =============================================================================
// Images
// =============================================================================

/// One image file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image from disk.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Io` if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|source| AdminError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }
}

/// The two image slots of the product editor. Empty slots are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageUploads {
    pub file1: Option<ImageUpload>,
    pub file2: Option<ImageUpload>,
}

impl ImageUploads {
    /// Filled slots with their multipart field names.
    pub fn parts(&self) -> impl Iterator<Item = (&'static str, &ImageUpload)> {
        [("file1", self.file1.as_ref()), ("file2", self.file2.as_ref())]
            .into_iter()
            .filter_map(|(name, image)| image.map(|image| (name, image)))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use telshop_core::TelephoneId;

    fn filled() -> TelephoneForm {
        TelephoneForm {
            model: "Pixel 8".into(),
            brand: "Google".into(),
            price: "699.50".into(),
            weight: "187".into(),
            ..TelephoneForm::default()
        }
    }

    #[test]
    fn test_validate_required_fields_in_order() {
        let mut form = TelephoneForm::default();
        assert_eq!(form.validate().unwrap_err().to_string(), "Model is required");
        form.model = "X".into();
        assert_eq!(form.validate().unwrap_err().to_string(), "Brand is required");
        form.brand = "Y".into();
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Price must be a positive number"
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        for price in ["0", "-5", "abc", ""] {
            let mut form = filled();
            form.price = price.into();
            assert!(matches!(form.validate(), Err(AdminError::Validation(_))), "{price}");
        }
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = filled().validate().unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["price"], json!(699.5));
        assert_eq!(value["weight"], json!(187.0));
        assert_eq!(value["status"], json!("Available"));
        assert_eq!(value["color"], json!(""));
    }

    #[test]
    fn test_blank_weight_is_null() {
        let mut form = filled();
        form.weight = String::new();
        let value = serde_json::to_value(form.validate().unwrap()).unwrap();
        assert!(value["weight"].is_null());
    }

    #[test]
    fn test_from_telephone_prefills() {
        let telephone = Telephone {
            id: TelephoneId::new(3),
            model: "Mate 60".into(),
            brand: "Huawei".into(),
            price: Some(Decimal::new(54900, 2)),
            storage: Some("256GB".into()),
            status: TelephoneStatus::ComingSoon,
            ..Telephone::default()
        };
        let form = TelephoneForm::from_telephone(&telephone);
        assert_eq!(form.price, "549");
        assert_eq!(form.storage, "256GB");
        assert_eq!(form.status, TelephoneStatus::ComingSoon);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_image_parts_skip_empty_slots() {
        let uploads = ImageUploads {
            file1: None,
            file2: Some(ImageUpload::new("back.PNG", vec![1, 2, 3])),
        };
        let parts: Vec<_> = uploads.parts().collect();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].0, "file2");
        assert_eq!(parts[0].1.content_type, "image/png");
        assert_eq!(ImageUploads::default().parts().count(), 0);
    }

    #[tokio::test]
    async fn test_image_from_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("front.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let image = ImageUpload::from_path(&path).await.unwrap();
        assert_eq!(image.file_name, "front.jpg");
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.bytes, b"jpeg");

        let missing = ImageUpload::from_path(&temp_dir.path().join("nope.jpg")).await;
        assert!(matches!(missing, Err(AdminError::Io { .. })));
    }
}
