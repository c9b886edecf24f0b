//! Catalog store and filtering.
//!
//! The catalog is the last fetched list of telephones. Filtering is done by
//! the backend when it can; [`CatalogFilter::apply`] is the local fallback.

use rust_decimal::Decimal;
use telshop_core::{Telephone, TelephoneId, TelephoneStatus};

/// The fetched list of products, refreshed on demand.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    telephones: Vec<Telephone>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            telephones: Vec::new(),
        }
    }

    /// Replace the catalog contents with a fresh backend listing.
    pub fn replace(&mut self, telephones: Vec<Telephone>) {
        self.telephones = telephones;
    }

    /// All telephones, in backend order.
    #[must_use]
    pub fn telephones(&self) -> &[Telephone] {
        &self.telephones
    }

    /// Find a telephone by ID.
    #[must_use]
    pub fn find(&self, id: TelephoneId) -> Option<&Telephone> {
        self.telephones.iter().find(|telephone| telephone.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.telephones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.telephones.is_empty()
    }
}

/// Catalog search criteria.
///
/// Text fields match case-insensitively on substrings. Empty fields are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub model: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub status: Option<TelephoneStatus>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    pub storage: Option<String>,
    pub processor: Option<String>,
    /// Free text matched against brand, model and description.
    pub search_term: Option<String>,
}

impl CatalogFilter {
    /// Whether no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }

    /// Query parameters for `GET /telephones/filter`, skipping empty fields.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let text_fields = [
            ("model", &self.model),
            ("brand", &self.brand),
            ("color", &self.color),
        ];
        let mut query: Vec<(&'static str, String)> = text_fields
            .into_iter()
            .filter_map(|(key, value)| non_empty(value.as_deref()).map(|v| (key, v.to_string())))
            .collect();

        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(max_price) = self.max_price {
            query.push(("price", max_price.normalize().to_string()));
        }
        for (key, value) in [
            ("storage", &self.storage),
            ("processor", &self.processor),
            ("searchTerm", &self.search_term),
        ] {
            if let Some(v) = non_empty(value.as_deref()) {
                query.push((key, v.to_string()));
            }
        }
        query
    }

    /// Whether a telephone satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, telephone: &Telephone) -> bool {
        contains(Some(&telephone.brand), self.brand.as_deref())
            && contains(Some(&telephone.model), self.model.as_deref())
            && contains(telephone.color.as_ref(), self.color.as_deref())
            && contains(telephone.storage.as_ref(), self.storage.as_deref())
            && contains(telephone.processor.as_ref(), self.processor.as_deref())
            && self.status.is_none_or(|status| telephone.status == status)
            && self
                .max_price
                .is_none_or(|max| telephone.price.is_some_and(|price| price <= max))
            && self.matches_search_term(telephone)
    }

    fn matches_search_term(&self, telephone: &Telephone) -> bool {
        let Some(term) = non_empty(self.search_term.as_deref()) else {
            return true;
        };
        [
            Some(&telephone.brand),
            Some(&telephone.model),
            telephone.description.as_ref(),
        ]
        .into_iter()
        .any(|field| contains(field, Some(term)))
    }

    /// Filter a list locally.
    #[must_use]
    pub fn apply(&self, telephones: &[Telephone]) -> Vec<Telephone> {
        telephones
            .iter()
            .filter(|telephone| self.matches(telephone))
            .cloned()
            .collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Case-insensitive substring test; an unset needle always matches.
fn contains(haystack: Option<&String>, needle: Option<&str>) -> bool {
    let Some(needle) = non_empty(needle) else {
        return true;
    };
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(id: i64, brand: &str, model: &str, price: i64) -> Telephone {
        Telephone {
            id: TelephoneId::new(id),
            brand: brand.to_string(),
            model: model.to_string(),
            price: Some(Decimal::new(price, 0)),
            ..Telephone::default()
        }
    }

    fn sample() -> Vec<Telephone> {
        let mut iphone = phone(1, "Apple", "iPhone 15", 999);
        iphone.color = Some("Blue".into());
        iphone.storage = Some("128GB".into());
        let mut galaxy = phone(2, "Samsung", "Galaxy S24", 899);
        galaxy.description = Some("Flagship with a great camera".into());
        galaxy.status = TelephoneStatus::OutOfStock;
        let redmi = phone(3, "Xiaomi", "Redmi Note 13", 249);
        vec![iphone, galaxy, redmi]
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CatalogFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&sample()).len(), 3);
    }

    #[test]
    fn test_query_skips_empty_fields() {
        let filter = CatalogFilter {
            brand: Some("Apple".into()),
            model: Some("  ".into()),
            max_price: Some(Decimal::new(50000, 2)),
            status: Some(TelephoneStatus::Available),
            search_term: Some("pro".into()),
            ..CatalogFilter::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("brand", "Apple".to_string()),
                ("status", "Available".to_string()),
                ("price", "500".to_string()),
                ("searchTerm", "pro".to_string()),
            ]
        );
    }

    #[test]
    fn test_brand_is_case_insensitive_substring() {
        let filter = CatalogFilter {
            brand: Some("sams".into()),
            ..CatalogFilter::default()
        };
        let result = filter.apply(&sample());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, TelephoneId::new(2));
    }

    #[test]
    fn test_search_term_covers_description() {
        let filter = CatalogFilter {
            search_term: Some("CAMERA".into()),
            ..CatalogFilter::default()
        };
        let ids: Vec<_> = filter.apply(&sample()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TelephoneId::new(2)]);
    }

    #[test]
    fn test_status_and_max_price() {
        let filter = CatalogFilter {
            status: Some(TelephoneStatus::Available),
            max_price: Some(Decimal::new(999, 0)),
            ..CatalogFilter::default()
        };
        let ids: Vec<_> = filter.apply(&sample()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TelephoneId::new(1), TelephoneId::new(3)]);

        let unpriced = Telephone::default();
        assert!(!filter.matches(&unpriced));
    }

    #[test]
    fn test_missing_optional_field_does_not_match_set_criterion() {
        let filter = CatalogFilter {
            color: Some("blue".into()),
            ..CatalogFilter::default()
        };
        let ids: Vec<_> = filter.apply(&sample()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TelephoneId::new(1)]);
    }

    #[test]
    fn test_catalog_find() {
        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());
        catalog.replace(sample());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.find(TelephoneId::new(3)).map(|t| t.model.as_str()), Some("Redmi Note 13"));
        assert!(catalog.find(TelephoneId::new(9)).is_none());
    }
}
