//! Catalog browsing commands.

use std::io::Write;

use telshop_core::{Telephone, TelephoneId};
use telshop_storefront::{AppError, FilterSource};
use telshop_storefront::catalog::CatalogFilter;
use telshop_storefront::config::ShopConfig;

use super::open_shop;
use crate::render;

/// List every telephone.
pub async fn list(config: &ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    shop.refresh_catalog().await?;

    let mut out = std::io::stdout().lock();
    render::catalog(&mut out, shop.catalog().telephones())?;
    Ok(())
}

/// Show one telephone in full.
pub async fn show(config: &ShopConfig, id: TelephoneId) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    let telephone = shop.open_product(id).await?;

    let mut out = std::io::stdout().lock();
    render::telephone_detail(&mut out, &telephone, config)?;
    Ok(())
}

/// Filter telephones, falling back to local filtering of the full catalog.
pub async fn filter(
    config: &ShopConfig,
    filter: &CatalogFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    // Local fallback filters whatever this loads
    let refreshed = shop.refresh_catalog().await;

    let (telephones, source) = shop.filter_catalog(filter).await;

    let mut out = std::io::stdout().lock();
    write_filtered(&mut out, refreshed.err().as_ref(), &telephones, source)?;
    Ok(())
}

fn write_filtered(
    out: &mut impl Write,
    refresh_error: Option<&AppError>,
    telephones: &[Telephone],
    source: FilterSource,
) -> std::io::Result<()> {
    if let Some(e) = refresh_error {
        writeln!(out, "Could not load the catalog: {e}")?;
    }
    if source == FilterSource::Local {
        writeln!(out, "(filtered locally)")?;
    }
    render::catalog(out, telephones)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use telshop_storefront::api::ApiError;

    fn written(refresh_error: Option<&AppError>, source: FilterSource) -> String {
        let mut buf = Vec::new();
        write_filtered(&mut buf, refresh_error, &[], source).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_failed_refresh_is_reported() {
        let error = AppError::Api(ApiError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        });
        let text = written(Some(&error), FilterSource::Local);
        assert!(text.starts_with("Could not load the catalog: "));
        assert!(text.contains("(filtered locally)"));
    }

    #[test]
    fn test_backend_results_have_no_notice() {
        let text = written(None, FilterSource::Backend);
        assert!(!text.contains("Could not load"));
        assert!(!text.contains("filtered locally"));
    }
}
