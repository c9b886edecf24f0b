//! Back-office commands.

use std::io::Write;
use std::path::PathBuf;

use telshop_admin::{
    AdminClient, ImageUpload, ImageUploads, TelephoneForm, filter_orders, search_telephones,
};
use telshop_core::{OrderId, OrderStatus, TelephoneId};
use telshop_storefront::config::ShopConfig;

use crate::render;

fn client(config: &ShopConfig) -> telshop_admin::Result<AdminClient> {
    AdminClient::new(&config.api_base)
}

pub async fn list_telephones(
    config: &ShopConfig,
    search: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let telephones = client(config)?.list_telephones().await?;
    let matching: Vec<_> = search_telephones(&telephones, search.unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();

    let mut out = std::io::stdout().lock();
    render::catalog(&mut out, &matching)?;
    Ok(())
}

/// Create a telephone, or update it when `id` is given.
///
/// The form is validated before any file is read or request sent.
pub async fn save_telephone(
    config: &ShopConfig,
    id: Option<TelephoneId>,
    form: &TelephoneForm,
    images: &[Option<PathBuf>; 2],
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = form.validate()?;
    let [file1, file2] = images;
    let uploads = ImageUploads {
        file1: read_image(file1.as_ref()).await?,
        file2: read_image(file2.as_ref()).await?,
    };

    let client = client(config)?;
    let telephone = match id {
        Some(id) => client.update_telephone(id, &payload, &uploads).await?,
        None => client.create_telephone(&payload, &uploads).await?,
    };

    let mut out = std::io::stdout().lock();
    let verb = if id.is_some() { "Updated" } else { "Created" };
    writeln!(out, "{verb} telephone #{}", telephone.id)?;
    render::telephone_detail(&mut out, &telephone, config)?;
    Ok(())
}

async fn read_image(path: Option<&PathBuf>) -> telshop_admin::Result<Option<ImageUpload>> {
    match path {
        Some(path) => ImageUpload::from_path(path).await.map(Some),
        None => Ok(None),
    }
}

pub async fn delete_telephone(
    config: &ShopConfig,
    id: TelephoneId,
) -> Result<(), Box<dyn std::error::Error>> {
    client(config)?.delete_telephone(id).await?;
    writeln!(std::io::stdout().lock(), "Telephone #{id} deleted.")?;
    Ok(())
}

pub async fn list_orders(
    config: &ShopConfig,
    status: Option<OrderStatus>,
) -> Result<(), Box<dyn std::error::Error>> {
    let orders = client(config)?.list_orders().await?;
    let mut out = std::io::stdout().lock();
    render::orders(&mut out, &filter_orders(&orders, status))?;
    Ok(())
}

pub async fn set_order_status(
    config: &ShopConfig,
    id: OrderId,
    status: OrderStatus,
) -> Result<(), Box<dyn std::error::Error>> {
    client(config)?.update_order_status(id, status).await?;
    writeln!(std::io::stdout().lock(), "Order #{id} is now {status}.")?;
    Ok(())
}

pub async fn delete_order(config: &ShopConfig, id: OrderId) -> Result<(), Box<dyn std::error::Error>> {
    client(config)?.delete_order(id).await?;
    writeln!(std::io::stdout().lock(), "Order #{id} deleted.")?;
    Ok(())
}
