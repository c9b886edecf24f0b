//! Cart commands. The cart lives in the configured cart file between runs.

use std::io::Write;

use telshop_core::TelephoneId;
use telshop_storefront::cart::{Cart, CartLineId};
use telshop_storefront::config::ShopConfig;

use super::{CommandError, open_shop};
use crate::render;

/// Resolve a line reference: a 1-based position as printed by `cart show`,
/// or a full cart ID.
pub fn resolve_line(cart: &Cart, reference: &str) -> Result<CartLineId, CommandError> {
    let reference = reference.trim();
    let line = match reference.parse::<usize>() {
        Ok(position) => position
            .checked_sub(1)
            .and_then(|index| cart.lines().get(index)),
        Err(_) => reference
            .parse::<CartLineId>()
            .ok()
            .and_then(|id| cart.line(id)),
    };
    line.map(|line| line.line_id)
        .ok_or_else(|| CommandError::UnknownLine(reference.to_string()))
}

pub fn show(config: &ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    let shop = open_shop(config)?;
    let mut out = std::io::stdout().lock();
    render::cart(&mut out, shop.cart())?;
    Ok(())
}

pub async fn add(config: &ShopConfig, id: TelephoneId) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    shop.add_to_cart(id).await?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "Added to cart.")?;
    render::cart(&mut out, shop.cart())?;
    Ok(())
}

pub fn remove(config: &ShopConfig, reference: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    let line_id = resolve_line(shop.cart(), reference)?;
    shop.remove_line(line_id)?;

    let mut out = std::io::stdout().lock();
    render::cart(&mut out, shop.cart())?;
    Ok(())
}

pub fn set_quantity(
    config: &ShopConfig,
    reference: &str,
    quantity: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    let line_id = resolve_line(shop.cart(), reference)?;
    shop.set_line_quantity(line_id, quantity)?;

    let mut out = std::io::stdout().lock();
    render::cart(&mut out, shop.cart())?;
    Ok(())
}

pub fn clear(config: &ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    shop.clear_cart()?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "Cart cleared.")?;
    Ok(())
}

pub async fn buy_now(config: &ShopConfig, id: TelephoneId) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    shop.buy_now(id).await?;

    let mut out = std::io::stdout().lock();
    render::cart(&mut out, shop.cart())?;
    Ok(())
}
