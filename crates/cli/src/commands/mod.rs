//! Subcommand implementations.
//!
//! Each command builds its own session from configuration, performs one
//! action and renders the result to stdout.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod shell;

use telshop_storefront::Shop;
use telshop_storefront::cart::FileCartStore;
use telshop_storefront::config::ShopConfig;
use thiserror::Error;

/// Errors raised by the command layer itself.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A cart line reference matched nothing.
    #[error("No cart line {0}; see `telshop cart show`")]
    UnknownLine(String),
}

/// Open a storefront session backed by the configured cart file.
pub fn open_shop(config: &ShopConfig) -> telshop_storefront::Result<Shop<FileCartStore>> {
    Shop::from_config(config)
}
