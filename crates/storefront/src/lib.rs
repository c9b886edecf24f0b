//! Telshop storefront client library.
//!
//! Catalog browsing, filtering, a client-side cart mirrored to local storage,
//! and checkout against the Telshop REST backend. The [`Shop`] controller owns
//! all session state; front ends drive it and render its views.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod state;
pub mod view;

pub use error::{AppError, Result};
pub use state::{FilterSource, Shop};
