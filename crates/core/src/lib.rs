//! Telshop Core - Shared types library.
//!
//! This crate provides common types used across all Telshop components:
//! - `storefront` - Catalog, cart and checkout client for shoppers
//! - `admin` - Product and order management client
//! - `cli` - Terminal front end for both
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, statuses, prices, phone numbers and the
//!   telephone/order records exchanged with the backend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
