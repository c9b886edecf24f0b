//! Core types for Telshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order;
pub mod phone;
pub mod price;
pub mod status;
pub mod telephone;

pub use id::*;
pub use order::{CreateOrderRequest, Order};
pub use phone::{PHONE_LENGTH, PHONE_PREFIX, PhoneNumber, PhoneNumberError};
pub use price::{format_price, parse_price};
pub use status::*;
pub use telephone::{Telephone, TelephoneImage};
