//! Telshop back-office library.
//!
//! Product management (create, edit with image uploads, delete) and order
//! management (list, filter by status, change status, delete) against the
//! Telshop REST backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod error;
pub mod forms;
pub mod listing;

pub use client::AdminClient;
pub use error::{AdminError, Result};
pub use forms::{ImageUpload, ImageUploads, TelephoneForm, TelephonePayload};
pub use listing::{filter_orders, search_telephones};
