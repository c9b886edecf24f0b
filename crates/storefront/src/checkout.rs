//! Order form validation and cart flattening.
//!
//! Everything here runs before any network call: a checkout that fails
//! validation never reaches the backend.

use std::fmt;

use rust_decimal::Decimal;
use telshop_core::{CreateOrderRequest, OrderId, PhoneNumber, PhoneNumberError, TelephoneId};
use thiserror::Error;

use crate::api::ApiError;
use crate::cart::{Cart, CartLine};

/// Shown when the backend does not return an order number.
pub const ORDER_ID_PLACEHOLDER: &str = "not specified";

/// Most units one order may carry. The cart itself has no limit.
pub const MAX_ORDER_UNITS: u64 = 10_000;

// =============================================================================
// Delivery Form
// =============================================================================

/// A field of the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FullName,
    PhoneNumber,
    Address,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FullName => "full name",
            Self::PhoneNumber => "phone number",
            Self::Address => "address",
        })
    }
}

/// One field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// All field errors found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Message for a field, if that field failed.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw delivery details as typed by the shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryForm {
    pub full_name: String,
    pub phone_number: String,
    pub address: String,
}

/// Delivery details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDetails {
    pub full_name: String,
    pub phone_number: PhoneNumber,
    pub address: String,
}

impl DeliveryForm {
    /// Check every field and report all failures together.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` with one message per failing field.
    pub fn validate(&self) -> Result<DeliveryDetails, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.push(FormField::FullName, "Full name is required");
        }

        let phone_number = match PhoneNumber::parse(&self.phone_number) {
            Ok(phone) => Some(phone),
            Err(e) => {
                errors.push(FormField::PhoneNumber, phone_message(&e));
                None
            }
        };

        let address = self.address.trim();
        if address.is_empty() {
            errors.push(FormField::Address, "Delivery address is required");
        }

        match phone_number {
            Some(phone_number) if errors.is_empty() => Ok(DeliveryDetails {
                full_name: full_name.to_string(),
                phone_number,
                address: address.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

fn phone_message(error: &PhoneNumberError) -> String {
    let message = error.to_string();
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

// =============================================================================
// Flattening
// =============================================================================

/// Expand lines into one telephone ID per unit, in cart order.
///
/// Lines without a valid telephone ID are dropped.
///
/// # Errors
///
/// Returns `CheckoutError::TooManyItems` if the orderable lines add up to
/// more than [`MAX_ORDER_UNITS`], before anything is allocated.
pub fn flatten_lines(lines: &[CartLine]) -> Result<Vec<TelephoneId>, CheckoutError> {
    let units: u64 = lines
        .iter()
        .filter(|line| line.is_orderable())
        .map(|line| u64::from(line.quantity))
        .sum();
    let too_many = || CheckoutError::TooManyItems { units };
    if units > MAX_ORDER_UNITS {
        return Err(too_many());
    }

    let mut ids = Vec::new();
    ids.try_reserve_exact(usize::try_from(units).map_err(|_| too_many())?)
        .map_err(|_| too_many())?;
    for line in lines.iter().filter(|line| line.is_orderable()) {
        ids.extend(std::iter::repeat_n(line.telephone_id(), line.quantity as usize));
    }
    Ok(ids)
}

// =============================================================================
// Checkout
// =============================================================================

/// Why a checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// One or more form fields are invalid.
    #[error("Please correct the order form: {0}")]
    Validation(ValidationErrors),

    /// The cart holds only lines without a valid telephone ID.
    #[error("There are no valid items to order")]
    NoValidItems,

    /// More units than a single order can carry.
    #[error("An order can hold at most {max} items, the cart has {units}", max = MAX_ORDER_UNITS)]
    TooManyItems { units: u64 },

    /// The backend rejected the order or could not be reached.
    #[error("Could not create the order, please try again: {0}")]
    Api(#[from] ApiError),
}

impl CheckoutError {
    /// Whether the failure was detected before contacting the backend.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        !matches!(self, Self::Api(_))
    }
}

/// Turn the cart and form into an order request, or explain why not.
///
/// Checks run in order: empty cart, form fields, then orderable items and
/// their count.
///
/// # Errors
///
/// Returns the first failing stage as a `CheckoutError`.
pub fn prepare_order(cart: &Cart, form: &DeliveryForm) -> Result<CreateOrderRequest, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let details = form.validate().map_err(CheckoutError::Validation)?;

    let telephone_ids = flatten_lines(cart.lines())?;
    if telephone_ids.is_empty() {
        return Err(CheckoutError::NoValidItems);
    }

    Ok(CreateOrderRequest::new(
        details.full_name,
        details.phone_number.into_inner(),
        details.address,
        telephone_ids,
    ))
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_id: Option<OrderId>,
}

impl fmt::Display for OrderConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order_id {
            Some(id) => write!(f, "Order created successfully! Order number: {id}"),
            None => write!(
                f,
                "Order created successfully! Order number: {ORDER_ID_PLACEHOLDER}"
            ),
        }
    }
}

/// What the order screen shows above the form.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary<'a> {
    /// Only lines that will actually be ordered.
    pub lines: Vec<&'a CartLine>,
    pub total_items: u64,
    pub total_price: Decimal,
}

impl<'a> OrderSummary<'a> {
    #[must_use]
    pub fn from_cart(cart: &'a Cart) -> Self {
        Self {
            lines: cart.orderable_lines().collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }

    /// Whether submitting is possible at all.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.lines.is_empty()
    }
}
