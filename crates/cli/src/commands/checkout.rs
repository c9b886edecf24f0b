//! Order submission.

use std::io::Write;

use telshop_core::PhoneNumber;
use telshop_storefront::AppError;
use telshop_storefront::checkout::{CheckoutError, DeliveryForm, OrderConfirmation};
use telshop_storefront::config::ShopConfig;
use telshop_storefront::{Shop, cart::CartStore};

use super::open_shop;
use crate::render;

/// Build the delivery form from typed input. The phone number gets the same
/// clean-up as the order form's input mask.
pub fn delivery_form(full_name: &str, phone: &str, address: &str) -> DeliveryForm {
    DeliveryForm {
        full_name: full_name.to_string(),
        phone_number: PhoneNumber::normalize_input(phone),
        address: address.to_string(),
    }
}

/// Submit the saved cart.
pub async fn submit(config: &ShopConfig, form: &DeliveryForm) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    let mut out = std::io::stdout().lock();
    render::order_summary(&mut out, &shop.order_summary())?;
    place_order(&mut shop, form, &mut out).await?;
    Ok(())
}

/// Submit and report the outcome; shared with the interactive shell.
pub async fn place_order<S: CartStore>(
    shop: &mut Shop<S>,
    form: &DeliveryForm,
    out: &mut impl Write,
) -> Result<OrderConfirmation, Box<dyn std::error::Error>> {
    match shop.submit_order(form).await {
        Ok(confirmation) => {
            writeln!(out, "{confirmation}")?;
            Ok(confirmation)
        }
        Err(AppError::Checkout(CheckoutError::Validation(errors))) => {
            writeln!(out, "Please correct the order form:")?;
            render::validation_errors(out, &errors)?;
            Err(AppError::Checkout(CheckoutError::Validation(errors)).into())
        }
        Err(e) => {
            e.capture();
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_form_normalizes_phone() {
        let form = delivery_form("Ivan", "+375 (29) 123-45-67 ext", "Minsk");
        assert_eq!(form.phone_number, "+375291234567");
        assert!(form.validate().is_ok());
    }
}
