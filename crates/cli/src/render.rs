//! Text rendering of storefront and back-office views.
//!
//! Every function writes to an `io::Write` so views can be rendered to
//! stdout or captured in tests.

use std::io::{self, Write};

use telshop_core::{Order, Telephone, format_price};
use telshop_storefront::cart::Cart;
use telshop_storefront::checkout::{OrderSummary, ValidationErrors};
use telshop_storefront::config::ShopConfig;

/// One line per product.
pub fn catalog(out: &mut impl Write, telephones: &[Telephone]) -> io::Result<()> {
    if telephones.is_empty() {
        return writeln!(out, "No telephones found.");
    }
    for telephone in telephones {
        writeln!(
            out,
            "{:>5}  {:<32} {:>12}  {}",
            telephone.id.as_i64(),
            telephone.display_name(),
            format_price(telephone.price),
            telephone.status.label(),
        )?;
    }
    Ok(())
}

/// Full product card.
pub fn telephone_detail(
    out: &mut impl Write,
    telephone: &Telephone,
    config: &ShopConfig,
) -> io::Result<()> {
    writeln!(out, "{} (#{})", telephone.display_name(), telephone.id)?;
    writeln!(out, "  Price:       {}", format_price(telephone.price))?;
    writeln!(out, "  Status:      {}", telephone.status.label())?;

    let fields = [
        ("Color", telephone.color.as_deref()),
        ("Storage", telephone.storage.as_deref()),
        ("Processor", telephone.processor.as_deref()),
        ("Display", telephone.display.as_deref()),
        ("Camera", telephone.camera.as_deref()),
        ("Size", telephone.size.as_deref()),
        ("Connection", telephone.connection.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            writeln!(out, "  {:<12} {value}", format!("{label}:"))?;
        }
    }
    if let Some(weight) = telephone.weight {
        writeln!(out, "  Weight:      {weight} g")?;
    }
    if let Some(image) = telephone.preview_image() {
        writeln!(out, "  Image:       {}", config.image_url(&image.url))?;
    }
    if let Some(description) = telephone.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(out)?;
        writeln!(out, "{description}")?;
    }
    Ok(())
}

/// Cart lines numbered from 1, followed by totals.
pub fn cart(out: &mut impl Write, cart: &Cart) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }
    for (position, line) in cart.lines().iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {:<32} {:>10} x {:<4} {:>12}",
            position + 1,
            line.telephone.display_name(),
            format_price(line.telephone.price),
            line.quantity,
            format_price(Some(line.line_total())),
        )?;
    }
    writeln!(
        out,
        "Items: {}   Total: {}",
        cart.total_items(),
        format_price(Some(cart.total_price()))
    )
}

/// The order screen header: what will be ordered.
pub fn order_summary(out: &mut impl Write, summary: &OrderSummary<'_>) -> io::Result<()> {
    writeln!(out, "Order summary")?;
    for line in &summary.lines {
        writeln!(
            out,
            "  {} x {}",
            line.telephone.display_name(),
            line.quantity
        )?;
    }
    writeln!(
        out,
        "  Items: {}   Total: {}",
        summary.total_items,
        format_price(Some(summary.total_price))
    )
}

/// Field-level form errors.
pub fn validation_errors(out: &mut impl Write, errors: &ValidationErrors) -> io::Result<()> {
    for error in errors.iter() {
        writeln!(out, "  {}: {}", error.field, error.message)?;
    }
    Ok(())
}

/// Back-office order table.
pub fn orders(out: &mut impl Write, orders: &[&Order]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders found.");
    }
    for order in orders {
        let id = order
            .id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let date = order
            .order_date
            .map_or_else(String::new, |d| d.format("%Y-%m-%d %H:%M").to_string());
        writeln!(
            out,
            "#{id:<5} {date:<16} {:<11} {} ({}), {}",
            order.status.as_str(),
            order.full_name,
            order.phone_number,
            order.address
        )?;
        for telephone in &order.telephones {
            writeln!(
                out,
                "        {} {}",
                telephone.display_name(),
                format_price(telephone.price)
            )?;
        }
        writeln!(out, "        Total: {}", format_price(Some(order.total())))?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use telshop_core::{OrderId, OrderStatus, TelephoneId, TelephoneImage};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn phone() -> Telephone {
        Telephone {
            id: TelephoneId::new(7),
            brand: "Apple".into(),
            model: "iPhone 15".into(),
            price: Some(Decimal::new(79999, 2)),
            images: vec![
                TelephoneImage {
                    url: "/images/1".into(),
                    ..TelephoneImage::default()
                },
                TelephoneImage {
                    url: "/images/2".into(),
                    preview_image: true,
                    ..TelephoneImage::default()
                },
            ],
            ..Telephone::default()
        }
    }

    #[test]
    fn test_catalog_lists_price_and_status() {
        let mut unpriced = phone();
        unpriced.price = None;
        let text = render(|out| catalog(out, &[phone(), unpriced]));
        assert!(text.contains("Apple iPhone 15"));
        assert!(text.contains("$799.99"));
        assert!(text.contains("price not set"));
        assert!(text.contains("In stock"));
        assert_eq!(render(|out| catalog(out, &[])), "No telephones found.\n");
    }

    #[test]
    fn test_detail_uses_preview_image_on_backend_host() {
        let config = ShopConfig::from_lookup(|_| None).unwrap();
        let text = render(|out| telephone_detail(out, &phone(), &config));
        assert!(text.contains("http://localhost:8080/images/2"));
    }

    #[test]
    fn test_cart_totals() {
        let mut c = Cart::new();
        let line = c.add(phone());
        c.set_quantity(line, 2);
        let text = render(|out| cart(out, &c));
        assert!(text.contains("  1. Apple iPhone 15"));
        assert!(text.contains("Items: 2   Total: $1599.98"));
        assert_eq!(render(|out| cart(out, &Cart::new())), "Your cart is empty.\n");
    }

    #[test]
    fn test_orders_table() {
        let order = Order {
            id: Some(OrderId::new(12)),
            full_name: "Ivan".into(),
            status: OrderStatus::Shipped,
            telephones: vec![phone(), phone()],
            ..Order::default()
        };
        let text = render(|out| orders(out, &[&order]));
        assert!(text.starts_with("#12"));
        assert!(text.contains("Shipped"));
        assert!(text.contains("Total: $1599.98"));
    }
}
