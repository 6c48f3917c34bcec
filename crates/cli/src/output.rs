//! Terminal rendering of cart views.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use kopernik_cart::view::{EMPTY_CART_MESSAGE, EMPTY_MINI_CART_MESSAGE};
use kopernik_cart::{CartView, CustomerFields, MiniCartView};

pub fn line(text: &str) {
    println!("{text}");
}

pub fn error(err: &dyn std::fmt::Display) {
    eprintln!("Error: {err}");
}

/// Checkout cart: one row per line, then the estimated total.
pub fn cart(view: &CartView) {
    if view.is_empty() {
        println!("{EMPTY_CART_MESSAGE}");
        return;
    }

    for item in &view.items {
        let marker = if item.resolved { "" } else { " (not on menu)" };
        println!(
            "{:<28} x{:<3} {:>9}  {:>9}{marker}",
            item.label(),
            item.quantity,
            item.unit_price.to_string(),
            item.line_price.to_string(),
        );
    }
    println!("{}", view.total_label());
}

/// Mini-cart dropdown with its badge.
pub fn mini_cart(view: &MiniCartView) {
    println!("[{}]", view.count);
    if view.is_empty() {
        println!("{EMPTY_MINI_CART_MESSAGE}");
        return;
    }

    for line in &view.lines {
        println!("{:<32} {:>9}", line.label, line.amount.to_string());
    }
    if let Some(href) = view.checkout_href {
        println!("Checkout: {href}");
    }
}

/// Saved order-form fields by name.
pub fn customer(fields: &CustomerFields) {
    if fields.is_empty() {
        println!("No saved customer details.");
        return;
    }

    for (name, value) in fields.iter() {
        println!("{name:<14} {value}");
    }
}
