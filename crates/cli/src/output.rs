//! Terminal rendering of command results.

#![allow(clippy::print_stdout)]

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::json;

use cornershop_storefront::catalog::Product;
use cornershop_storefront::routes::auth::SessionView;
use cornershop_storefront::routes::products::ProductPage;
use cornershop_storefront::services::{BrowsePage, CartView};

/// Where results go: plain text or pretty JSON, always on stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as JSON, or the text produced by `text`.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if `value` cannot be serialized.
    pub fn emit<T: Serialize + ?Sized>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    /// Print a one-line status message.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if JSON output fails.
    pub fn message(&self, message: &str) -> Result<(), serde_json::Error> {
        self.emit(&json!({ "message": message }), || message.to_string())
    }
}

pub fn product_row(product: &Product) -> String {
    format!(
        "{:>4}  {:<42} {:>10}  {}",
        product.id.as_i32(),
        truncate(&product.title, 42),
        product.price.to_string(),
        product.category
    )
}

pub fn product_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products.".to_string();
    }
    products
        .iter()
        .map(product_row)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn browse_page(page: &BrowsePage) -> String {
    let mut out = String::new();
    if page.query.is_empty() {
        let _ = writeln!(out, "Category: {}", page.selected_category);
    } else {
        let _ = writeln!(out, "Search: \"{}\"", page.query);
    }
    let _ = writeln!(out, "{}", product_table(&page.page.items));

    let links: Vec<String> = page
        .page
        .links
        .iter()
        .map(|link| {
            if link.active {
                format!("[{}]", link.number)
            } else {
                link.number.to_string()
            }
        })
        .collect();
    let _ = write!(
        out,
        "Page {} of {} ({} products)  {}",
        page.page.page,
        page.page.total_pages,
        page.page.total_items,
        links.join(" ")
    );
    out
}

pub fn product_page(page: &ProductPage) -> String {
    let product = &page.product;
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", product.title, product.id);
    let _ = writeln!(
        out,
        "{}  |  {}  |  rating {:.1}  |  {} in stock",
        product.price, product.category, product.rating, product.stock
    );
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    let _ = writeln!(out, "\nSimilar products:\n{}", product_table(&page.similar));
    let _ = write!(out, "\nComments:\n{}", comment_list(&page.comments));
    out
}

pub fn cart_view(view: &CartView) -> String {
    if view.is_empty() {
        return format!(
            "Your cart is empty.\nShipping ({}): {}\nTotal: {}",
            view.shipping_option, view.summary.shipping, view.summary.total
        );
    }

    let mut out = String::new();
    for line in &view.lines {
        let _ = writeln!(
            out,
            "{:>4}  {:<42} {:>4} x {:>10} = {:>10}",
            line.product.id.as_i32(),
            truncate(&line.product.title, 42),
            line.quantity.get(),
            line.product.price.to_string(),
            line.line_total.to_string()
        );
    }
    let _ = writeln!(out, "Subtotal: {}", view.summary.subtotal);
    let _ = writeln!(
        out,
        "Shipping ({}): {}",
        view.shipping_option, view.summary.shipping
    );
    let _ = write!(out, "Total: {}", view.summary.total);
    out
}

pub fn comment_list(comments: &[String]) -> String {
    if comments.is_empty() {
        return "No comments yet.".to_string();
    }
    comments
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{i:>3}. {c}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn session(view: &SessionView) -> String {
    view.user.as_ref().map_or_else(
        || "Not logged in.".to_string(),
        |user| format!("{} {} <{}>", user.first_name, user.last_name, user.email),
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cornershop_core::{Money, ProductId};

    use super::*;

    fn lamp() -> Product {
        Product {
            id: ProductId::new(3),
            title: "Desk Lamp".to_string(),
            price: Money::from_cents(1999),
            category: "home-decoration".to_string(),
            thumbnail: String::new(),
            rating: 4.2,
            stock: 7,
            discount_percentage: 0.0,
            description: String::new(),
        }
    }

    #[test]
    fn test_product_row() {
        let row = product_row(&lamp());
        assert!(row.starts_with("   3  Desk Lamp"));
        assert!(row.contains("$19.99"));
        assert!(row.ends_with("home-decoration"));
    }

    #[test]
    fn test_comment_list_is_indexed_from_zero() {
        let text = comment_list(&["great".to_string(), "meh".to_string()]);
        assert_eq!(text, "  0. great\n  1. meh");
        assert_eq!(comment_list(&[]), "No comments yet.");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
