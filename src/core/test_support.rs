//! Shared fixtures for unit tests

use crate::types::{timestamp, Gender, Product, SockType};
use rust_decimal::Decimal;

/// A zoquete priced at 2000 with the given stock and sales
pub fn product(id: &str, stock: u32, sales_count: u32) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        price: Decimal::new(2000, 0),
        sock_type: SockType::Zoquete,
        gender: Gender::Unisex,
        images: vec![format!("https://img.example.com/{}.jpg", id)],
        stock,
        description: String::new(),
        sales_count,
        created_at: timestamp::parse("2024-01-01").unwrap(),
    }
}
