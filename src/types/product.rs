//! Product-related types for the storefront
//!
//! This module defines the catalog `Product` together with the sock type and
//! gender enumerations used to classify it. Field names serialize exactly as
//! the persisted catalog expects (`salesCount`, `createdAt`, `type`), so the
//! same shape round-trips through the local cache and the remote store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::StoreError;
use super::timestamp;

/// Product identifier (e.g. `am-1`, `st-vans`)
pub type ProductId = String;

/// Sock cut offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SockType {
    /// Ankle sock
    #[serde(rename = "zoquete")]
    Zoquete,

    /// Quarter-length sock
    #[serde(rename = "1/4")]
    Quarter,

    /// Three-quarter-length sock
    #[serde(rename = "3/4")]
    ThreeQuarter,
}

impl SockType {
    /// The literal used in persisted data and filter parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            SockType::Zoquete => "zoquete",
            SockType::Quarter => "1/4",
            SockType::ThreeQuarter => "3/4",
        }
    }
}

impl fmt::Display for SockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SockType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zoquete" => Ok(SockType::Zoquete),
            "1/4" => Ok(SockType::Quarter),
            "3/4" => Ok(SockType::ThreeQuarter),
            other => Err(format!("Unknown sock type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Hombre,
    Mujer,
    Unisex,
}

/// Catalog product
///
/// The catalog store is the single owner of `stock` and `sales_count`.
/// Both are unsigned, so a product can never report negative stock; the
/// reconciler additionally refuses any transform that would need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier
    pub id: ProductId,

    pub name: String,

    /// Unit price in the store currency (non-negative)
    #[serde(
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "deserialize_price"
    )]
    pub price: Decimal,

    /// Sock cut, persisted under the `type` key
    #[serde(rename = "type")]
    pub sock_type: SockType,

    pub gender: Gender,

    /// Ordered image URLs, first one is the cover
    pub images: Vec<String>,

    /// Units available for sale
    pub stock: u32,

    pub description: String,

    /// Units sold, used by the best-sellers ordering
    ///
    /// Only increases on checkout; cancellation reverses it, clamped at zero.
    pub sales_count: u32,

    /// Publication timestamp, used by the newest-first ordering
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether at least one unit can be added to a cart
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Check the invariants serde cannot express in the field types
    ///
    /// # Errors
    ///
    /// Returns `InvalidProduct` if the price is negative.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.price < Decimal::ZERO {
            return Err(StoreError::invalid_product(
                &self.id,
                format!("price {} is negative", self.price),
            ));
        }
        Ok(())
    }
}

/// Read a float price and refuse negative values
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let price = rust_decimal::serde::float::deserialize(deserializer)?;
    if price < Decimal::ZERO {
        return Err(de::Error::custom(format!("price {} is negative", price)));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zoquete("zoquete", SockType::Zoquete)]
    #[case::quarter("1/4", SockType::Quarter)]
    #[case::three_quarter("3/4", SockType::ThreeQuarter)]
    #[case::uppercase(" ZOQUETE ", SockType::Zoquete)]
    fn test_sock_type_parsing(#[case] input: &str, #[case] expected: SockType) {
        assert_eq!(input.parse::<SockType>().unwrap(), expected);
    }

    #[test]
    fn test_sock_type_rejects_unknown() {
        assert!("knee".parse::<SockType>().is_err());
    }

    #[test]
    fn test_product_serializes_with_catalog_field_names() {
        let product = Product {
            id: "am-1".to_string(),
            name: "Amanecer Oso Pink".to_string(),
            price: Decimal::new(2000, 0),
            sock_type: SockType::Quarter,
            gender: Gender::Mujer,
            images: vec!["https://example.com/a.jpg".to_string()],
            stock: 7,
            description: "Oso".to_string(),
            sales_count: 3,
            created_at: timestamp::parse("2024-01-10").unwrap(),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["type"], "1/4");
        assert_eq!(value["gender"], "mujer");
        assert_eq!(value["salesCount"], 3);
        assert_eq!(value["price"], 2000.0);
        assert!(value["createdAt"].as_str().unwrap().starts_with("2024-01-10T00:00:00"));

        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_product_accepts_date_only_created_at_and_integer_price() {
        let json = r#"{
            "id": "st-vans",
            "name": "Street Vans Classic",
            "price": 2200,
            "type": "1/4",
            "gender": "unisex",
            "images": [],
            "stock": 100,
            "description": "Classic",
            "salesCount": 200,
            "createdAt": "2023-12-20"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(2200, 0));
        assert_eq!(product.created_at, timestamp::parse("2023-12-20T00:00:00Z").unwrap());
    }

    #[test]
    fn test_product_rejects_negative_price() {
        let json = r#"{
            "id": "st-vans",
            "name": "Street Vans Classic",
            "price": -500,
            "type": "1/4",
            "gender": "unisex",
            "images": [],
            "stock": 100,
            "description": "Classic",
            "salesCount": 200,
            "createdAt": "2023-12-20"
        }"#;

        let error = serde_json::from_str::<Product>(json).unwrap_err();
        assert!(error.to_string().contains("negative"));
    }

    #[rstest]
    #[case::zero(Decimal::ZERO, true)]
    #[case::positive(Decimal::new(2000, 0), true)]
    #[case::negative(Decimal::new(-500, 0), false)]
    fn test_validate_price(#[case] price: Decimal, #[case] valid: bool) {
        let product = Product {
            id: "am-1".to_string(),
            name: "Amanecer Oso Pink".to_string(),
            price,
            sock_type: SockType::Quarter,
            gender: Gender::Mujer,
            images: Vec::new(),
            stock: 1,
            description: String::new(),
            sales_count: 0,
            created_at: timestamp::parse("2024-01-10").unwrap(),
        };

        assert_eq!(product.validate().is_ok(), valid);
    }
}
