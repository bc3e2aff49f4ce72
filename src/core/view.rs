//! View pipeline
//!
//! Derives the displayed catalog from the catalog store and the shopper's
//! filter and sort selection. Pure: the input slice is only read, the result
//! is a fresh `Vec`, and equal inputs always yield equal outputs.
//!
//! Sorting is stable (`slice::sort_by`), so products that compare equal keep
//! their catalog order.

use crate::types::{Product, SockType};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sock-type filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    /// Keep every product
    #[default]
    All,

    /// Keep products of this type only
    Only(SockType),
}

impl TypeFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(sock_type) => product.sock_type == *sock_type,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(sock_type) => sock_type.fmt(f),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse::<SockType>().map(TypeFilter::Only)
    }
}

/// Catalog ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Cheapest first
    PriceAsc,

    /// Most expensive first
    PriceDesc,

    /// Highest sales count first
    BestSellers,

    /// Most recently created first
    #[default]
    Newest,
}

impl SortOrder {
    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::PriceAsc => a.price.cmp(&b.price),
            SortOrder::PriceDesc => b.price.cmp(&a.price),
            SortOrder::BestSellers => b.sales_count.cmp(&a.sales_count),
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literal = match self {
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
            SortOrder::BestSellers => "best-sellers",
            SortOrder::Newest => "newest",
        };
        f.write_str(literal)
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price-asc" => Ok(SortOrder::PriceAsc),
            "price-desc" => Ok(SortOrder::PriceDesc),
            "best-sellers" => Ok(SortOrder::BestSellers),
            "newest" => Ok(SortOrder::Newest),
            other => Err(format!("Unknown sort order '{}'", other)),
        }
    }
}

/// Filter then sort a product sequence
///
/// # Arguments
///
/// * `products` - Catalog products, in catalog order
/// * `filter` - Sock type to keep, or all
/// * `sort` - Ordering to apply
///
/// # Returns
///
/// A new vector with the matching products in the requested order.
pub fn filter_and_sort(products: &[Product], filter: TypeFilter, sort: SortOrder) -> Vec<Product> {
    let mut result: Vec<Product> = products
        .iter()
        .filter(|product| filter.matches(product))
        .cloned()
        .collect();
    result.sort_by(|a, b| sort.compare(a, b));
    result
}
