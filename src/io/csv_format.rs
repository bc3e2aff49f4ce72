//! CSV format handling for action logs and storefront reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvActionRecord structure for deserialization
//! - Conversion from CSV records to [`StoreAction`]
//! - Catalog and order report serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{Order, PaymentMethod, Product, StoreAction, StoreError};
use csv::Writer;
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the action log format with columns: action, id, quantity,
/// payment, coupon. Everything but `action` is optional because most actions
/// only use one or two columns.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvActionRecord {
    pub action: String,
    pub id: Option<String>,
    pub quantity: Option<String>,
    pub payment: Option<String>,
    pub coupon: Option<String>,
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn required_id(record: &CsvActionRecord, action: &str) -> Result<String, String> {
    non_empty(&record.id).ok_or_else(|| format!("'{}' requires an id", action))
}

fn required_quantity(record: &CsvActionRecord, action: &str) -> Result<u32, String> {
    let raw = non_empty(&record.quantity)
        .ok_or_else(|| format!("'{}' requires a quantity", action))?;
    raw.parse::<u32>()
        .map_err(|_| format!("Invalid quantity '{}' for '{}'", raw, action))
}

/// Convert a CsvActionRecord to a StoreAction
///
/// # Arguments
///
/// * `record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(StoreAction) - Successfully converted record
/// - Err(String) - Error message describing the conversion failure
pub fn convert_csv_record(record: CsvActionRecord) -> Result<StoreAction, String> {
    let action = record.action.trim().to_lowercase();

    match action.as_str() {
        "add" => Ok(StoreAction::AddToCart {
            product_id: required_id(&record, &action)?,
        }),
        "set_quantity" => Ok(StoreAction::SetQuantity {
            product_id: required_id(&record, &action)?,
            quantity: required_quantity(&record, &action)?,
        }),
        "remove" => Ok(StoreAction::RemoveFromCart {
            product_id: required_id(&record, &action)?,
        }),
        "clear" => Ok(StoreAction::ClearCart),
        "checkout" => {
            let payment_method = match non_empty(&record.payment) {
                Some(raw) => raw.parse::<PaymentMethod>()?,
                None => PaymentMethod::Transfer,
            };
            Ok(StoreAction::Checkout {
                order_id: non_empty(&record.id),
                payment_method,
                coupon: non_empty(&record.coupon),
            })
        }
        "confirm" => Ok(StoreAction::ConfirmPayment {
            order_id: required_id(&record, &action)?,
        }),
        "cancel" => Ok(StoreAction::CancelOrder {
            order_id: required_id(&record, &action)?,
        }),
        "adjust" => Ok(StoreAction::AdjustStock {
            product_id: required_id(&record, &action)?,
            stock: required_quantity(&record, &action)?,
        }),
        _ => Err(format!("Invalid action: '{}'", record.action)),
    }
}

fn write_error(context: &str, error: impl std::fmt::Display) -> StoreError {
    StoreError::IoError {
        message: format!("Failed to write {}: {}", context, error),
    }
}

/// Write catalog products to CSV format
///
/// Columns: id, name, type, price, stock, sales_count. Rows are written in
/// the given order, so callers choose the view (filter and sort) first.
///
/// # Errors
///
/// Returns `IoError` if the output cannot be written.
pub fn write_catalog_csv(products: &[Product], output: &mut dyn Write) -> Result<(), StoreError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "name", "type", "price", "stock", "sales_count"])
        .map_err(|e| write_error("CSV header", e))?;

    for product in products {
        writer
            .write_record(&[
                product.id.clone(),
                product.name.clone(),
                product.sock_type.to_string(),
                format!("{:.2}", product.price),
                product.stock.to_string(),
                product.sales_count.to_string(),
            ])
            .map_err(|e| write_error("product record", e))?;
    }

    writer.flush().map_err(|e| write_error("output", e))?;
    Ok(())
}

/// Write orders to CSV format
///
/// Columns: id, status, payment, total, items. Items are rendered as
/// `product:quantity` pairs separated by `;`. Rows keep ledger order (newest
/// first).
///
/// # Errors
///
/// Returns `IoError` if the output cannot be written.
pub fn write_orders_csv(orders: &[Order], output: &mut dyn Write) -> Result<(), StoreError> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "status", "payment", "total", "items"])
        .map_err(|e| write_error("CSV header", e))?;

    for order in orders {
        let items = order
            .items
            .iter()
            .map(|line| format!("{}:{}", line.product_id, line.quantity))
            .collect::<Vec<_>>()
            .join(";");

        writer
            .write_record(&[
                order.id.clone(),
                order.status.to_string(),
                order.payment_method.to_string(),
                format!("{:.2}", order.total),
                items,
            ])
            .map_err(|e| write_error("order record", e))?;
    }

    writer.flush().map_err(|e| write_error("output", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::product;
    use crate::types::{OrderLine, OrderStatus, SockType};
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn record(action: &str, id: &str, quantity: &str, payment: &str, coupon: &str) -> CsvActionRecord {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        CsvActionRecord {
            action: action.to_string(),
            id: opt(id),
            quantity: opt(quantity),
            payment: opt(payment),
            coupon: opt(coupon),
        }
    }

    #[rstest]
    #[case::add(record("add", "am-1", "", "", ""), StoreAction::AddToCart { product_id: "am-1".into() })]
    #[case::upper_case(record("ADD", " am-1 ", "", "", ""), StoreAction::AddToCart { product_id: "am-1".into() })]
    #[case::set_quantity(record("set_quantity", "am-1", "4", "", ""), StoreAction::SetQuantity { product_id: "am-1".into(), quantity: 4 })]
    #[case::remove(record("remove", "am-2", "", "", ""), StoreAction::RemoveFromCart { product_id: "am-2".into() })]
    #[case::clear(record("clear", "", "", "", ""), StoreAction::ClearCart)]
    #[case::confirm(record("confirm", "SN-1", "", "", ""), StoreAction::ConfirmPayment { order_id: "SN-1".into() })]
    #[case::cancel(record("cancel", "SN-1", "", "", ""), StoreAction::CancelOrder { order_id: "SN-1".into() })]
    #[case::adjust(record("adjust", "st-vans", "0", "", ""), StoreAction::AdjustStock { product_id: "st-vans".into(), stock: 0 })]
    fn test_convert_valid_records(#[case] input: CsvActionRecord, #[case] expected: StoreAction) {
        assert_eq!(convert_csv_record(input).unwrap(), expected);
    }

    #[rstest]
    #[case::defaults(record("checkout", "", "", "", ""), None, PaymentMethod::Transfer, None)]
    #[case::full(
        record("checkout", "SN-9", "", "card", "MAYORISTA"),
        Some("SN-9"),
        PaymentMethod::Card,
        Some("MAYORISTA")
    )]
    fn test_convert_checkout(
        #[case] input: CsvActionRecord,
        #[case] order_id: Option<&str>,
        #[case] payment_method: PaymentMethod,
        #[case] coupon: Option<&str>,
    ) {
        assert_eq!(
            convert_csv_record(input).unwrap(),
            StoreAction::Checkout {
                order_id: order_id.map(str::to_string),
                payment_method,
                coupon: coupon.map(str::to_string),
            }
        );
    }

    #[rstest]
    #[case::unknown_action(record("refund", "SN-1", "", "", ""), "Invalid action")]
    #[case::missing_id(record("add", "", "", "", ""), "requires an id")]
    #[case::missing_quantity(record("set_quantity", "am-1", "", "", ""), "requires a quantity")]
    #[case::negative_quantity(record("adjust", "am-1", "-3", "", ""), "Invalid quantity")]
    #[case::bad_payment(record("checkout", "", "", "cash", ""), "cash")]
    fn test_convert_invalid_records(#[case] input: CsvActionRecord, #[case] message: &str) {
        let error = convert_csv_record(input).unwrap_err();
        assert!(error.contains(message), "unexpected error: {}", error);
    }

    #[test]
    fn test_write_catalog_csv() {
        let mut quarter = product("q", 3, 7);
        quarter.sock_type = SockType::Quarter;
        quarter.price = Decimal::new(22005, 1);
        let products = vec![product("z", 0, 1), quarter];

        let mut output = Vec::new();
        write_catalog_csv(&products, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,name,type,price,stock,sales_count\n\
             z,Product z,zoquete,2000.00,0,1\n\
             q,Product q,1/4,2200.50,3,7\n"
        );
    }

    #[test]
    fn test_write_orders_csv() {
        let orders = vec![Order {
            id: "SN-1".to_string(),
            date: Utc::now(),
            items: vec![
                OrderLine {
                    product_id: "am-1".to_string(),
                    name: "Amanecer Oso Pink".to_string(),
                    quantity: 2,
                },
                OrderLine {
                    product_id: "st-vans".to_string(),
                    name: "Street Vans Classic".to_string(),
                    quantity: 1,
                },
            ],
            total: Decimal::new(6200, 0),
            payment_method: PaymentMethod::Transfer,
            status: OrderStatus::Pagado,
        }];

        let mut output = Vec::new();
        write_orders_csv(&orders, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,status,payment,total,items\n\
             SN-1,pagado,transfer,6200.00,am-1:2;st-vans:1\n"
        );
    }

    #[test]
    fn test_write_empty_reports_have_headers() {
        let mut catalog = Vec::new();
        let mut orders = Vec::new();
        write_catalog_csv(&[], &mut catalog).unwrap();
        write_orders_csv(&[], &mut orders).unwrap();

        assert_eq!(catalog, b"id,name,type,price,stock,sales_count\n");
        assert_eq!(orders, b"id,status,payment,total,items\n");
    }
}
