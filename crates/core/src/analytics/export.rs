//! CSV serialization of already-computed aggregates.
//!
//! Values are written raw: no currency symbols, no locale formatting.

use std::string::FromUtf8Error;

use super::metrics::CategorySales;
use super::normalize::ProductSales;
use super::series::{DailyPoint, HourlyPoint};

/// Errors that can occur while writing a CSV export.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// Flushing the writer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The buffer was not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// Write a header and rows into an in-memory CSV document.
fn write_csv<const N: usize>(
    header: [&str; N],
    rows: impl IntoIterator<Item = [String; N]>,
) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let bytes = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
    Ok(String::from_utf8(bytes)?)
}

/// `date,revenue,orders`
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn daily_csv(points: &[DailyPoint]) -> Result<String, ExportError> {
    write_csv(
        ["date", "revenue", "orders"],
        points.iter().map(|p| {
            [
                p.date.format("%Y-%m-%d").to_string(),
                p.revenue.to_string(),
                p.orders.to_string(),
            ]
        }),
    )
}

/// `hour,orders,revenue`
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn hourly_csv(points: &[HourlyPoint]) -> Result<String, ExportError> {
    write_csv(
        ["hour", "orders", "revenue"],
        points
            .iter()
            .map(|p| [p.label.clone(), p.orders.to_string(), p.revenue.to_string()]),
    )
}

/// `product_id,name,quantity,revenue`
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn products_csv(products: &[ProductSales]) -> Result<String, ExportError> {
    write_csv(
        ["product_id", "name", "quantity", "revenue"],
        products.iter().map(|p| {
            [
                p.product_id.to_string(),
                p.name.clone(),
                p.quantity.to_string(),
                p.revenue.to_string(),
            ]
        }),
    )
}

/// `category,quantity,revenue`
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn categories_csv(categories: &[CategorySales]) -> Result<String, ExportError> {
    write_csv(
        ["category", "quantity", "revenue"],
        categories.iter().map(|c| {
            [
                c.category.label().to_owned(),
                c.quantity.to_string(),
                c.revenue.to_string(),
            ]
        }),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::analytics::normalize::CategoryKey;
    use crate::types::ProductId;

    #[test]
    fn test_daily_csv() {
        let points = vec![DailyPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            revenue: Decimal::new(30050, 2),
            orders: 3,
        }];
        assert_eq!(
            daily_csv(&points).unwrap(),
            "date,revenue,orders\n2024-01-02,300.50,3\n"
        );
    }

    #[test]
    fn test_empty_export_is_header_only() {
        assert_eq!(hourly_csv(&[]).unwrap(), "hour,orders,revenue\n");
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let product_id = ProductId::generate();
        let products = vec![ProductSales {
            product_id,
            name: "Tomatoes, cherry".to_string(),
            quantity: 4,
            revenue: Decimal::from(8),
        }];
        let csv = products_csv(&products).unwrap();
        assert_eq!(
            csv,
            format!("product_id,name,quantity,revenue\n{product_id},\"Tomatoes, cherry\",4,8\n")
        );
    }

    #[test]
    fn test_categories_csv_uses_sentinel_label() {
        let categories = vec![CategorySales {
            category: CategoryKey::Uncategorized,
            revenue: Decimal::from(12),
            quantity: 2,
        }];
        assert_eq!(
            categories_csv(&categories).unwrap(),
            "category,quantity,revenue\nUncategorized,2,12\n"
        );
    }
}
