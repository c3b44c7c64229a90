//! Offline analytics reports from a JSON snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Last 30 days, UTC, as JSON
//! fc-cli report --input snapshot.json
//!
//! # Fixed window in a local zone, as the daily CSV
//! fc-cli report --input snapshot.json --start 2024-06-01 --end 2024-06-30 \
//!     --utc-offset +05:30 --csv daily
//! ```
//!
//! The snapshot holds the same rows the admin API reads from the database:
//!
//! ```json
//! { "orders": [], "items": [], "products": [], "categories": [], "page_views": [] }
//! ```
//!
//! Every key is optional.

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use freshcart_core::analytics::{
    AnalyticsReport, ExportError, RangeError, ReportInput, ReportRange, VisitorCounts,
    categories_csv, daily_csv, hourly_csv, products_csv,
};
use freshcart_core::models::{Category, Order, OrderItem, PageView, Product};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while producing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid range: {0}")]
    Range(#[from] RangeError),

    #[error("--start and --end must be given together")]
    IncompleteRange,

    #[error("CSV export failed: {0}")]
    Export(#[from] ExportError),
}

/// Rows exported from the FreshCart database.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub orders: Vec<Order>,
    pub items: Vec<OrderItem>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub page_views: Vec<PageView>,
}

impl Snapshot {
    fn input(&self) -> ReportInput<'_> {
        ReportInput {
            orders: &self.orders,
            items: &self.items,
            products: &self.products,
            categories: &self.categories,
        }
    }
}

/// Sales report plus visitor counters, as printed in JSON mode.
#[derive(Debug, Serialize)]
pub struct OfflineReport {
    #[serde(flatten)]
    pub report: AnalyticsReport,
    pub visitors: VisitorCounts,
}

/// Which CSV table to print instead of JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CsvKind {
    Daily,
    Hourly,
    Products,
    Categories,
}

/// Options for [`run`] and [`render`].
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Window length ending today when no explicit dates are given.
    pub days: u32,
    pub utc_offset: FixedOffset,
    /// Reference instant for "today" and live visitors.
    pub now: DateTime<Utc>,
    pub csv: Option<CsvKind>,
}

impl ReportOptions {
    /// Explicit dates win; otherwise the last `days` days up to today.
    fn range(&self) -> Result<ReportRange, ReportError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(ReportRange::new(start, end)?),
            (None, None) => {
                let today = self.now.with_timezone(&self.utc_offset).date_naive();
                Ok(ReportRange::last_days(today, self.days))
            }
            _ => Err(ReportError::IncompleteRange),
        }
    }
}

/// Build the report for `snapshot` and render it as pretty JSON or CSV.
///
/// # Errors
///
/// Returns an error if the range is invalid or serialization fails.
pub fn render(snapshot: &Snapshot, options: &ReportOptions) -> Result<String, ReportError> {
    let range = options.range()?;
    let zone = &options.utc_offset;
    let report = AnalyticsReport::build(&snapshot.input(), range, zone);

    let output = match options.csv {
        Some(CsvKind::Daily) => daily_csv(&report.daily)?,
        Some(CsvKind::Hourly) => hourly_csv(&report.hourly)?,
        Some(CsvKind::Products) => products_csv(&report.metrics.top_products)?,
        Some(CsvKind::Categories) => categories_csv(&report.metrics.category_sales)?,
        None => {
            let visitors =
                VisitorCounts::compute(&snapshot.page_views, options.now, &range, zone);
            serde_json::to_string_pretty(&OfflineReport { report, visitors })?
        }
    };
    Ok(output)
}

/// Read the snapshot at `path` and print its report to stdout.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the report
/// cannot be rendered.
pub async fn run(path: &Path, options: &ReportOptions) -> Result<(), ReportError> {
    let content = tokio::fs::read_to_string(path).await?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;
    tracing::info!(
        orders = snapshot.orders.len(),
        items = snapshot.items.len(),
        page_views = snapshot.page_views.len(),
        "Loaded snapshot"
    );

    let output = render(&snapshot, options)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SNAPSHOT: &str = r#"{
        "orders": [
            {"id": "00000000-0000-0000-0000-000000000001", "user_id": "00000000-0000-0000-0000-0000000000a1",
             "status": "delivered", "total": "120.00", "created_at": "2024-06-10T09:15:00Z"},
            {"id": "00000000-0000-0000-0000-000000000002", "user_id": "00000000-0000-0000-0000-0000000000a1",
             "status": "cancelled", "total": "40.00", "created_at": "2024-06-11T18:00:00Z"}
        ],
        "items": [
            {"id": "00000000-0000-0000-0000-0000000000b1", "order_id": "00000000-0000-0000-0000-000000000001",
             "product_id": "00000000-0000-0000-0000-0000000000c1", "product_name": "Mango",
             "quantity": 4, "price": "30.00", "created_at": "2024-06-10T09:15:00Z"}
        ],
        "page_views": [
            {"session_id": "s1", "path": "/", "created_at": "2024-06-15T11:58:00Z"}
        ]
    }"#;

    fn options(csv: Option<CsvKind>) -> ReportOptions {
        ReportOptions {
            start: Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            end: Some(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
            days: 30,
            utc_offset: FixedOffset::east_opt(0).unwrap(),
            now: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
            csv,
        }
    }

    #[test]
    fn test_render_json_report() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let output = render(&snapshot, &options(None)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["metrics"]["total_orders"], 1);
        assert_eq!(value["metrics"]["unique_customers"], 1);
        assert_eq!(value["visitors"]["live_visitors"], 1);
        // the cancelled order leaves no point on the 11th
        assert_eq!(value["daily"].as_array().unwrap().len(), 1);
        assert_eq!(value["hourly"].as_array().unwrap().len(), 24);
    }

    #[test]
    fn test_render_products_csv() {
        let snapshot: Snapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let output = render(&snapshot, &options(Some(CsvKind::Products))).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("product_id,name,quantity,revenue"));
        assert!(lines.next().unwrap().contains("Mango,4,120"));
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(render(&snapshot, &options(None)).is_ok());
    }

    #[test]
    fn test_range_requires_both_dates() {
        let mut opts = options(None);
        opts.end = None;
        assert!(matches!(opts.range(), Err(ReportError::IncompleteRange)));
    }

    #[test]
    fn test_default_range_ends_today_in_zone() {
        let mut opts = options(None);
        opts.start = None;
        opts.end = None;
        opts.days = 7;
        // 12:00 UTC is already the 16th at +14:00
        opts.utc_offset = FixedOffset::east_opt(14 * 3600).unwrap();

        let range = opts.range().unwrap();
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    }
}
