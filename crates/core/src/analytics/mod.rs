//! Analytics aggregation engine.
//!
//! Raw rows flow through [`normalize`] into [`Groupings`], from which
//! [`SalesMetrics`] and the chart series are derived. [`AnalyticsReport`]
//! bundles the three for a [`ReportRange`]. Visitor presence is computed
//! separately from page-view events by [`VisitorCounts`].
//!
//! Everything here is synchronous and free of I/O.

pub mod export;
pub mod metrics;
pub mod normalize;
pub mod range;
pub mod report;
pub mod series;
pub mod visitors;

pub use export::{ExportError, categories_csv, daily_csv, hourly_csv, products_csv};
pub use metrics::{CategorySales, SalesMetrics, StatusShare, TOP_PRODUCTS_LIMIT, percent};
pub use normalize::{
    CategoryKey, CategoryTally, DayTally, Groupings, HOURS_PER_DAY, HourTally, ProductSales,
    ReportInput, normalize,
};
pub use range::{RangeError, ReportRange};
pub use report::AnalyticsReport;
pub use series::{DailyPoint, HourlyPoint, daily_series, hourly_series};
pub use visitors::{LIVE_WINDOW_MINUTES, VisitorCounts};
