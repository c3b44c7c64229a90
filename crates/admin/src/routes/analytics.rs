//! Analytics route handlers.
//!
//! Sales KPIs, chart series and CSV exports for a date range.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{FixedOffset, NaiveDate, Utc};
use freshcart_core::analytics::{
    AnalyticsReport, ReportRange, categories_csv, daily_csv, hourly_csv, products_csv,
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::orders;
use crate::error::{AppError, Result};
use crate::state::AppState;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters shared by every analytics endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// Date range preset: "today", "7d", "30d" or "90d"
    pub range: Option<String>,
    /// Custom start date (YYYY-MM-DD)
    pub start: Option<NaiveDate>,
    /// Custom end date (YYYY-MM-DD)
    pub end: Option<NaiveDate>,
}

impl AnalyticsQuery {
    /// Resolve to a concrete range ending `today`.
    ///
    /// Custom dates win over a preset. Without either, the last 30 days.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown preset, a lone custom
    /// date, or an inverted range.
    pub fn to_report_range(&self, today: NaiveDate) -> Result<ReportRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => return Ok(ReportRange::new(start, end)?),
            (None, None) => {}
            _ => {
                return Err(AppError::BadRequest(
                    "start and end must be given together".to_string(),
                ));
            }
        }

        let days = match self.range.as_deref() {
            Some("today") => 1,
            Some("7d") => 7,
            None | Some("30d") => 30,
            Some("90d") => 90,
            Some(other) => {
                return Err(AppError::BadRequest(format!("unknown range: {other}")));
            }
        };
        Ok(ReportRange::last_days(today, days))
    }
}

/// Today's date in the reporting zone.
pub(crate) fn local_today(zone: &FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(zone).date_naive()
}

async fn build_report(state: &AppState, query: &AnalyticsQuery) -> Result<AnalyticsReport> {
    let zone = state.zone();
    let range = query.to_report_range(local_today(zone))?;
    let (lower, upper) = range.bounds(zone);

    let rows = orders::load_report_rows(state.pool(), lower, upper).await?;
    Ok(AnalyticsReport::build(&rows.input(), range, zone))
}

// =============================================================================
// Handlers
// =============================================================================

/// Full dashboard report as JSON.
#[instrument(skip(state))]
pub async fn report(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>> {
    let report = build_report(&state, &query).await?;
    tracing::info!(
        start = %report.range.start(),
        end = %report.range.end(),
        orders = report.metrics.total_orders,
        "Built analytics report"
    );
    Ok(Json(report))
}

/// Which aggregate a CSV export contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Daily,
    Hourly,
    Products,
    Categories,
}

impl ExportKind {
    /// Parse the `{name}.csv` path segment.
    #[must_use]
    pub fn from_file_name(file: &str) -> Option<Self> {
        match file.strip_suffix(".csv")? {
            "daily" => Some(Self::Daily),
            "hourly" => Some(Self::Hourly),
            "products" => Some(Self::Products),
            "categories" => Some(Self::Categories),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Hourly => "hourly",
            Self::Products => "products",
            Self::Categories => "categories",
        }
    }

    fn render(self, report: &AnalyticsReport) -> Result<String> {
        let csv = match self {
            Self::Daily => daily_csv(&report.daily)?,
            Self::Hourly => hourly_csv(&report.hourly)?,
            Self::Products => products_csv(&report.metrics.top_products)?,
            Self::Categories => categories_csv(&report.metrics.category_sales)?,
        };
        Ok(csv)
    }

    fn download_name(self, range: &ReportRange) -> String {
        format!(
            "freshcart-{}-{}-to-{}.csv",
            self.name(),
            range.start(),
            range.end()
        )
    }
}

/// CSV download of one aggregate.
#[instrument(skip(state))]
pub async fn export(
    State(state): State<AppState>,
    Path(file): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Response> {
    let kind = ExportKind::from_file_name(&file)
        .ok_or_else(|| AppError::NotFound(format!("export {file}")))?;

    let report = build_report(&state, &query).await?;
    let body = kind.render(&report)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        kind.download_name(&report.range)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
