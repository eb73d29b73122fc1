//! Daily report and financial statement handlers

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};

use core_kernel::DateRange;

use crate::dto::{ApiResponse, DailyReportDto, DailyReportQuery, FinancialStatementDto, PeriodQuery};
use crate::error::ApiError;
use crate::handlers::{latest_only, metadata, optional_date};
use crate::AppState;

/// `GET /reports/daily?date=`; defaults to today in the business timezone
pub async fn daily_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DailyReportQuery>,
) -> Result<Json<ApiResponse<DailyReportDto>>, ApiError> {
    let day = optional_date(query.date.as_deref(), "date")?
        .unwrap_or_else(|| state.config.timezone.today());

    let dto = latest_only(&state, &headers, "daily-report", async {
        let report = state.ledger.daily_report(day, metadata(&headers)).await?;
        Ok::<_, ApiError>(DailyReportDto::from(&report))
    })
    .await?;

    Ok(Json(ApiResponse::ok(dto)))
}

/// `GET /reports/financial-statement?from=&to=`
///
/// `to` defaults to today; an omitted `from` covers all history.
pub async fn financial_statement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<FinancialStatementDto>>, ApiError> {
    let to = optional_date(query.to.as_deref(), "to")?
        .unwrap_or_else(|| state.config.timezone.today());
    let range = DateRange::from_bounds(optional_date(query.from.as_deref(), "from")?, Some(to))?;

    let dto = latest_only(&state, &headers, "financial-statement", async {
        let statement = state
            .ledger
            .financial_statement(range, metadata(&headers))
            .await?;
        let net = statement.net_movement()?;
        Ok::<_, ApiError>(FinancialStatementDto::new(&statement, net))
    })
    .await?;

    Ok(Json(ApiResponse::ok(dto)))
}
