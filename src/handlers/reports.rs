use super::common::{success_response, ApiQuery};
use crate::{
    dto::reports::{DateRangeQuery, TopItemsQuery},
    errors::{ErrorResponse, ServiceError},
    services::reports::{DailySales, ReportPeriod, SalesSummary, StockReport, TopItem},
    AppState,
};
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use chrono::Utc;

pub fn reports_routes() -> Router<AppState> {
    Router::new()
        .route("/vendas", get(sales_summary))
        .route("/vendas-diarias", get(daily_sales))
        .route("/produtos-mais-vendidos", get(top_items))
        .route("/estoque", get(stock_report))
}

fn period(query: &DateRangeQuery) -> Result<ReportPeriod, ServiceError> {
    ReportPeriod::resolve(query, Utc::now().date_naive())
}

/// Revenue and order counts for a date range
#[utoipa::path(
    get,
    path = "/api/relatorios/vendas",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Sales summary", body = SalesSummary),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
    ),
    tag = "relatorios"
)]
pub async fn sales_summary(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let period = period(&query)?;
    Ok(success_response(
        state.services.reports.sales_summary(period).await?,
    ))
}

/// One row per day of the range, days without sales included
#[utoipa::path(
    get,
    path = "/api/relatorios/vendas-diarias",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Daily sales", body = [DailySales]),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
    ),
    tag = "relatorios"
)]
pub async fn daily_sales(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let period = period(&query)?;
    Ok(success_response(
        state.services.reports.daily_sales(period).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/relatorios/produtos-mais-vendidos",
    params(TopItemsQuery),
    responses(
        (status = 200, description = "Best sellers of finalized orders", body = [TopItem]),
        (status = 400, description = "Invalid range or limit", body = ErrorResponse),
    ),
    tag = "relatorios"
)]
pub async fn top_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TopItemsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let period = period(&query.range())?;
    Ok(success_response(
        state.services.reports.top_items(period, query.limit).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/relatorios/estoque",
    responses((status = 200, description = "Stock position and valuation", body = StockReport)),
    tag = "relatorios"
)]
pub async fn stock_report(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.reports.stock_report().await?))
}
