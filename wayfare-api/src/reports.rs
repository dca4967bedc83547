use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use wayfare_booking::reporting::SalesReport;
use wayfare_core::Actor;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/admin/reports/sales", get(sales_report))
}

#[derive(Debug, Default, Deserialize)]
struct SalesQuery {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// GET /v1/admin/reports/sales?start_date=&end_date=
///
/// Day-wise and package-wise totals keyed by trip date over live bookings.
async fn sales_report(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<SalesQuery>,
) -> Result<Json<SalesReport>, AppError> {
    let report = state
        .service
        .sales_report(&actor, query.start_date, query.end_date)
        .await?;
    Ok(Json(report))
}
