use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use wayfare_booking::models::Booking;
use wayfare_booking::service::CreateBookingRequest;
use wayfare_core::Actor;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookingEnvelope {
    pub message: String,
    pub booking: Booking,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: String,
    pub refund_amount: Decimal,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(my_bookings))
        .route("/v1/bookings/{id}/pay", post(confirm_payment))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
}

/// POST /v1/bookings
async fn create_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingEnvelope>), AppError> {
    let booking = state.service.create_booking(&actor, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingEnvelope {
            message: "Booking initiated!".to_string(),
            booking,
        }),
    ))
}

/// GET /v1/bookings
async fn my_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.service.my_bookings(&actor).await?;
    Ok(Json(bookings))
}

/// POST /v1/bookings/{id}/pay
async fn confirm_payment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingEnvelope>, AppError> {
    let booking = state.service.confirm_payment(&actor, booking_id).await?;
    Ok(Json(BookingEnvelope {
        message: "Payment process successful!".to_string(),
        booking,
    }))
}

/// POST /v1/bookings/{id}/cancel
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<CancelResponse>, AppError> {
    let outcome = state.service.cancel_booking(&actor, booking_id).await?;
    Ok(Json(CancelResponse {
        message: "Cancelled!".to_string(),
        refund_amount: outcome.refund_amount,
    }))
}
