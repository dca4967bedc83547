use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use wayfare_booking::models::{Booking, BookingStatus};
use wayfare_booking::repository::BookingFilter;
use wayfare_booking::service::{CreatePackageRequest, UpdatePackageRequest};
use wayfare_catalog::TravelPackage;
use wayfare_core::Actor;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/bookings", get(list_bookings))
        .route("/v1/admin/bookings/{id}/status", put(update_booking_status))
        .route(
            "/v1/admin/packages",
            get(list_all_packages).post(create_package),
        )
        .route(
            "/v1/admin/packages/{id}",
            put(update_package).delete(deactivate_package),
        )
}

#[derive(Debug, Default, Deserialize)]
struct BookingQuery {
    status: Option<BookingStatus>,
    package_id: Option<Uuid>,
}

/// GET /v1/admin/bookings?status=&package_id=
async fn list_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let filter = BookingFilter {
        status: query.status,
        package_id: query.package_id,
    };
    let bookings = state.service.all_bookings(&actor, filter).await?;
    Ok(Json(bookings))
}

#[derive(Debug, Deserialize)]
struct StatusOverrideRequest {
    status: BookingStatus,
}

/// PUT /v1/admin/bookings/{id}/status
async fn update_booking_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<StatusOverrideRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .service
        .override_status(&actor, booking_id, req.status)
        .await?;
    Ok(Json(booking))
}

/// GET /v1/admin/packages — deactivated packages included.
async fn list_all_packages(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<TravelPackage>>, AppError> {
    let packages = state.service.list_all_packages(&actor).await?;
    Ok(Json(packages))
}

/// POST /v1/admin/packages
async fn create_package(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreatePackageRequest>,
) -> Result<(StatusCode, Json<TravelPackage>), AppError> {
    let package = state.service.create_package(&actor, req).await?;
    Ok((StatusCode::CREATED, Json(package)))
}

/// PUT /v1/admin/packages/{id}
async fn update_package(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePackageRequest>,
) -> Result<Json<TravelPackage>, AppError> {
    let package = state.service.update_package(&actor, id, req).await?;
    Ok(Json(package))
}

/// DELETE /v1/admin/packages/{id} — soft-deactivation, never a hard delete.
async fn deactivate_package(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<TravelPackage>, AppError> {
    let package = state.service.deactivate_package(&actor, id).await?;
    Ok(Json(package))
}
