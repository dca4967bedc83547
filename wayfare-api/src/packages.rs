use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use wayfare_catalog::TravelPackage;
use wayfare_core::DomainError;

use crate::error::AppError;
use crate::state::AppState;

/// Public catalog browse; no authentication required.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/packages", get(list_packages))
        .route("/v1/packages/{id}", get(get_package))
}

/// GET /v1/packages — available packages only.
async fn list_packages(
    State(state): State<AppState>,
) -> Result<Json<Vec<TravelPackage>>, AppError> {
    let packages = state.service.browse_packages().await?;
    Ok(Json(packages))
}

/// GET /v1/packages/{id}
async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TravelPackage>, AppError> {
    let package = state.service.get_package(id).await?;
    if !package.available {
        return Err(DomainError::PackageUnavailable.into());
    }
    Ok(Json(package))
}
