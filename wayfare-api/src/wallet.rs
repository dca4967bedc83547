use axum::{extract::State, routing::get, Extension, Json, Router};
use wayfare_booking::wallet::WalletStatement;
use wayfare_core::Actor;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/wallet", get(wallet_statement))
}

/// GET /v1/wallet — balance plus history, newest first.
async fn wallet_statement(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<WalletStatement>, AppError> {
    let statement = state.service.wallet_statement(&actor, actor.id).await?;
    Ok(Json(statement))
}
