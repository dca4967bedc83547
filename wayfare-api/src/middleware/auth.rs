use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfare_core::{Actor, Role};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

fn parse_role(role: &str) -> Option<Role> {
    match role {
        "USER" => Some(Role::User),
        "AGENT" => Some(Role::Agent),
        "ADMIN" => Some(Role::Admin),
        _ => None,
    }
}

/// Bearer-token middleware: decodes the JWT, resolves the caller into an
/// [`Actor`] and injects it as a request extension. Authorization decisions
/// stay in the service layer.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let claims = token_data.claims;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let role = parse_role(&claims.role).ok_or(StatusCode::UNAUTHORIZED)?;

    let is_master_admin = role == Role::Admin
        && state
            .auth
            .master_admin_email
            .as_deref()
            .is_some_and(|master| master.eq_ignore_ascii_case(&claims.email));

    req.extensions_mut().insert(Actor {
        id,
        email: claims.email,
        role,
        is_master_admin,
    });

    Ok(next.run(req).await)
}
