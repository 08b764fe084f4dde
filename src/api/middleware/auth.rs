//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, verifies the JWT signature,
//! loads the subject doctor from the store, and injects `AuthDoctor` into
//! request extensions for downstream handlers. Every failure path — missing
//! header, bad signature, expired token, unknown subject — answers the same
//! generic 401.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthDoctor};
use crate::auth;
use crate::db;

/// Require a valid bearer token from a registered doctor.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    // 1. Extract bearer token
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    // 2. Verify signature + expiry
    let doctor_id = auth::verify_token(&ctx.settings.jwt_secret, &token)
        .map_err(|_| ApiError::Unauthorized)?;

    // 3. Load the subject — a valid token for a deleted account is still a 401
    let doctor = {
        let conn = ctx.conn()?;
        db::get_doctor(&conn, &doctor_id).map_err(|_| ApiError::Unauthorized)?
    };

    // 4. Inject doctor context for downstream handlers
    req.extensions_mut().insert(AuthDoctor {
        id: doctor.id,
        name: doctor.name,
        email: doctor.email,
        role: doctor.role,
    });

    Ok(next.run(req).await)
}
