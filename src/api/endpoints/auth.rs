//! Registration and login.
//!
//! `POST /api/auth/register` — create a doctor account, returns `{token, doctor}`
//! `POST /api/auth/login` — verify credentials, returns `{token, doctor}`
//!
//! `POST /api/doctors` routes here too: doctor creation *is* registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth;
use crate::db;
use crate::models::{Doctor, DoctorRole, LoginRequest, RegisterDoctorRequest};

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub doctor: Doctor,
}

/// `POST /api/auth/register` — create a doctor account.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(request): Json<RegisterDoctorRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate().map_err(ApiError::BadRequest)?;

    let password_hash = auth::hash_password(&request.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let now = Utc::now();
    let doctor = Doctor {
        id: Uuid::new_v4(),
        name: request.name,
        email: request.email,
        password_hash,
        role: DoctorRole::Doctor,
        specialization: request.specialization,
        experience_years: request.experience_years,
        patient_ids: vec![],
        appointment_ids: vec![],
        created_at: now,
        updated_at: now,
    };

    {
        let conn = ctx.conn()?;
        db::insert_doctor(&conn, &doctor)?;
    }

    let token = auth::issue_token(&ctx.settings.jwt_secret, &doctor.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(doctor_id = %doctor.id, "doctor registered");

    Ok((StatusCode::CREATED, Json(AuthResponse { token, doctor })))
}

/// `POST /api/auth/login` — exchange credentials for a bearer token.
///
/// Wrong email and wrong password answer identically.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let doctor = {
        let conn = ctx.conn()?;
        db::get_doctor_by_email(&conn, &request.email).map_err(|_| ApiError::Unauthorized)?
    };

    auth::verify_password(&request.password, &doctor.password_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let token = auth::issue_token(&ctx.settings.jwt_secret, &doctor.id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(AuthResponse { token, doctor }))
}
