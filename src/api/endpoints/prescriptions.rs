//! Prescription endpoints. All token-protected.
//!
//! Besides plain CRUD, two AI routes:
//! - `POST /api/prescriptions/generate` — draft a prescription upstream and
//!   store it as a pending, AI-origin document.
//! - `POST /api/prescriptions/validate` — reduce the model's safety judgment
//!   of a text to a boolean.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Deleted;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthDoctor};
use crate::db;
use crate::models::{
    CreatePrescriptionRequest, GeneratePrescriptionRequest, Prescription, PrescriptionOrigin,
    PrescriptionStatus, UpdatePrescriptionRequest,
};

/// `GET /api/prescriptions`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    let conn = ctx.conn()?;
    let prescriptions = db::list_prescriptions(&conn)?;
    Ok(Json(prescriptions))
}

/// `GET /api/prescriptions/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Prescription>, ApiError> {
    let conn = ctx.conn()?;
    let prescription = db::get_prescription(&conn, &id)?;
    Ok(Json(prescription))
}

/// `POST /api/prescriptions` — manual prescription, attributed to the
/// authenticated doctor.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<AuthDoctor>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    request.validate().map_err(ApiError::BadRequest)?;

    let now = Utc::now();
    let prescription = Prescription {
        id: Uuid::new_v4(),
        patient_id: request.patient_id,
        doctor_id: doctor.id,
        symptoms: request.symptoms,
        medical_history: request.medical_history,
        ai_text: None,
        final_text: request.final_text,
        origin: PrescriptionOrigin::Manual,
        status: PrescriptionStatus::Pending,
        feedback: None,
        created_at: now,
        updated_at: now,
    };

    let conn = ctx.conn()?;
    db::insert_prescription(&conn, &prescription)?;

    Ok((StatusCode::CREATED, Json(prescription)))
}

/// `POST /api/prescriptions/generate` — forward symptoms/history upstream,
/// store the draft verbatim as a pending AI-origin prescription.
///
/// The upstream call runs before the store lock is taken; a slow model
/// blocks only this handler.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Extension(doctor): Extension<AuthDoctor>,
    Json(request): Json<GeneratePrescriptionRequest>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    if request.symptoms.trim().is_empty() {
        return Err(ApiError::BadRequest("Symptoms must not be empty".into()));
    }

    let draft = ctx
        .ai
        .generate_prescription(&request.symptoms, request.medical_history.as_deref())
        .await?;

    let now = Utc::now();
    let prescription = Prescription {
        id: Uuid::new_v4(),
        patient_id: request.patient_id,
        doctor_id: doctor.id,
        symptoms: request.symptoms,
        medical_history: request.medical_history,
        ai_text: Some(draft),
        final_text: None,
        origin: PrescriptionOrigin::Ai,
        status: PrescriptionStatus::Pending,
        feedback: None,
        created_at: now,
        updated_at: now,
    };

    let conn = ctx.conn()?;
    db::insert_prescription(&conn, &prescription)?;

    tracing::info!(prescription_id = %prescription.id, "AI prescription drafted");

    Ok((StatusCode::CREATED, Json(prescription)))
}

#[derive(Deserialize)]
pub struct ValidateRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

/// `POST /api/prescriptions/validate`
pub async fn validate(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text must not be empty".into()));
    }

    let valid = ctx.ai.validate_prescription(&request.text).await?;
    Ok(Json(ValidateResponse { valid }))
}

/// `PUT /api/prescriptions/:id` — sign-off, status change, or feedback.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePrescriptionRequest>,
) -> Result<Json<Prescription>, ApiError> {
    let conn = ctx.conn()?;
    let updated = db::update_prescription(&conn, &id, &request)?;
    Ok(Json(updated))
}

/// `DELETE /api/prescriptions/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    let conn = ctx.conn()?;
    db::delete_prescription(&conn, &id)?;
    Ok(Json(Deleted::ok()))
}
