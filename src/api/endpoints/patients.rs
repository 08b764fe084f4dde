//! Patient endpoints. All token-protected.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use uuid::Uuid;

use super::Deleted;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthDoctor};
use crate::db;
use crate::models::{CreatePatientRequest, Patient, UpdatePatientRequest};

/// `GET /api/patients`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let conn = ctx.conn()?;
    let patients = db::list_patients(&conn)?;
    Ok(Json(patients))
}

/// `GET /api/patients/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.conn()?;
    let patient = db::get_patient(&conn, &id)?;
    Ok(Json(patient))
}

/// `POST /api/patients` — create a patient and append it to the treating
/// doctor's reference list (best-effort, as the office model does).
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    request.validate().map_err(ApiError::BadRequest)?;

    let now = Utc::now();
    let patient = Patient {
        id: Uuid::new_v4(),
        name: request.name,
        email: request.email,
        doctor_id: request.doctor_id,
        medical_history: request.medical_history,
        appointment_ids: vec![],
        created_at: now,
        updated_at: now,
    };

    let conn = ctx.conn()?;
    db::insert_patient(&conn, &patient)?;
    if let Some(doctor_id) = patient.doctor_id {
        db::append_doctor_patient(&conn, &doctor_id, &patient.id)?;
    }

    Ok((StatusCode::CREATED, Json(patient)))
}

/// `PUT /api/patients/:id`
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.conn()?;
    let updated = db::update_patient(&conn, &id, &request)?;
    Ok(Json(updated))
}

/// `DELETE /api/patients/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    let conn = ctx.conn()?;
    db::delete_patient(&conn, &id)?;
    Ok(Json(Deleted::ok()))
}
