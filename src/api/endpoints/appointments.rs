//! Appointment endpoints. All token-protected.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use uuid::Uuid;

use super::Deleted;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthDoctor};
use crate::db;
use crate::models::{
    Appointment, AppointmentStatus, CreateAppointmentRequest, UpdateAppointmentRequest,
};

/// `GET /api/appointments`
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let conn = ctx.conn()?;
    let appointments = db::list_appointments(&conn)?;
    Ok(Json(appointments))
}

/// `GET /api/appointments/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.conn()?;
    let appointment = db::get_appointment(&conn, &id)?;
    Ok(Json(appointment))
}

/// `POST /api/appointments` — create scheduled, then append the id to both
/// parties' reference lists. The doctor/patient ids are stored as given —
/// the store never checks they resolve.
pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    request.validate().map_err(ApiError::BadRequest)?;

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        doctor_id: request.doctor_id,
        patient_id: request.patient_id,
        scheduled_at: request.scheduled_at,
        status: AppointmentStatus::Scheduled,
        reason: request.reason,
        notes: request.notes,
        created_at: now,
        updated_at: now,
    };

    let conn = ctx.conn()?;
    db::insert_appointment(&conn, &appointment)?;
    db::append_doctor_appointment(&conn, &appointment.doctor_id, &appointment.id)?;
    db::append_patient_appointment(&conn, &appointment.patient_id, &appointment.id)?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// `PUT /api/appointments/:id` — reschedule, status transition, or notes.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let conn = ctx.conn()?;
    let updated = db::update_appointment(&conn, &id, &request)?;
    Ok(Json(updated))
}

/// `DELETE /api/appointments/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    let conn = ctx.conn()?;
    db::delete_appointment(&conn, &id)?;
    Ok(Json(Deleted::ok()))
}
