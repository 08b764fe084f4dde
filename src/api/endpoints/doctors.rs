//! Doctor endpoints.
//!
//! Listing is public (the office front-end shows the roster on its booking
//! screen); lookup and mutation require a token. Creation lives in
//! `endpoints::auth::register`.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use uuid::Uuid;

use super::Deleted;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthDoctor};
use crate::db;
use crate::models::{Doctor, UpdateDoctorRequest};

/// `GET /api/doctors` — list all doctors, unfiltered.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Doctor>>, ApiError> {
    let conn = ctx.conn()?;
    let doctors = db::list_doctors(&conn)?;
    Ok(Json(doctors))
}

/// `GET /api/doctors/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<Doctor>, ApiError> {
    let conn = ctx.conn()?;
    let doctor = db::get_doctor(&conn, &id)?;
    Ok(Json(doctor))
}

/// `PUT /api/doctors/:id` — partial profile update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Doctor>, ApiError> {
    let conn = ctx.conn()?;
    let updated = db::update_doctor(&conn, &id, &request)?;
    Ok(Json(updated))
}

/// `DELETE /api/doctors/:id` — no cascade: patients and appointments keep
/// their now-dangling references.
pub async fn delete(
    State(ctx): State<ApiContext>,
    Extension(_doctor): Extension<AuthDoctor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    let conn = ctx.conn()?;
    db::delete_doctor(&conn, &id)?;
    tracing::info!(doctor_id = %id, "doctor deleted");
    Ok(Json(Deleted::ok()))
}
